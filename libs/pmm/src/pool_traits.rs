//! Pool trait definitions for a unified quoting interface

use bigdecimal::BigDecimal;

use crate::engine::{PmmEngine, SellQuote};
use crate::error::Result;
use crate::snapshot::{Regime, ReserveSnapshot};

/// Quoting interface over one pool state
pub trait PmmPool {
    /// Quote received for selling `amount` base, zero when no trade is possible
    fn sell_base(&self, amount: &BigDecimal) -> BigDecimal;

    /// Base received for selling `amount` quote, zero when no trade is possible
    fn sell_quote(&self, amount: &BigDecimal) -> BigDecimal;

    /// Full breakdown of a base sale
    fn sell_base_detailed(&self, amount: &BigDecimal) -> Result<SellQuote>;

    /// Full breakdown of a quote sale
    fn sell_quote_detailed(&self, amount: &BigDecimal) -> Result<SellQuote>;

    /// Marginal price of base in quote
    fn mid_price(&self) -> Result<BigDecimal>;

    fn regime(&self) -> Regime;
}

/// An engine paired with the snapshot it quotes against
#[derive(Debug, Clone)]
pub struct PmmPoolView<'a> {
    engine: &'a PmmEngine,
    snapshot: &'a ReserveSnapshot,
}

impl<'a> PmmPoolView<'a> {
    pub fn new(engine: &'a PmmEngine, snapshot: &'a ReserveSnapshot) -> Self {
        Self { engine, snapshot }
    }

    pub fn snapshot(&self) -> &ReserveSnapshot {
        self.snapshot
    }
}

impl PmmPool for PmmPoolView<'_> {
    fn sell_base(&self, amount: &BigDecimal) -> BigDecimal {
        self.engine.query_sell_base(amount, self.snapshot)
    }

    fn sell_quote(&self, amount: &BigDecimal) -> BigDecimal {
        self.engine.query_sell_quote(amount, self.snapshot)
    }

    fn sell_base_detailed(&self, amount: &BigDecimal) -> Result<SellQuote> {
        self.engine.try_query_sell_base(amount, self.snapshot)
    }

    fn sell_quote_detailed(&self, amount: &BigDecimal) -> Result<SellQuote> {
        self.engine.try_query_sell_quote(amount, self.snapshot)
    }

    fn mid_price(&self) -> Result<BigDecimal> {
        self.engine.mid_price(self.snapshot)
    }

    fn regime(&self) -> Regime {
        self.snapshot.regime()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{FeeRates, Reserves};
    use std::str::FromStr;

    fn d(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_view_delegates_to_engine() {
        let engine = PmmEngine::default();
        let snapshot = ReserveSnapshot::new(
            Reserves {
                base: d("100"),
                quote: d("200"),
                base_target: d("100"),
                quote_target: d("200"),
            },
            Regime::AtPivot,
            d("2"),
            d("0"),
            FeeRates::default(),
        );
        let pool = PmmPoolView::new(&engine, &snapshot);

        assert_eq!(pool.regime(), Regime::AtPivot);
        assert_eq!(pool.sell_base(&d("10")), d("20"));
        assert_eq!(pool.sell_quote(&d("10")), d("5"));
        assert_eq!(pool.mid_price().unwrap(), d("2"));
        assert_eq!(pool.sell_base_detailed(&d("10")).unwrap().net, d("20"));
    }
}
