//! PMM pricing engine
//!
//! Dispatches a sell query on the snapshot's regime, handles trades that
//! run through the pivot, and deducts fees from the gross output.
//!
//! Two flavours of every query exist:
//! - `try_query_*` returns the full [`SellQuote`] or the reason no quote exists
//! - `query_*` reports any failure as a zero amount ("no executable trade")

use std::cmp::Ordering;

use bigdecimal::BigDecimal;
use num_traits::{One, Signed, Zero};
use tracing::{debug, trace};

use crate::curve_math::CurveMath;
use crate::error::{PmmError, Result};
use crate::precision::DecimalContext;
use crate::snapshot::{Regime, ReserveSnapshot};

/// Breakdown of a sell quote
#[derive(Debug, Clone, PartialEq)]
pub struct SellQuote {
    /// Output before fees
    pub gross: BigDecimal,
    pub mt_fee: BigDecimal,
    pub lp_fee: BigDecimal,
    /// Output received by the seller
    pub net: BigDecimal,
    /// The trade returned reserves to the pivot and continued past it
    pub crossed_pivot: bool,
}

impl SellQuote {
    fn from_gross(gross: BigDecimal, snapshot: &ReserveSnapshot, crossed_pivot: bool) -> Self {
        let mt_fee = &gross * snapshot.mt_fee_rate();
        let lp_fee = &gross * snapshot.lp_fee_rate();
        let net = &gross - &mt_fee - &lp_fee;
        Self {
            gross,
            mt_fee,
            lp_fee,
            net,
            crossed_pivot,
        }
    }
}

/// Stateless pricing engine bound to a decimal context
#[derive(Debug, Clone, Copy, Default)]
pub struct PmmEngine {
    math: CurveMath,
}

impl PmmEngine {
    pub fn new(ctx: DecimalContext) -> Self {
        Self {
            math: CurveMath::new(ctx),
        }
    }

    pub fn math(&self) -> &CurveMath {
        &self.math
    }

    pub fn context(&self) -> &DecimalContext {
        self.math.context()
    }

    /// Quote received when selling `amount` base, fees deducted
    ///
    /// Returns zero when no quote can be produced.
    pub fn query_sell_base(&self, amount: &BigDecimal, snapshot: &ReserveSnapshot) -> BigDecimal {
        match self.try_query_sell_base(amount, snapshot) {
            Ok(quote) => quote.net,
            Err(e) => {
                debug!(regime = %snapshot.regime(), error = %e, "sell base quote unavailable");
                BigDecimal::zero()
            }
        }
    }

    /// Base received when selling `amount` quote, fees deducted
    ///
    /// Returns zero when no quote can be produced.
    pub fn query_sell_quote(&self, amount: &BigDecimal, snapshot: &ReserveSnapshot) -> BigDecimal {
        match self.try_query_sell_quote(amount, snapshot) {
            Ok(quote) => quote.net,
            Err(e) => {
                debug!(regime = %snapshot.regime(), error = %e, "sell quote quote unavailable");
                BigDecimal::zero()
            }
        }
    }

    /// Sell `amount` base for quote
    pub fn try_query_sell_base(
        &self,
        amount: &BigDecimal,
        snapshot: &ReserveSnapshot,
    ) -> Result<SellQuote> {
        check_inputs(amount, snapshot)?;

        let price = snapshot.oracle_price();
        let (gross, crossed) = match snapshot.regime() {
            Regime::AtPivot => (self.at_pivot_sell_base(amount, snapshot)?, false),
            Regime::AbovePivot => {
                let pay_base = snapshot.base_target() - snapshot.base();
                let receive_quote = snapshot.quote() - snapshot.quote_target();
                trace!(%pay_base, %receive_quote, "sell base above pivot");

                match amount.cmp(&pay_base) {
                    Ordering::Less => {
                        let along = self.math.integrate(
                            snapshot.base_target(),
                            &(snapshot.base() + amount),
                            snapshot.base(),
                            price,
                            snapshot.k(),
                        )?;
                        (along.min(receive_quote), false)
                    }
                    Ordering::Equal => (receive_quote, false),
                    Ordering::Greater => {
                        let rest = self.at_pivot_sell_base(&(amount - &pay_base), snapshot)?;
                        (receive_quote + rest, true)
                    }
                }
            }
            Regime::BelowPivot => {
                let gross = self.math.solve_quadratic_for_trade(
                    snapshot.quote_target(),
                    snapshot.quote(),
                    amount,
                    price,
                    snapshot.k(),
                )?;
                (gross, false)
            }
        };

        Ok(SellQuote::from_gross(gross, snapshot, crossed))
    }

    /// Sell `amount` quote for base
    pub fn try_query_sell_quote(
        &self,
        amount: &BigDecimal,
        snapshot: &ReserveSnapshot,
    ) -> Result<SellQuote> {
        check_inputs(amount, snapshot)?;

        let inverse_price =
            self.context()
                .div(&BigDecimal::one(), snapshot.oracle_price(), "oracle price")?;
        let (gross, crossed) = match snapshot.regime() {
            Regime::AtPivot => (
                self.at_pivot_sell_quote(amount, &inverse_price, snapshot)?,
                false,
            ),
            Regime::AbovePivot => {
                let gross = self.math.solve_quadratic_for_trade(
                    snapshot.base_target(),
                    snapshot.base(),
                    amount,
                    &inverse_price,
                    snapshot.k(),
                )?;
                (gross, false)
            }
            Regime::BelowPivot => {
                let receive_base = snapshot.base() - snapshot.base_target();
                let pay_quote = snapshot.quote_target() - snapshot.quote();
                trace!(%pay_quote, %receive_base, "sell quote below pivot");

                match amount.cmp(&pay_quote) {
                    Ordering::Less => {
                        let along = self.math.integrate(
                            snapshot.quote_target(),
                            &(snapshot.quote() + amount),
                            snapshot.quote(),
                            &inverse_price,
                            snapshot.k(),
                        )?;
                        (along.min(receive_base), false)
                    }
                    Ordering::Equal => (receive_base, false),
                    Ordering::Greater => {
                        let rest = self.at_pivot_sell_quote(
                            &(amount - &pay_quote),
                            &inverse_price,
                            snapshot,
                        )?;
                        (receive_base + rest, true)
                    }
                }
            }
        };

        Ok(SellQuote::from_gross(gross, snapshot, crossed))
    }

    /// Marginal price of base in quote at the snapshot's reserves
    pub fn mid_price(&self, snapshot: &ReserveSnapshot) -> Result<BigDecimal> {
        let ctx = self.context();
        let k = snapshot.k();

        if snapshot.regime() == Regime::BelowPivot {
            let ratio = ctx.div(
                &(snapshot.quote_target() * snapshot.quote_target()),
                snapshot.quote(),
                "quote reserve",
            )?;
            let ratio = ctx.div(&ratio, snapshot.quote(), "quote reserve")?;
            let r = BigDecimal::one() - k + k * ratio;
            ctx.div(snapshot.oracle_price(), &r, "mid price ratio")
        } else {
            let ratio = ctx.div(
                &(snapshot.base_target() * snapshot.base_target()),
                snapshot.base(),
                "base reserve",
            )?;
            let ratio = ctx.div(&ratio, snapshot.base(), "base reserve")?;
            let r = BigDecimal::one() - k + k * ratio;
            Ok(snapshot.oracle_price() * r)
        }
    }

    fn at_pivot_sell_base(
        &self,
        amount: &BigDecimal,
        snapshot: &ReserveSnapshot,
    ) -> Result<BigDecimal> {
        self.math.solve_quadratic_for_trade(
            snapshot.quote_target(),
            snapshot.quote_target(),
            amount,
            snapshot.oracle_price(),
            snapshot.k(),
        )
    }

    fn at_pivot_sell_quote(
        &self,
        amount: &BigDecimal,
        inverse_price: &BigDecimal,
        snapshot: &ReserveSnapshot,
    ) -> Result<BigDecimal> {
        self.math.solve_quadratic_for_trade(
            snapshot.base_target(),
            snapshot.base_target(),
            amount,
            inverse_price,
            snapshot.k(),
        )
    }
}

fn check_inputs(amount: &BigDecimal, snapshot: &ReserveSnapshot) -> Result<()> {
    if amount.is_negative() {
        return Err(PmmError::NegativeAmount);
    }
    if !snapshot.base_target().is_positive() || !snapshot.quote_target().is_positive() {
        return Err(PmmError::TargetIsZero);
    }
    Ok(())
}
