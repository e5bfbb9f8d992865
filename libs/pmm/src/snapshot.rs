//! Reserve snapshot of a PMM pool
//!
//! A snapshot is a read-only value built fresh for each query from chain
//! state. Construct a new one whenever reserves change.

use std::fmt;

use bigdecimal::BigDecimal;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use num_traits::{One, Signed};

use crate::error::{PmmError, Result};

/// Side of the pivot the pool's reserves sit on
///
/// Discriminants match the on-chain `R` status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Regime {
    /// Reserves equal their targets
    AtPivot = 0,
    /// Base is scarce (`B < B0`), quote is in surplus
    AbovePivot = 1,
    /// Base is abundant (`B > B0`), quote is scarce
    BelowPivot = 2,
}

impl Regime {
    /// Map an on-chain status code
    pub fn from_code(code: u8) -> Result<Self> {
        Self::try_from_primitive(code).map_err(|e| PmmError::UnknownRegime(e.number))
    }

    pub fn code(self) -> u8 {
        self.into()
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Regime::AtPivot => "at-pivot",
            Regime::AbovePivot => "above-pivot",
            Regime::BelowPivot => "below-pivot",
        };
        f.write_str(name)
    }
}

/// Current and target reserves, already scaled by token decimals
#[derive(Debug, Clone, PartialEq)]
pub struct Reserves {
    pub base: BigDecimal,
    pub quote: BigDecimal,
    pub base_target: BigDecimal,
    pub quote_target: BigDecimal,
}

/// Fee fractions deducted from gross trade output
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeeRates {
    pub lp_fee_rate: BigDecimal,
    pub mt_fee_rate: BigDecimal,
}

/// Immutable pool state consumed by the pricing engine
#[derive(Debug, Clone, PartialEq)]
pub struct ReserveSnapshot {
    reserves: Reserves,
    regime: Regime,
    oracle_price: BigDecimal,
    k: BigDecimal,
    fees: FeeRates,
}

impl ReserveSnapshot {
    /// Build a snapshot without validation
    ///
    /// Malformed states are still accepted so that the engine can report
    /// them as a zero quote.
    pub fn new(
        reserves: Reserves,
        regime: Regime,
        oracle_price: BigDecimal,
        k: BigDecimal,
        fees: FeeRates,
    ) -> Self {
        Self {
            reserves,
            regime,
            oracle_price,
            k,
            fees,
        }
    }

    /// Build a snapshot and reject structurally invalid values
    pub fn try_new(
        reserves: Reserves,
        regime: Regime,
        oracle_price: BigDecimal,
        k: BigDecimal,
        fees: FeeRates,
    ) -> Result<Self> {
        let snapshot = Self::new(reserves, regime, oracle_price, k, fees);
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check the snapshot invariants
    pub fn validate(&self) -> Result<()> {
        if !self.reserves.base_target.is_positive() || !self.reserves.quote_target.is_positive() {
            return Err(PmmError::TargetIsZero);
        }
        if self.reserves.base.is_negative() {
            return Err(invalid("base", "reserve is negative"));
        }
        if self.reserves.quote.is_negative() {
            return Err(invalid("quote", "reserve is negative"));
        }
        if !self.oracle_price.is_positive() {
            return Err(invalid("oracle_price", "must be positive"));
        }

        let one = BigDecimal::one();
        if self.k.is_negative() || self.k > one {
            return Err(invalid("k", "must lie in [0, 1]"));
        }
        for (field, rate) in [
            ("lp_fee_rate", &self.fees.lp_fee_rate),
            ("mt_fee_rate", &self.fees.mt_fee_rate),
        ] {
            if rate.is_negative() || *rate >= one {
                return Err(invalid(field, "must lie in [0, 1)"));
            }
        }
        if &self.fees.lp_fee_rate + &self.fees.mt_fee_rate >= one {
            return Err(invalid("fees", "combined rate must be below 1"));
        }
        Ok(())
    }

    pub fn base(&self) -> &BigDecimal {
        &self.reserves.base
    }

    pub fn quote(&self) -> &BigDecimal {
        &self.reserves.quote
    }

    pub fn base_target(&self) -> &BigDecimal {
        &self.reserves.base_target
    }

    pub fn quote_target(&self) -> &BigDecimal {
        &self.reserves.quote_target
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    pub fn oracle_price(&self) -> &BigDecimal {
        &self.oracle_price
    }

    pub fn k(&self) -> &BigDecimal {
        &self.k
    }

    pub fn lp_fee_rate(&self) -> &BigDecimal {
        &self.fees.lp_fee_rate
    }

    pub fn mt_fee_rate(&self) -> &BigDecimal {
        &self.fees.mt_fee_rate
    }

    pub fn reserves(&self) -> &Reserves {
        &self.reserves
    }

    pub fn fees(&self) -> &FeeRates {
        &self.fees
    }
}

fn invalid(field: &'static str, reason: &str) -> PmmError {
    PmmError::InvalidSnapshot {
        field,
        reason: reason.to_string(),
    }
}
