//! Raw on-chain PMM state to snapshot scaling
//!
//! Pool contracts report every quantity as an unsigned integer:
//!
//! | Field | Scale |
//! |---|---|
//! | `B`, `B0` | `10^base_decimals` |
//! | `Q`, `Q0` | `10^quote_decimals` |
//! | `i` | `10^(18 - base_decimals + quote_decimals)` |
//! | `K`, fee rates | `10^18` |
//!
//! Scaling is an exact decimal exponent shift, no rounding involved.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::error::{PmmError, Result};
use crate::snapshot::{FeeRates, Regime, ReserveSnapshot, Reserves};

/// Fixed-point scale of `K` and fee rates
pub const ONE_DECIMALS: i64 = 18;

/// Token decimal counts of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenDecimals {
    pub base: u8,
    pub quote: u8,
}

/// PMM state as read from a pool contract
///
/// Integers are kept as decimal strings since they are `uint256` on chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawPmmState {
    pub i: String,
    #[serde(alias = "K")]
    pub k: String,
    #[serde(alias = "B")]
    pub b: String,
    #[serde(alias = "Q")]
    pub q: String,
    #[serde(alias = "B0")]
    pub b0: String,
    #[serde(alias = "Q0")]
    pub q0: String,
    #[serde(alias = "R")]
    pub r: u8,
    pub lp_fee_rate: String,
    pub mt_fee_rate: String,
}

impl RawPmmState {
    /// Scale every field into semantic units
    ///
    /// The result is not validated; call [`ReserveSnapshot::validate`] when
    /// a malformed pool should be rejected rather than quoted as zero.
    pub fn normalize(&self, decimals: &TokenDecimals) -> Result<ReserveSnapshot> {
        let base = decimals.base as i64;
        let quote = decimals.quote as i64;

        let reserves = Reserves {
            base: from_wei_field("B", &self.b, base)?,
            quote: from_wei_field("Q", &self.q, quote)?,
            base_target: from_wei_field("B0", &self.b0, base)?,
            quote_target: from_wei_field("Q0", &self.q0, quote)?,
        };
        let fees = FeeRates {
            lp_fee_rate: from_wei_field("lp_fee_rate", &self.lp_fee_rate, ONE_DECIMALS)?,
            mt_fee_rate: from_wei_field("mt_fee_rate", &self.mt_fee_rate, ONE_DECIMALS)?,
        };
        let oracle_price = from_wei_field("i", &self.i, ONE_DECIMALS - base + quote)?;
        let k = from_wei_field("K", &self.k, ONE_DECIMALS)?;

        Ok(ReserveSnapshot::new(
            reserves,
            Regime::from_code(self.r)?,
            oracle_price,
            k,
            fees,
        ))
    }
}

/// `raw / 10^decimals` for an integer string
pub fn from_wei(raw: &str, decimals: i64) -> Result<BigDecimal> {
    from_wei_field("value", raw, decimals)
}

fn from_wei_field(field: &'static str, raw: &str, decimals: i64) -> Result<BigDecimal> {
    let int = BigInt::from_str(raw.trim()).map_err(|_| PmmError::InvalidRawValue {
        field,
        value: raw.to_string(),
    })?;
    Ok(BigDecimal::new(int, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn raw_state() -> RawPmmState {
        RawPmmState {
            i: "2500000000".to_string(),
            k: "100000000000000000".to_string(),
            b: "90000000000000000000".to_string(),
            q: "110000000".to_string(),
            b0: "100000000000000000000".to_string(),
            q0: "100000000".to_string(),
            r: 1,
            lp_fee_rate: "3000000000000000".to_string(),
            mt_fee_rate: "0".to_string(),
        }
    }

    #[test]
    fn test_from_wei() {
        assert_eq!(from_wei("1500000000000000000", 18).unwrap(), d("1.5"));
        assert_eq!(from_wei("5000000", 6).unwrap(), d("5"));
        assert_eq!(from_wei("7", 0).unwrap(), d("7"));
    }

    #[test]
    fn test_normalize_mixed_decimals() {
        // 18-decimal base priced in a 6-decimal quote
        let decimals = TokenDecimals { base: 18, quote: 6 };
        let snapshot = raw_state().normalize(&decimals).unwrap();

        assert_eq!(snapshot.base(), &d("90"));
        assert_eq!(snapshot.quote(), &d("110"));
        assert_eq!(snapshot.base_target(), &d("100"));
        assert_eq!(snapshot.quote_target(), &d("100"));
        assert_eq!(snapshot.regime(), Regime::AbovePivot);
        // i scaled by 10^(18 - 18 + 6)
        assert_eq!(snapshot.oracle_price(), &d("2500"));
        assert_eq!(snapshot.k(), &d("0.1"));
        assert_eq!(snapshot.lp_fee_rate(), &d("0.003"));
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_integer_values() {
        let mut raw = raw_state();
        raw.q0 = "1.5".to_string();
        let err = raw.normalize(&TokenDecimals { base: 18, quote: 6 }).unwrap_err();
        assert_eq!(
            err,
            PmmError::InvalidRawValue {
                field: "Q0",
                value: "1.5".to_string()
            }
        );

        assert!(from_wei("", 18).is_err());
    }

    #[test]
    fn test_rejects_unknown_regime() {
        let mut raw = raw_state();
        raw.r = 9;
        assert_eq!(
            raw.normalize(&TokenDecimals { base: 18, quote: 18 }),
            Err(PmmError::UnknownRegime(9))
        );
    }

    #[test]
    fn test_deserialize_contract_field_names() {
        let raw: RawPmmState = toml::from_str(
            r#"
i = "1000000000000000000"
K = "0"
B = "1"
Q = "1"
B0 = "1"
Q0 = "1"
R = 0
lp_fee_rate = "0"
mt_fee_rate = "0"
"#,
        )
        .unwrap();
        assert_eq!(raw.k, "0");
        assert_eq!(raw.r, 0);
    }
}
