//! Decimal arithmetic substrate
//!
//! All curve math runs on [`BigDecimal`]. Addition, subtraction and
//! multiplication are exact; division and square root are the only lossy
//! operations and round to the context's significant-digit budget.
//!
//! ## Precision Rules
//!
//! 1. **NO FLOATING POINT**: boundary branches compare with exact equality
//! 2. **Explicit Failures**: zero divisors and negative radicands are errors,
//!    never infinities or NaN
//! 3. **Bound, not global**: precision lives in a [`DecimalContext`] value
//!    handed to whoever does the math

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, Sign};
use num_traits::{Signed, Zero};

use crate::error::{PmmError, Result};

/// Default significant-digit budget for lossy operations
pub const DEFAULT_SIGNIFICANT_DIGITS: u64 = 80;

/// Default decimal exponent at which formatting switches to scientific notation
pub const DEFAULT_EXPONENTIAL_AT: i64 = 80;

/// Extra digits carried by division and square root before the final rounding
const GUARD_DIGITS: u64 = 3;

/// Precision and notation settings for the arithmetic substrate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalContext {
    significant_digits: u64,
    exponential_at: i64,
}

impl Default for DecimalContext {
    fn default() -> Self {
        Self {
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
            exponential_at: DEFAULT_EXPONENTIAL_AT,
        }
    }
}

impl DecimalContext {
    /// Create a context, rejecting a zero digit budget
    pub fn try_new(significant_digits: u64, exponential_at: i64) -> Result<Self> {
        if significant_digits == 0 {
            return Err(PmmError::InvalidPrecision(significant_digits));
        }
        Ok(Self {
            significant_digits,
            exponential_at: exponential_at.abs(),
        })
    }

    pub fn significant_digits(&self) -> u64 {
        self.significant_digits
    }

    pub fn exponential_at(&self) -> i64 {
        self.exponential_at
    }

    /// Round to the context's significant digits
    pub fn round(&self, value: &BigDecimal) -> BigDecimal {
        value.with_prec(self.significant_digits)
    }

    /// Quotient rounded to the context's significant digits
    ///
    /// # Errors
    /// `DivisionByZero` when `divisor` is zero; `context` names the operand
    /// for diagnostics.
    pub fn div(
        &self,
        dividend: &BigDecimal,
        divisor: &BigDecimal,
        context: &'static str,
    ) -> Result<BigDecimal> {
        if divisor.is_zero() {
            return Err(PmmError::DivisionByZero { context });
        }
        if dividend.is_zero() {
            return Ok(BigDecimal::zero());
        }

        let (num, num_scale) = dividend.as_bigint_and_exponent();
        let (den, den_scale) = divisor.as_bigint_and_exponent();

        // Shift the numerator so the integer quotient carries every digit we keep
        let shift = self.significant_digits + GUARD_DIGITS + decimal_digits(&den);
        let scaled = num * pow10(shift);
        let quotient = scaled / den;

        let scale = num_scale - den_scale + shift as i64;
        Ok(self.round(&BigDecimal::new(quotient, scale)))
    }

    /// Square root rounded to the context's significant digits
    ///
    /// # Errors
    /// `NegativeSqrt` when `value` is negative.
    pub fn sqrt(&self, value: &BigDecimal) -> Result<BigDecimal> {
        if value.is_negative() {
            return Err(PmmError::NegativeSqrt);
        }
        if value.is_zero() {
            return Ok(BigDecimal::zero());
        }

        let (mantissa, mut scale) = value.as_bigint_and_exponent();
        let mut radicand = mantissa
            .to_biguint()
            .ok_or(PmmError::NegativeSqrt)?;

        // Even scale so that the root's scale is an integer
        if scale.rem_euclid(2) == 1 {
            radicand *= 10u32;
            scale += 1;
        }

        let extra = 2 * (self.significant_digits + GUARD_DIGITS);
        radicand *= pow10(extra)
            .to_biguint()
            .ok_or(PmmError::NegativeSqrt)?;
        scale += extra as i64;

        let root = BigInt::from_biguint(Sign::Plus, radicand.sqrt());
        Ok(self.round(&BigDecimal::new(root, scale / 2)))
    }

    /// Render using plain notation inside the exponential threshold and
    /// scientific notation outside it
    pub fn format(&self, value: &BigDecimal) -> String {
        if value.is_zero() {
            return "0".to_string();
        }

        let normalized = value.normalized();
        let (mantissa, scale) = normalized.as_bigint_and_exponent();
        let digits = mantissa.magnitude().to_string();
        let exponent = digits.len() as i64 - 1 - scale;

        if exponent.abs() < self.exponential_at {
            plain_string(&mantissa, scale)
        } else {
            let sign = if mantissa.is_negative() { "-" } else { "" };
            let (head, tail) = digits.split_at(1);
            let exp_sign = if exponent < 0 { "-" } else { "+" };
            if tail.is_empty() {
                format!("{sign}{head}e{exp_sign}{}", exponent.abs())
            } else {
                format!("{sign}{head}.{tail}e{exp_sign}{}", exponent.abs())
            }
        }
    }

    /// Render with exactly `places` fractional digits, ties rounded away from zero
    pub fn format_fixed(&self, value: &BigDecimal, places: u32) -> String {
        let rounded = value.with_scale_round(places as i64, RoundingMode::HalfUp);
        let (mantissa, scale) = rounded.as_bigint_and_exponent();
        plain_string(&mantissa, scale)
    }
}

fn pow10(exp: u64) -> BigInt {
    num_traits::pow(BigInt::from(10u32), exp as usize)
}

fn decimal_digits(value: &BigInt) -> u64 {
    value.magnitude().to_string().len() as u64
}

/// Plain positional rendering of `mantissa * 10^-scale`
fn plain_string(mantissa: &BigInt, scale: i64) -> String {
    let sign = if mantissa.is_negative() { "-" } else { "" };
    let digits = mantissa.magnitude().to_string();

    if scale <= 0 {
        let zeros = "0".repeat(scale.unsigned_abs() as usize);
        if digits == "0" {
            return "0".to_string();
        }
        return format!("{sign}{digits}{zeros}");
    }

    let scale = scale as usize;
    let padded = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
    } else {
        digits
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);
    format!("{sign}{int_part}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_division_keeps_eighty_digits() {
        let ctx = DecimalContext::default();
        let third = ctx.div(&d("1"), &d("3"), "test").unwrap();
        let expected = format!("0.{}", "3".repeat(80));
        assert_eq!(ctx.format(&third), expected);
    }

    #[test]
    fn test_division_by_zero_is_an_error() {
        let ctx = DecimalContext::default();
        let err = ctx.div(&d("1"), &d("0"), "reserve").unwrap_err();
        assert_eq!(err, PmmError::DivisionByZero { context: "reserve" });
    }

    #[test]
    fn test_exact_quotients() {
        let ctx = DecimalContext::default();
        assert_eq!(ctx.div(&d("10"), &d("4"), "t").unwrap(), d("2.5"));
        assert_eq!(ctx.div(&d("-9"), &d("0.3"), "t").unwrap(), d("-30"));
        assert_eq!(ctx.div(&d("0"), &d("7"), "t").unwrap(), d("0"));
    }

    #[test]
    fn test_sqrt() {
        let ctx = DecimalContext::default();
        assert_eq!(ctx.sqrt(&d("10201")).unwrap(), d("101"));
        assert_eq!(ctx.sqrt(&d("0.0625")).unwrap(), d("0.25"));
        assert_eq!(ctx.sqrt(&d("0")).unwrap(), d("0"));

        let root2 = ctx.sqrt(&d("2")).unwrap();
        assert!(ctx.format(&root2).starts_with("1.41421356237309504880168872420969807856967187537694"));
        assert_eq!(ctx.sqrt(&d("-1")), Err(PmmError::NegativeSqrt));
    }

    #[test]
    fn test_sqrt_with_odd_negative_scale() {
        let ctx = DecimalContext::default();
        // 4e3 = 4000
        let value = BigDecimal::new(BigInt::from(4), -3);
        let root = ctx.sqrt(&value).unwrap();
        let squared = &root * &root;
        assert!((squared - d("4000")).abs() < d("1e-70"));
    }

    #[test]
    fn test_format_switches_notation() {
        let ctx = DecimalContext::try_new(80, 5).unwrap();
        assert_eq!(ctx.format(&d("1234.5")), "1234.5");
        assert_eq!(ctx.format(&d("123456")), "1.23456e+5");
        assert_eq!(ctx.format(&d("0.0000012")), "1.2e-6");
        assert_eq!(ctx.format(&d("-100000")), "-1e+5");
        assert_eq!(ctx.format(&d("2.500")), "2.5");
    }

    #[test]
    fn test_format_fixed_rounds_half_up() {
        let ctx = DecimalContext::default();
        assert_eq!(ctx.format_fixed(&d("9.87654321"), 4), "9.8765");
        assert_eq!(ctx.format_fixed(&d("9.87655"), 4), "9.8766");
        assert_eq!(ctx.format_fixed(&d("2.9999999"), 6), "3.000000");
        assert_eq!(ctx.format_fixed(&d("-1.25"), 1), "-1.3");
        assert_eq!(ctx.format_fixed(&d("3"), 2), "3.00");
        assert_eq!(ctx.format_fixed(&d("0.05"), 3), "0.050");
        assert_eq!(ctx.format_fixed(&d("12.5"), 0), "13");
        assert_eq!(ctx.format_fixed(&d("0.0004"), 3), "0.000");
    }

    #[test]
    fn test_zero_precision_rejected() {
        assert_eq!(
            DecimalContext::try_new(0, 80),
            Err(PmmError::InvalidPrecision(0))
        );
    }
}
