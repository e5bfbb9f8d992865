//! PMM curve mathematics
//!
//! Closed-form primitives for the PMM price curve
//! `P(V) = i * (1 - k + k * (V0 / V)^2)` where `V0` is the target reserve,
//! `i` the reference price and `k` the curve steepness.
//!
//! - [`CurveMath::solve_quadratic_for_trade`]: output reserve change for a supplied amount
//! - [`CurveMath::integrate`]: value of moving along one side of the curve
//! - [`CurveMath::solve_quadratic_for_target`]: target reserve after absorbing a value delta

use bigdecimal::BigDecimal;
use num_traits::{One, Signed, Zero};

use crate::error::{PmmError, Result};
use crate::precision::DecimalContext;

/// Curve primitives bound to a decimal context
#[derive(Debug, Clone, Copy, Default)]
pub struct CurveMath {
    ctx: DecimalContext,
}

impl CurveMath {
    pub fn new(ctx: DecimalContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &DecimalContext {
        &self.ctx
    }

    /// Amount of the counter asset delivered when `delta` is supplied
    ///
    /// Solves the curve's quadratic for the post-trade reserve and returns
    /// the reduction from `v1`.
    ///
    /// # Arguments
    /// * `v0` - Target (anchor) reserve, must be positive
    /// * `v1` - Current reserve on the delivered side
    /// * `delta` - Amount supplied
    /// * `i` - Price of the supplied asset in units of the delivered asset
    /// * `k` - Curve steepness in `[0, 1]`
    pub fn solve_quadratic_for_trade(
        &self,
        v0: &BigDecimal,
        v1: &BigDecimal,
        delta: &BigDecimal,
        i: &BigDecimal,
        k: &BigDecimal,
    ) -> Result<BigDecimal> {
        if !v0.is_positive() {
            return Err(PmmError::TargetIsZero);
        }
        if delta.is_zero() {
            return Ok(BigDecimal::zero());
        }

        let one = BigDecimal::one();

        // Flat curve: constant price, capped by the available reserve
        if k.is_zero() {
            let fair = delta * i;
            return Ok(if &fair > v1 { v1.clone() } else { fair });
        }

        // k == 1 makes the quadratic coefficient (1 - k) vanish
        if *k == one {
            let t = self
                .ctx
                .div(&(i * delta * v1), &(v0 * v0), "squared target")?;
            let denominator = &t + &one;
            return self.ctx.div(&(v1 * &t), &denominator, "k=1 denominator");
        }

        let one_minus_k = &one - k;

        // Magnitude and sign of b are tracked apart to avoid cancellation
        let part2 = self.ctx.div(&(k * v0), v1, "current reserve")? * v0 + i * delta;
        let b_abs0 = &one_minus_k * v1;
        let (b_abs, b_negative) = if b_abs0 >= part2 {
            (b_abs0 - part2, false)
        } else {
            (part2 - b_abs0, true)
        };

        let discriminant = &b_abs * &b_abs + BigDecimal::from(4_i64) * &one_minus_k * k * v0 * v0;
        let root = self.ctx.sqrt(&discriminant)?;

        let numerator = if b_negative {
            root - &b_abs
        } else {
            &b_abs + root
        };
        let denominator = BigDecimal::from(2_i64) * one_minus_k;

        Ok(v1 - self.ctx.div(&numerator, &denominator, "quadratic denominator")?)
    }

    /// Value of moving the reserve from `v2` to `v1` along one side of the curve
    ///
    /// `i * (v1 - v2) * (1 - k + k * v0^2 / (v1 * v2))`
    pub fn integrate(
        &self,
        v0: &BigDecimal,
        v1: &BigDecimal,
        v2: &BigDecimal,
        i: &BigDecimal,
        k: &BigDecimal,
    ) -> Result<BigDecimal> {
        if !v0.is_positive() {
            return Err(PmmError::TargetIsZero);
        }

        let fair_amount = i * (v1 - v2);
        if k.is_zero() {
            return Ok(fair_amount);
        }

        let v0_v1 = self.ctx.div(&(v0 * v0), v1, "integral upper bound")?;
        let penalty = self.ctx.div(&v0_v1, v2, "integral lower bound")? * k;

        Ok(self.ctx.round(&(fair_amount * (BigDecimal::one() - k + penalty))))
    }

    /// Target reserve after absorbing `delta` at price `i`
    ///
    /// `v1 * (1 + (sqrt(1 + 4 * k * i * delta / v1) - 1) / (2 * k))`
    ///
    /// # Errors
    /// `TargetIsZero` for a negative `v1`; a zero `v1` yields zero.
    pub fn solve_quadratic_for_target(
        &self,
        v1: &BigDecimal,
        delta: &BigDecimal,
        i: &BigDecimal,
        k: &BigDecimal,
    ) -> Result<BigDecimal> {
        if v1.is_zero() {
            return Ok(BigDecimal::zero());
        }
        if v1.is_negative() {
            return Err(PmmError::TargetIsZero);
        }
        if k.is_zero() {
            return Ok(v1 + i * delta);
        }

        let one = BigDecimal::one();
        let ratio = self.ctx.div(
            &(BigDecimal::from(4_i64) * k * i * delta),
            v1,
            "target reserve",
        )?;
        let sqrt = self.ctx.sqrt(&(ratio + &one))?;
        let premium = self
            .ctx
            .div(&(sqrt - &one), &(BigDecimal::from(2_i64) * k), "steepness")?
            + one;

        Ok(v1 * premium)
    }
}
