//! # PMM Library - Proactive Market Maker Pricing Curves
//!
//! ## Purpose
//!
//! Off-chain evaluation of PMM pool pricing: given a snapshot of a pool's
//! reserves, targets, regime, oracle price, curve steepness and fee rates it
//! computes the net amount received for a sale in either direction and the
//! marginal (mid) price. Results match the pool's on-chain curve, including
//! trades that run through the pivot within a single call.
//!
//! ## Integration Points
//!
//! - **Input Sources**: raw pool state read by chain clients, scaled via [`normalize`]
//! - **Output Destinations**: routing and execution logic deciding whether to trade
//! - **Precision**: [`BigDecimal`] with an 80 significant digit budget by default
//! - **Side Effects**: none; every query is a pure function of its inputs
//!
//! ## Architecture Role
//!
//! ```text
//! RawPmmState ──normalize──▶ ReserveSnapshot ──▶ PmmEngine ──▶ SellQuote / mid price
//!                                                    │
//!                                                CurveMath
//!                                                    │
//!                                             DecimalContext
//! ```
//!
//! ## Failure Model
//!
//! The curve primitives return [`PmmError`]. `query_*` methods on the engine
//! fold any failure into a zero amount; `try_query_*` keep the reason.

pub mod curve_math;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod pool_traits;
pub mod precision;
pub mod snapshot;

pub use curve_math::CurveMath;
pub use engine::{PmmEngine, SellQuote};
pub use error::{PmmError, Result};
pub use normalize::{from_wei, RawPmmState, TokenDecimals};
pub use pool_traits::{PmmPool, PmmPoolView};
pub use precision::DecimalContext;
pub use snapshot::{FeeRates, Regime, ReserveSnapshot, Reserves};

/// Common types for PMM calculations
pub use bigdecimal::BigDecimal;
