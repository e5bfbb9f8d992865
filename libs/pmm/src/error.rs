//! Error types for PMM curve evaluation

use thiserror::Error;

/// Failures raised by the curve primitives, the decimal substrate and the
/// snapshot/normalization layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PmmError {
    /// The anchor (target) reserve of a curve is not positive
    #[error("Target reserve is zero or negative")]
    TargetIsZero,

    #[error("Division by zero: {context}")]
    DivisionByZero { context: &'static str },

    #[error("Square root of negative value")]
    NegativeSqrt,

    #[error("Trade amount must not be negative")]
    NegativeAmount,

    #[error("Invalid precision: {0} significant digits")]
    InvalidPrecision(u64),

    #[error("Unknown regime code: {0}")]
    UnknownRegime(u8),

    #[error("Invalid snapshot field {field}: {reason}")]
    InvalidSnapshot { field: &'static str, reason: String },

    #[error("Invalid raw value for {field}: {value:?}")]
    InvalidRawValue { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, PmmError>;
