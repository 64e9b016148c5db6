// ============================================================================
// Numeric Errors
// Error types for WAD arithmetic and index/price conversion
// ============================================================================

use thiserror::Error;

/// Errors that can occur during fixed-point arithmetic and conversion.
///
/// Every variant is a local, synchronous validation failure. None of them
/// is transient: retrying with the same input cannot succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum NumericError {
    /// Input string or value is not a decimal numeral
    #[error("invalid number format: could not parse value as a decimal numeral")]
    InvalidNumberFormat,
    /// Attempted division by zero
    #[error("division by zero")]
    DivisionByZero,
    /// Price lies outside `[MIN_PRICE, MAX_PRICE]`
    #[error("price out of bounds")]
    PriceOutOfBounds,
    /// Index lies outside `[0, MAX_FENWICK_INDEX]`
    #[error("index out of bounds: {index}")]
    IndexOutOfBounds { index: i64 },
    /// Conversion would lose significant digits
    #[error("precision loss: conversion would lose significant digits")]
    PrecisionLoss,
    /// Result does not fit the target representation
    #[error("arithmetic overflow: result exceeded maximum value")]
    Overflow,
    /// Logarithm of a non-positive value
    #[error("logarithm undefined for non-positive input")]
    Undefined,
}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            NumericError::Overflow.to_string(),
            "arithmetic overflow: result exceeded maximum value"
        );
        assert_eq!(NumericError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            NumericError::IndexOutOfBounds { index: 9999 }.to_string(),
            "index out of bounds: 9999"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(NumericError::PriceOutOfBounds, NumericError::PriceOutOfBounds);
        assert_ne!(
            NumericError::IndexOutOfBounds { index: -1 },
            NumericError::IndexOutOfBounds { index: 7389 }
        );
    }
}
