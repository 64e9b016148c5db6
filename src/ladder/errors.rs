// ============================================================================
// Ladder Errors
// Failures while building or validating a bucket price ladder
// ============================================================================

use crate::numeric::NumericError;
use thiserror::Error;

/// Errors raised while constructing a [`BucketPriceLadder`](super::BucketPriceLadder).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LadderError {
    /// The price domain failed validation
    #[error("invalid price domain: {0}")]
    InvalidDomain(String),

    /// Wrong number of prices for the domain
    #[error("ladder has {actual} prices, domain requires {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A price is not strictly below its predecessor
    #[error("ladder prices must strictly decrease, violated at index {index}")]
    NotDecreasing { index: usize },

    /// First or last price differs from the domain's bounds
    #[error("ladder endpoints do not match the domain price bounds")]
    BoundsMismatch,

    /// A line of the text asset is not a scaled integer
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: NumericError,
    },

    /// The JSON asset could not be decoded
    #[error("invalid ladder json: {0}")]
    Json(String),

    /// The fixed-point power function failed
    #[error("ladder generation failed: {0}")]
    Generator(#[from] NumericError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            LadderError::LengthMismatch {
                expected: 7389,
                actual: 3
            }
            .to_string(),
            "ladder has 3 prices, domain requires 7389"
        );
        assert_eq!(
            LadderError::Parse {
                line: 12,
                source: NumericError::InvalidNumberFormat
            }
            .to_string(),
            "line 12: invalid number format: could not parse value as a decimal numeral"
        );
    }

    #[test]
    fn test_from_numeric_error() {
        let err: LadderError = NumericError::Overflow.into();
        assert_eq!(err, LadderError::Generator(NumericError::Overflow));
    }
}
