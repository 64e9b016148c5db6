// ============================================================================
// Binary Logarithm
// Extended-precision log2 of positive rationals, integer arithmetic only
// ============================================================================

use super::errors::{NumericError, NumericResult};
use num_bigint::BigInt;
use num_traits::{One, Signed};

/// Fractional bits carried by [`log2_ratio`] results.
pub const LOG2_FRACTION_BITS: usize = 128;

/// Binary logarithm of `num / den` as a signed fixed-point integer with
/// [`LOG2_FRACTION_BITS`] fractional bits.
///
/// Ratios below one are inverted exactly (`log2(a/b) = -log2(b/a)`), so the
/// magnitude is always expanded from a value in `[1, 2)`: the integer part is
/// the bit distance between numerator and denominator, and each fractional
/// bit comes from one squaring of the normalized mantissa. The magnitude is
/// truncated, never rounded up, and is accurate to a few units of
/// `2^-LOG2_FRACTION_BITS`.
///
/// # Errors
/// Returns `Undefined` unless both `num` and `den` are positive.
pub fn log2_ratio(num: &BigInt, den: &BigInt) -> NumericResult<BigInt> {
    if !num.is_positive() || !den.is_positive() {
        return Err(NumericError::Undefined);
    }

    let (num, den, negative) = if num >= den {
        (num, den, false)
    } else {
        (den, num, true)
    };

    // Largest n with den * 2^n <= num
    let mut n = (num.bits() - den.bits()) as usize;
    if (den << n) > *num {
        n -= 1;
    }

    let one = BigInt::one() << LOG2_FRACTION_BITS;
    let two = &one << 1usize;

    // Mantissa y = num / (den * 2^n) in [1, 2)
    let mut y = (num << LOG2_FRACTION_BITS) / (den << n);
    let mut result = BigInt::from(n) << LOG2_FRACTION_BITS;

    let mut delta = one >> 1usize;
    while delta.is_positive() {
        y = (&y * &y) >> LOG2_FRACTION_BITS;
        if y >= two {
            result += &delta;
            y >>= 1usize;
        }
        delta >>= 1usize;
    }

    Ok(if negative { -result } else { result })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(n: i64) -> BigInt {
        BigInt::from(n) << LOG2_FRACTION_BITS
    }

    #[test]
    fn test_powers_of_two_are_exact() {
        assert_eq!(log2_ratio(&BigInt::from(8), &BigInt::from(1)).unwrap(), fixed(3));
        assert_eq!(log2_ratio(&BigInt::from(1), &BigInt::from(8)).unwrap(), fixed(-3));
        assert_eq!(log2_ratio(&BigInt::from(5), &BigInt::from(5)).unwrap(), fixed(0));
        assert_eq!(
            log2_ratio(&BigInt::from(3 << 20), &BigInt::from(3)).unwrap(),
            fixed(20)
        );
    }

    #[test]
    fn test_antisymmetric() {
        let a = BigInt::from(1_005u32);
        let b = BigInt::from(1_000u32);
        let up = log2_ratio(&a, &b).unwrap();
        let down = log2_ratio(&b, &a).unwrap();
        assert_eq!(up, -down);
        assert!(up.is_positive());
    }

    #[test]
    fn test_log2_of_three() {
        // log2(3) = 1.5849625007211561814537389439478165087598...
        let value = log2_ratio(&BigInt::from(3), &BigInt::one()).unwrap();
        let scaled = (value * BigInt::from(10u64).pow(30)) >> LOG2_FRACTION_BITS;
        assert_eq!(scaled.to_string(), "1584962500721156181453738943947");
    }

    #[test]
    fn test_non_positive_is_undefined() {
        assert_eq!(
            log2_ratio(&BigInt::from(0), &BigInt::one()),
            Err(NumericError::Undefined)
        );
        assert_eq!(
            log2_ratio(&BigInt::one(), &BigInt::from(-2)),
            Err(NumericError::Undefined)
        );
    }
}
