// ============================================================================
// WAD Fixed-Point Decimal
// Arbitrary-precision 18-decimal fixed-point arithmetic
// ============================================================================

use super::errors::{NumericError, NumericResult};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// Number of fractional decimal digits carried by a WAD.
pub const WAD_DECIMALS: u32 = 18;

/// The WAD scale factor (10^18).
pub const WAD_SCALE: u64 = 1_000_000_000_000_000_000;

/// Half scale for rounding (WAD_SCALE / 2)
const HALF_WAD_SCALE: u64 = WAD_SCALE / 2;

/// Fixed-point decimal scaled by 10^18.
///
/// Internally stores `value × 10^18` as an arbitrary-precision signed
/// integer, so products and quotients are computed at full width before
/// the single explicit rounding step. No floating point is involved.
///
/// # Example
/// ```
/// use bucket_price_ladder::numeric::Wad;
///
/// let price: Wad = "112.20070213".parse().unwrap();
/// assert_eq!(price.raw().to_string(), "112200702130000000000");
/// assert_eq!(price.to_string(), "112.20070213");
/// ```
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wad(BigInt);

/// 10^18 as a big integer.
#[inline]
pub(crate) fn wad_scale() -> BigInt {
    BigInt::from(WAD_SCALE)
}

/// 10^36, the numerator of a fixed-point inversion.
#[inline]
pub(crate) fn wad_scale_squared() -> BigInt {
    BigInt::from(WAD_SCALE as u128 * WAD_SCALE as u128)
}

impl Wad {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from raw internal representation (already scaled by 10^18).
    #[inline]
    pub fn from_raw(raw: impl Into<BigInt>) -> Self {
        Self(raw.into())
    }

    /// Zero value
    #[inline]
    pub fn zero() -> Self {
        Self(BigInt::zero())
    }

    /// One (1.0)
    #[inline]
    pub fn one() -> Self {
        Self(wad_scale())
    }

    /// Create from an integer value.
    #[inline]
    pub fn from_integer(value: i64) -> Self {
        Self(BigInt::from(value) * wad_scale())
    }

    /// Create from a native float through its shortest round-trip decimal
    /// text, so `0.1` becomes exactly `0.1` rather than the nearest binary
    /// fraction.
    ///
    /// # Errors
    /// - `InvalidNumberFormat` for NaN or infinities
    /// - `PrecisionLoss` if the decimal text has more than 18 fractional digits
    pub fn try_from_f64(value: f64) -> NumericResult<Self> {
        if !value.is_finite() {
            return Err(NumericError::InvalidNumberFormat);
        }
        value.to_string().parse()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get the raw internal value (scaled).
    #[inline]
    pub fn raw(&self) -> &BigInt {
        &self.0
    }

    /// Consume the value and return the raw scaled integer.
    #[inline]
    pub fn into_raw(self) -> BigInt {
        self.0
    }

    /// Check if value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if value is positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    /// Check if value is negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Get absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    /// Multiplication with round half-up.
    ///
    /// Computes `(a * b + 10^18 / 2) / 10^18` on the full-width product.
    /// The division truncates toward zero, so the half-up rounding holds for
    /// non-negative results only: `-0.000000000000000017 * 0.1` gives
    /// `-0.000000000000000001`.
    #[inline]
    pub fn wmul(&self, rhs: &Wad) -> Wad {
        let product = &self.0 * &rhs.0 + BigInt::from(HALF_WAD_SCALE);
        Wad(product / wad_scale())
    }

    /// Division with round half-up.
    ///
    /// Computes `(a * 10^18 + b / 2) / b` on the full-width numerator,
    /// with both divisions truncating toward zero.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `rhs` is zero.
    #[inline]
    pub fn wdiv(&self, rhs: &Wad) -> NumericResult<Wad> {
        if rhs.0.is_zero() {
            return Err(NumericError::DivisionByZero);
        }

        let half = &rhs.0 / BigInt::from(2u8);
        let scaled = &self.0 * wad_scale() + half;
        Ok(Wad(scaled / &rhs.0))
    }

    // ========================================================================
    // Conversion from rust_decimal (for API boundaries)
    // ========================================================================

    /// Convert from rust_decimal::Decimal.
    ///
    /// # Errors
    /// Returns `PrecisionLoss` if the decimal carries non-zero digits beyond
    /// the 18th fractional place.
    pub fn from_decimal(d: Decimal) -> NumericResult<Self> {
        let mantissa = BigInt::from(d.mantissa());
        let scale = d.scale();

        if scale <= WAD_DECIMALS {
            return Ok(Self(mantissa * pow10(WAD_DECIMALS - scale)));
        }

        let (quotient, remainder) = mantissa.div_rem(&pow10(scale - WAD_DECIMALS));
        if !remainder.is_zero() {
            return Err(NumericError::PrecisionLoss);
        }
        Ok(Self(quotient))
    }

    /// Convert to rust_decimal::Decimal.
    ///
    /// # Errors
    /// Returns `Overflow` if the raw value exceeds the 96-bit decimal mantissa.
    pub fn to_decimal(&self) -> NumericResult<Decimal> {
        let raw = self.0.to_i128().ok_or(NumericError::Overflow)?;
        Decimal::try_from_i128_with_scale(raw, WAD_DECIMALS).map_err(|_| NumericError::Overflow)
    }
}

/// Compute 10^n as a big integer
fn pow10(n: u32) -> BigInt {
    BigInt::from(10u32).pow(n)
}

// ============================================================================
// Free Functions
// ============================================================================

/// Parse a decimal numeral into a WAD.
///
/// # Errors
/// - `InvalidNumberFormat` if the text is not a plain decimal numeral
/// - `PrecisionLoss` if it has non-zero digits past the 18th fractional
///   place; trailing zeros are ignored
pub fn to_wad(value: &str) -> NumericResult<Wad> {
    value.parse()
}

/// Render a WAD as exact decimal text.
pub fn from_wad(value: &Wad) -> String {
    value.to_string()
}

/// `round_half_up(a * b / 10^18)`
pub fn wmul(a: &Wad, b: &Wad) -> Wad {
    a.wmul(b)
}

/// `round_half_up(a * 10^18 / b)`
pub fn wdiv(a: &Wad, b: &Wad) -> NumericResult<Wad> {
    a.wdiv(b)
}

/// Returns the lesser operand.
pub fn min(a: &Wad, b: &Wad) -> Wad {
    if a <= b {
        a.clone()
    } else {
        b.clone()
    }
}

/// Returns the greater operand.
pub fn max(a: &Wad, b: &Wad) -> Wad {
    if a >= b {
        a.clone()
    } else {
        b.clone()
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl From<i64> for Wad {
    #[inline]
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl From<u64> for Wad {
    #[inline]
    fn from(value: u64) -> Self {
        Self(BigInt::from(value) * wad_scale())
    }
}

impl From<Wad> for BigInt {
    #[inline]
    fn from(value: Wad) -> Self {
        value.0
    }
}

impl Neg for Wad {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Add for Wad {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a Wad> for &'a Wad {
    type Output = Wad;

    #[inline]
    fn add(self, rhs: &'a Wad) -> Self::Output {
        Wad(&self.0 + &rhs.0)
    }
}

impl Sub for Wad {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl<'a> Sub<&'a Wad> for &'a Wad {
    type Output = Wad;

    #[inline]
    fn sub(self, rhs: &'a Wad) -> Self::Output {
        Wad(&self.0 - &rhs.0)
    }
}

impl Mul for Wad {
    type Output = Self;

    /// Same as [`Wad::wmul`].
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.wmul(&rhs)
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Debug for Wad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wad({}, raw={})", self, self.0)
    }
}

impl fmt::Display for Wad {
    /// Integer part, a point, then the fractional digits with trailing zeros
    /// removed (at least one digit is kept): `1.0`, `-0.5`, `112.20070213`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (int_part, frac_part) = self.0.abs().div_rem(&wad_scale());
        let digits = format!("{:0>width$}", frac_part, width = WAD_DECIMALS as usize);
        let trimmed = digits.trim_end_matches('0');
        let fraction = if trimmed.is_empty() { "0" } else { trimmed };

        if self.0.is_negative() {
            write!(f, "-{}.{}", int_part, fraction)
        } else {
            write!(f, "{}.{}", int_part, fraction)
        }
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl FromStr for Wad {
    type Err = NumericError;

    /// Parse from a decimal string.
    ///
    /// # Examples
    /// - "123" -> 123.0
    /// - "123.456" -> 123.456
    /// - "-0.001" -> -0.001
    /// - ".5" -> 0.5
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (is_negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (int_str, frac_str) = body.split_once('.').unwrap_or((body, ""));

        if int_str.is_empty() && frac_str.is_empty() {
            return Err(NumericError::InvalidNumberFormat);
        }
        if !int_str.bytes().all(|b| b.is_ascii_digit())
            || !frac_str.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(NumericError::InvalidNumberFormat);
        }

        // Trailing zeros carry no value, only digits past the 18th matter
        let fraction = frac_str.trim_end_matches('0');
        if fraction.len() > WAD_DECIMALS as usize {
            return Err(NumericError::PrecisionLoss);
        }

        let digits = format!(
            "{}{:0<width$}",
            int_str,
            fraction,
            width = WAD_DECIMALS as usize
        );
        let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10)
            .ok_or(NumericError::InvalidNumberFormat)?;

        Ok(Self(if is_negative { -magnitude } else { magnitude }))
    }
}

// ============================================================================
// Serialization (decimal text)
// ============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for Wad {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Wad {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
