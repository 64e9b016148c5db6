// ============================================================================
// Ladder Generator
// Signed 59.18-decimal fixed-point log2/exp2/mul used to regenerate ladders
// ============================================================================
//
// These primitives reproduce, bit for bit, the integer algorithm the
// authoritative pricing function evaluates on chain:
//
//   price(bucket) = exp2(mul(bucket * 1e18, log2(step)))
//
// Every rounding step matters. `mul` rounds the magnitude half up, `log2`
// inverts inputs below one by truncating division before taking the
// logarithm, and `exp2` works in 192.64 binary fixed point with truncating
// shifts and inverts negative exponents by truncating division. The runtime
// converter never calls into this module; it only backs ladder regeneration
// and the tests that prove the embedded asset exact.

use crate::numeric::{wad_scale, wad_scale_squared, NumericError, NumericResult, Wad, WAD_SCALE};
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Remainder above which `sd_mul` rounds the magnitude up
const ROUND_UP_THRESHOLD: u64 = WAD_SCALE / 2 - 1;

/// Most negative exponent whose inverse does not truncate to zero
const EXP2_MIN_INPUT: i128 = -59_794_705_707_972_522_261;

/// Exponents at or above 192.0 do not fit the 192.64 format
const EXP2_MAX_INPUT_INTEGER: u64 = 192;

/// `round(2^(2^-k) * 2^64)` for k = 1..=64, applied for each set bit of the
/// 64-bit binary fraction from the most significant bit down.
const EXP2_FACTORS: [u128; 64] = [
    0x16A09E667F3BCC909,
    0x1306FE0A31B7152DF,
    0x1172B83C7D517ADCE,
    0x10B5586CF9890F62A,
    0x1059B0D31585743AE,
    0x102C9A3E778060EE7,
    0x10163DA9FB33356D8,
    0x100B1AFA5ABCBED61,
    0x10058C86DA1C09EA2,
    0x1002C605E2E8CEC50,
    0x100162F3904051FA1,
    0x1000B175EFFDC76BA,
    0x100058BA01FB9F96D,
    0x10002C5CC37DA9492,
    0x1000162E525EE0547,
    0x10000B17255775C04,
    0x1000058B91B5BC9AE,
    0x100002C5C89D5EC6D,
    0x10000162E43F4F831,
    0x100000B1721BCFC9A,
    0x10000058B90CF1E6E,
    0x1000002C5C863B73F,
    0x100000162E430E5A2,
    0x1000000B172183551,
    0x100000058B90C0B49,
    0x10000002C5C8601CC,
    0x1000000162E42FFF0,
    0x10000000B17217FBB,
    0x1000000058B90BFCE,
    0x100000002C5C85FE3,
    0x10000000162E42FF1,
    0x100000000B17217F8,
    0x10000000058B90BFC,
    0x1000000002C5C85FE,
    0x100000000162E42FF,
    0x1000000000B17217F,
    0x100000000058B90C0,
    0x10000000002C5C860,
    0x1000000000162E430,
    0x10000000000B17218,
    0x1000000000058B90C,
    0x100000000002C5C86,
    0x10000000000162E43,
    0x100000000000B1721,
    0x10000000000058B91,
    0x1000000000002C5C8,
    0x100000000000162E4,
    0x1000000000000B172,
    0x100000000000058B9,
    0x10000000000002C5D,
    0x1000000000000162E,
    0x10000000000000B17,
    0x1000000000000058C,
    0x100000000000002C6,
    0x10000000000000163,
    0x100000000000000B1,
    0x10000000000000059,
    0x1000000000000002C,
    0x10000000000000016,
    0x1000000000000000B,
    0x10000000000000006,
    0x10000000000000003,
    0x10000000000000001,
    0x10000000000000001,
];

/// Largest signed 59.18 magnitude (2^255 - 1)
fn max_sd59x18() -> BigUint {
    (BigUint::one() << 255usize) - BigUint::one()
}

// ============================================================================
// Fixed-Point Primitives
// ============================================================================

/// Signed fixed-point multiplication.
///
/// Multiplies magnitudes, divides by 10^18 and adds one when the remainder
/// is at least half a unit. The sign is negative when exactly one operand is
/// negative.
///
/// # Errors
/// Returns `Overflow` if the magnitude exceeds the signed 59.18 range.
pub fn sd_mul(x: &BigInt, y: &BigInt) -> NumericResult<BigInt> {
    let product = x.magnitude() * y.magnitude();
    let (mut magnitude, remainder) = product.div_rem(&BigUint::from(WAD_SCALE));
    if remainder > BigUint::from(ROUND_UP_THRESHOLD) {
        magnitude += 1u32;
    }

    if magnitude > max_sd59x18() {
        return Err(NumericError::Overflow);
    }

    let sign = if x.is_negative() != y.is_negative() {
        Sign::Minus
    } else {
        Sign::Plus
    };
    Ok(BigInt::from_biguint(sign, magnitude))
}

/// Signed fixed-point binary logarithm.
///
/// # Errors
/// Returns `Undefined` for non-positive input.
pub fn sd_log2(x: &BigInt) -> NumericResult<BigInt> {
    if !x.is_positive() {
        return Err(NumericError::Undefined);
    }

    let scale = wad_scale();
    let (x, negative) = if *x >= scale {
        (x.clone(), false)
    } else {
        // log2(x) = -log2(1/x)
        (wad_scale_squared() / x, true)
    };

    // Integer part from the most significant bit of x / 1e18
    let n = (&x / &scale).bits() - 1;
    let mut result = BigInt::from(n) * &scale;

    // y = x * 2^-n, in [1, 2)
    let mut y = &x >> n as usize;
    if y == scale {
        return Ok(if negative { -result } else { result });
    }

    let two = &scale << 1usize;
    let mut delta = &scale >> 1usize;
    while delta.is_positive() {
        y = &y * &y / &scale;
        if y >= two {
            result += &delta;
            y >>= 1usize;
        }
        delta >>= 1usize;
    }

    Ok(if negative { -result } else { result })
}

/// Signed fixed-point binary exponential.
///
/// # Errors
/// Returns `Overflow` for exponents of 192.0 or more.
pub fn sd_exp2(x: &BigInt) -> NumericResult<BigInt> {
    if x.is_negative() {
        if *x < BigInt::from(EXP2_MIN_INPUT) {
            return Ok(BigInt::zero());
        }
        // 2^-x = 1 / 2^x
        let inverse = sd_exp2(&-x)?;
        return Ok(wad_scale_squared() / inverse);
    }

    if *x >= BigInt::from(EXP2_MAX_INPUT_INTEGER) * wad_scale() {
        return Err(NumericError::Overflow);
    }

    let x192x64 = (x.magnitude() << 64usize) / BigUint::from(WAD_SCALE);
    Ok(BigInt::from(exp2_192x64(&x192x64)))
}

/// Binary exponential of an unsigned 192.64 fixed-point input below 192,
/// returned as an unsigned 18-decimal fixed-point value.
fn exp2_192x64(x: &BigUint) -> BigUint {
    let fraction = x.iter_u64_digits().next().unwrap_or(0);
    let integer = (x >> 64usize).to_usize().unwrap_or(0);

    // Start from 0.5 in 192.64, compensated by shifting from 191 below
    let mut result = BigUint::one() << 191usize;
    for (bit, factor) in EXP2_FACTORS.iter().enumerate() {
        if fraction & (1u64 << (63 - bit)) != 0 {
            result = (result * *factor) >> 64usize;
        }
    }

    result *= WAD_SCALE;
    result >> (191 - integer)
}

// ============================================================================
// Ladder Generation
// ============================================================================

/// Price of one bucket given `log2(step)` in fixed point.
pub fn price_at(bucket_index: i64, log2_step: &BigInt) -> NumericResult<Wad> {
    let exponent = sd_mul(&(BigInt::from(bucket_index) * wad_scale()), log2_step)?;
    sd_exp2(&exponent).map(Wad::from_raw)
}

/// Every bucket price from `max_bucket_index` down to `min_bucket_index`,
/// in fenwick-index order.
pub fn price_ladder(
    max_bucket_index: i64,
    min_bucket_index: i64,
    step_ratio: &Wad,
) -> NumericResult<Vec<Wad>> {
    let log2_step = sd_log2(step_ratio.raw())?;
    (min_bucket_index..=max_bucket_index)
        .rev()
        .map(|bucket_index| price_at(bucket_index, &log2_step))
        .collect()
}
