// ============================================================================
// Index/Price Converter
// Maps fenwick indices to canonical prices and prices back to indices
// ============================================================================

use crate::ladder::BucketPriceLadder;
use crate::numeric::{log2_ratio, wad_scale, NumericError, NumericResult, Wad};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive};
use once_cell::sync::Lazy;
use std::sync::Arc;

static STANDARD_CONVERTER: Lazy<IndexPriceConverter> = Lazy::new(|| {
    IndexPriceConverter::new(BucketPriceLadder::standard())
        .expect("standard domain has a step ratio above 1.0")
});

/// Converts between fenwick indices and prices for one ladder.
///
/// Both directions are pure: `index_to_price` is a table lookup and
/// `price_to_index` evaluates the continuous bucket estimate
/// `log2(price) / log2(step)` in 128-bit binary fixed point, then applies the
/// sign-dependent rounding that keeps it in agreement with the ladder.
///
/// # Example
/// ```
/// use bucket_price_ladder::prelude::*;
///
/// let converter = IndexPriceConverter::standard();
/// let index = converter.price_to_index(&"2000".parse().unwrap()).unwrap();
/// assert_eq!(index, 2632);
/// assert_eq!(
///     converter.index_to_price(index).unwrap().to_string(),
///     "2000.221618840727700609"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct IndexPriceConverter {
    ladder: Arc<BucketPriceLadder>,
    /// log2(step ratio) with LOG2_FRACTION_BITS fractional bits, positive
    log2_step: BigInt,
}

impl IndexPriceConverter {
    /// Create a converter over a validated ladder.
    ///
    /// # Errors
    /// Returns `Undefined` if the ladder's step ratio is not above 1.0.
    pub fn new(ladder: Arc<BucketPriceLadder>) -> NumericResult<Self> {
        let log2_step = log2_ratio(ladder.domain().step_ratio.raw(), &wad_scale())?;
        if !log2_step.is_positive() {
            return Err(NumericError::Undefined);
        }
        Ok(Self { ladder, log2_step })
    }

    /// The converter over the embedded standard ladder.
    pub fn standard() -> &'static Self {
        &STANDARD_CONVERTER
    }

    /// The underlying ladder
    #[inline]
    pub fn ladder(&self) -> &Arc<BucketPriceLadder> {
        &self.ladder
    }

    /// Lowest accepted price
    #[inline]
    pub fn min_price(&self) -> &Wad {
        &self.ladder.domain().min_price
    }

    /// Highest accepted price
    #[inline]
    pub fn max_price(&self) -> &Wad {
        &self.ladder.domain().max_price
    }

    /// Highest valid fenwick index
    #[inline]
    pub fn max_fenwick_index(&self) -> i64 {
        self.ladder.domain().max_bucket_index - self.ladder.domain().min_bucket_index
    }

    // ========================================================================
    // Index -> Price
    // ========================================================================

    /// Canonical price of a fenwick index.
    ///
    /// # Errors
    /// Returns `IndexOutOfBounds` unless `0 <= index <= MAX_FENWICK_INDEX`.
    pub fn index_to_price(&self, index: i64) -> NumericResult<Wad> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.ladder.get(i))
            .cloned()
            .ok_or_else(|| {
                tracing::debug!(index, "rejected fenwick index outside ladder");
                NumericError::IndexOutOfBounds { index }
            })
    }

    // ========================================================================
    // Price -> Index
    // ========================================================================

    /// Fenwick index of the bucket a price falls into.
    ///
    /// For every valid index `i`, `price_to_index(index_to_price(i)) == i`.
    ///
    /// # Errors
    /// Returns `PriceOutOfBounds` unless `MIN_PRICE <= price <= MAX_PRICE`.
    pub fn price_to_index(&self, price: &Wad) -> NumericResult<i64> {
        if price < self.min_price() || price > self.max_price() {
            tracing::debug!(%price, "rejected price outside ladder bounds");
            return Err(NumericError::PriceOutOfBounds);
        }

        let log2_price = log2_ratio(price.raw(), &wad_scale())?;

        // ceil(log2_price / log2_step), the divisor is positive
        let ceil_index = -(-&log2_price).div_floor(&self.log2_step);

        // Below 1.0 the reference truncates toward zero, so a raw index more
        // than half a bucket below its ceiling belongs one bucket further up
        let nudge = log2_price.is_negative()
            && ((&ceil_index * &self.log2_step - &log2_price) << 1usize) > self.log2_step;

        let ceil_index = ceil_index.to_i64().ok_or(NumericError::Overflow)?;
        let max_bucket_index = self.ladder.domain().max_bucket_index;
        let fenwick = if nudge {
            max_bucket_index + 1 - ceil_index
        } else {
            max_bucket_index - ceil_index
        };

        if !(0..=self.max_fenwick_index()).contains(&fenwick) {
            return Err(NumericError::IndexOutOfBounds { index: fenwick });
        }

        tracing::trace!(%price, index = fenwick, "converted price to fenwick index");
        Ok(fenwick)
    }

    /// Canonical bucket price for an arbitrary in-range price.
    ///
    /// This is not the identity: `2000` snaps to `2000.221618840727700609`.
    pub fn snap_price(&self, price: &Wad) -> NumericResult<Wad> {
        self.index_to_price(self.price_to_index(price)?)
    }

    // ========================================================================
    // Fenwick <-> Bucket Index
    // ========================================================================

    /// Bucket index (`MAX_BUCKET_INDEX - index`) of a fenwick index.
    ///
    /// # Errors
    /// Returns `IndexOutOfBounds` unless `0 <= index <= MAX_FENWICK_INDEX`.
    pub fn bucket_index_of(&self, index: i64) -> NumericResult<i64> {
        if !(0..=self.max_fenwick_index()).contains(&index) {
            return Err(NumericError::IndexOutOfBounds { index });
        }
        Ok(self.ladder.domain().max_bucket_index - index)
    }

    /// Fenwick index of a bucket index.
    ///
    /// # Errors
    /// Returns `IndexOutOfBounds` unless the bucket index lies in
    /// `[MIN_BUCKET_INDEX, MAX_BUCKET_INDEX]`.
    pub fn index_of_bucket(&self, bucket_index: i64) -> NumericResult<i64> {
        let domain = self.ladder.domain();
        let index = domain.max_bucket_index.saturating_sub(bucket_index);
        if !(domain.min_bucket_index..=domain.max_bucket_index).contains(&bucket_index) {
            return Err(NumericError::IndexOutOfBounds { index });
        }
        Ok(index)
    }
}

// ============================================================================
// Standard Ladder Shortcuts
// ============================================================================

/// [`IndexPriceConverter::index_to_price`] on the standard ladder.
pub fn index_to_price(index: i64) -> NumericResult<Wad> {
    IndexPriceConverter::standard().index_to_price(index)
}

/// [`IndexPriceConverter::price_to_index`] on the standard ladder.
pub fn price_to_index(price: &Wad) -> NumericResult<i64> {
    IndexPriceConverter::standard().price_to_index(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceDomain;
    use proptest::prelude::*;

    fn wad(s: &str) -> Wad {
        s.parse().unwrap()
    }

    #[test]
    fn test_index_to_price_boundaries() {
        let cases = [
            (0, "1004968987.606512354182109771"),
            (2632, "2000.221618840727700609"),
            (3232, "100.332368143282009890"),
            (4156, "1.0"),
            (5156, "0.006822416727411372"),
            (7388, "0.00000009983628289"),
        ];
        for (index, expected) in cases {
            assert_eq!(index_to_price(index).unwrap(), wad(expected), "index {}", index);
        }
    }

    #[test]
    fn test_index_to_price_out_of_bounds() {
        assert_eq!(
            index_to_price(9999),
            Err(NumericError::IndexOutOfBounds { index: 9999 })
        );
        assert_eq!(
            index_to_price(7389),
            Err(NumericError::IndexOutOfBounds { index: 7389 })
        );
        assert_eq!(
            index_to_price(-1),
            Err(NumericError::IndexOutOfBounds { index: -1 })
        );
    }

    #[test]
    fn test_price_to_index_literals() {
        assert_eq!(price_to_index(&wad("2000")).unwrap(), 2632);
        assert_eq!(price_to_index(&wad("100.0")).unwrap(), 3232);
        assert_eq!(price_to_index(&wad("1.0")).unwrap(), 4156);
        assert_eq!(price_to_index(&wad("0.00682")).unwrap(), 5156);
    }

    #[test]
    fn test_price_to_index_out_of_bounds() {
        assert_eq!(
            price_to_index(&wad("1222333444")),
            Err(NumericError::PriceOutOfBounds)
        );
        assert_eq!(
            price_to_index(&wad("0.00000005")),
            Err(NumericError::PriceOutOfBounds)
        );
        assert_eq!(price_to_index(&Wad::zero()), Err(NumericError::PriceOutOfBounds));
        assert_eq!(
            price_to_index(&wad("-1")),
            Err(NumericError::PriceOutOfBounds)
        );
    }

    #[test]
    fn test_price_to_index_at_bounds() {
        let converter = IndexPriceConverter::standard();
        assert_eq!(converter.price_to_index(converter.max_price()).unwrap(), 0);
        assert_eq!(
            converter.price_to_index(converter.min_price()).unwrap(),
            converter.max_fenwick_index()
        );

        let just_above = converter.max_price() + &Wad::from_raw(1);
        assert_eq!(
            converter.price_to_index(&just_above),
            Err(NumericError::PriceOutOfBounds)
        );
        let just_below = converter.min_price() - &Wad::from_raw(1);
        assert_eq!(
            converter.price_to_index(&just_below),
            Err(NumericError::PriceOutOfBounds)
        );
    }

    #[test]
    fn test_round_trip_every_index() {
        let converter = IndexPriceConverter::standard();
        for index in 0..=converter.max_fenwick_index() {
            let price = converter.index_to_price(index).unwrap();
            assert_eq!(
                converter.price_to_index(&price).unwrap(),
                index,
                "price {}",
                price
            );
        }
    }

    #[test]
    fn test_snap_price() {
        let converter = IndexPriceConverter::standard();
        assert_eq!(
            converter.snap_price(&wad("2000")).unwrap(),
            wad("2000.221618840727700609")
        );
        assert_eq!(converter.snap_price(&Wad::one()).unwrap(), Wad::one());
        assert_eq!(
            converter.snap_price(&wad("0.00682")).unwrap(),
            wad("0.006822416727411372")
        );
    }

    #[test]
    fn test_bucket_index_mapping() {
        let converter = IndexPriceConverter::standard();
        assert_eq!(converter.bucket_index_of(0).unwrap(), 4156);
        assert_eq!(converter.bucket_index_of(7388).unwrap(), -3232);
        assert_eq!(
            converter.bucket_index_of(7389),
            Err(NumericError::IndexOutOfBounds { index: 7389 })
        );

        assert_eq!(converter.index_of_bucket(4156).unwrap(), 0);
        assert_eq!(converter.index_of_bucket(-3232).unwrap(), 7388);
        assert_eq!(converter.index_of_bucket(1524).unwrap(), 2632);
        assert_eq!(
            converter.index_of_bucket(4157),
            Err(NumericError::IndexOutOfBounds { index: -1 })
        );
        assert_eq!(
            converter.index_of_bucket(-3233),
            Err(NumericError::IndexOutOfBounds { index: 7389 })
        );
    }

    #[test]
    fn test_bucket_index_mapping_extremes() {
        let converter = IndexPriceConverter::standard();
        assert_eq!(
            converter.index_of_bucket(i64::MIN),
            Err(NumericError::IndexOutOfBounds { index: i64::MAX })
        );
        assert_eq!(
            converter.index_of_bucket(i64::MAX),
            Err(NumericError::IndexOutOfBounds {
                index: 4156 - i64::MAX
            })
        );
        assert_eq!(
            converter.bucket_index_of(i64::MIN),
            Err(NumericError::IndexOutOfBounds { index: i64::MIN })
        );
        assert_eq!(
            converter.bucket_index_of(i64::MAX),
            Err(NumericError::IndexOutOfBounds { index: i64::MAX })
        );
    }

    #[test]
    fn test_custom_domain() {
        let domain = PriceDomain::derive(50, -50, "1.01".parse().unwrap()).unwrap();
        let ladder = Arc::new(BucketPriceLadder::generate(domain).unwrap());
        let converter = IndexPriceConverter::new(ladder).unwrap();

        assert_eq!(converter.max_fenwick_index(), 100);
        assert_eq!(converter.index_to_price(50).unwrap(), Wad::one());
        for index in 0..=100 {
            let price = converter.index_to_price(index).unwrap();
            assert_eq!(converter.price_to_index(&price).unwrap(), index);
        }
        assert_eq!(
            converter.index_to_price(101),
            Err(NumericError::IndexOutOfBounds { index: 101 })
        );
    }

    #[test]
    fn test_deterministic() {
        let converter = IndexPriceConverter::standard();
        let price = wad("123.456");
        let first = converter.price_to_index(&price).unwrap();
        for _ in 0..10 {
            assert_eq!(converter.price_to_index(&price).unwrap(), first);
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip(index in 0i64..=7388) {
            let price = index_to_price(index).unwrap();
            prop_assert_eq!(price_to_index(&price).unwrap(), index);
        }

        #[test]
        fn prop_monotonic(a in 0i64..=7388, b in 0i64..=7388) {
            prop_assume!(a < b);
            prop_assert!(index_to_price(a).unwrap() > index_to_price(b).unwrap());
        }

        #[test]
        fn prop_snapped_price_within_one_step(raw in 99_836_282_890u128..=1_004_968_987_606_512_354_182_109_771u128) {
            // Any in-range price snaps to a neighbouring bucket price
            let price = Wad::from_raw(raw);
            let index = price_to_index(&price).unwrap();
            let snapped = index_to_price(index).unwrap();
            let tolerance = wad("1.006");
            prop_assert!(snapped.wdiv(&price).unwrap() <= tolerance);
            prop_assert!(price.wdiv(&snapped).unwrap() <= tolerance);
            prop_assert_eq!(price_to_index(&snapped).unwrap(), index);
        }
    }
}
