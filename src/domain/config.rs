// ============================================================================
// Price Domain Configuration
// Constants that define a deployment's bucket price ladder
// ============================================================================

use crate::ladder::generator;
use crate::numeric::{NumericResult, Wad};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest bucket index of the standard deployment (fenwick index 0)
pub const MAX_BUCKET_INDEX: i64 = 4156;

/// Lowest bucket index of the standard deployment
pub const MIN_BUCKET_INDEX: i64 = -3232;

/// Highest fenwick index of the standard deployment
pub const MAX_FENWICK_INDEX: usize = (MAX_BUCKET_INDEX - MIN_BUCKET_INDEX) as usize;

/// Per-step price ratio of the standard deployment (1.005)
const STANDARD_STEP_RATIO: u64 = 1_005_000_000_000_000_000;

/// Price at fenwick index 0 (1004968987.606512354182109771)
const STANDARD_MAX_PRICE: u128 = 1_004_968_987_606_512_354_182_109_771;

/// Price at fenwick index 7388 (0.00000009983628289)
const STANDARD_MIN_PRICE: u128 = 99_836_282_890;

// ============================================================================
// Price Domain
// ============================================================================

/// The price-domain parameters a ladder is built from.
///
/// Fenwick index `i` maps to bucket index `max_bucket_index - i`, so index 0
/// carries the highest price `max_price` and the last index carries
/// `min_price`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PriceDomain {
    /// Bucket index of the highest price
    pub max_bucket_index: i64,

    /// Bucket index of the lowest price
    pub min_bucket_index: i64,

    /// Ratio between neighbouring bucket prices, as a WAD above 1.0
    pub step_ratio: Wad,

    /// Lowest accepted price (the last ladder entry)
    pub min_price: Wad,

    /// Highest accepted price (the first ladder entry)
    pub max_price: Wad,
}

impl PriceDomain {
    /// Create a domain with explicit constants
    pub fn new(
        max_bucket_index: i64,
        min_bucket_index: i64,
        step_ratio: Wad,
        min_price: Wad,
        max_price: Wad,
    ) -> Self {
        Self {
            max_bucket_index,
            min_bucket_index,
            step_ratio,
            min_price,
            max_price,
        }
    }

    /// Create a domain whose price bounds are computed by the fixed-point
    /// power function for the given bucket range and step.
    ///
    /// # Errors
    /// Propagates generator failures (non-positive step, exponent overflow).
    pub fn derive(
        max_bucket_index: i64,
        min_bucket_index: i64,
        step_ratio: Wad,
    ) -> NumericResult<Self> {
        let log2_step = generator::sd_log2(step_ratio.raw())?;
        let max_price = generator::price_at(max_bucket_index, &log2_step)?;
        let min_price = generator::price_at(min_bucket_index, &log2_step)?;

        Ok(Self::new(
            max_bucket_index,
            min_bucket_index,
            step_ratio,
            min_price,
            max_price,
        ))
    }

    /// Builder method: Set the step ratio
    pub fn with_step_ratio(mut self, step_ratio: Wad) -> Self {
        self.step_ratio = step_ratio;
        self
    }

    /// Builder method: Set the accepted price bounds
    pub fn with_price_bounds(mut self, min_price: Wad, max_price: Wad) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    /// Number of ladder entries
    pub fn fenwick_count(&self) -> usize {
        self.max_fenwick_index() + 1
    }

    /// Highest valid fenwick index
    pub fn max_fenwick_index(&self) -> usize {
        self.max_bucket_index.saturating_sub(self.min_bucket_index).max(0) as usize
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_bucket_index < self.min_bucket_index {
            return Err("Maximum bucket index cannot be below the minimum".to_string());
        }

        if self.step_ratio <= Wad::one() {
            return Err("Step ratio must be greater than 1.0".to_string());
        }

        if !self.min_price.is_positive() {
            return Err("Minimum price must be positive".to_string());
        }

        if self.min_price > self.max_price
            || (self.min_price == self.max_price && self.max_fenwick_index() > 0)
        {
            return Err("Minimum price must be below the maximum price".to_string());
        }

        Ok(())
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl PriceDomain {
    /// The deployed protocol's domain
    /// - Bucket indices 4156 down to -3232 (7389 buckets)
    /// - Step ratio 1.005
    /// - Prices from 0.00000009983628289 to 1004968987.606512354182109771
    pub fn standard() -> Self {
        Self::new(
            MAX_BUCKET_INDEX,
            MIN_BUCKET_INDEX,
            Wad::from_raw(STANDARD_STEP_RATIO),
            Wad::from_raw(STANDARD_MIN_PRICE),
            Wad::from_raw(STANDARD_MAX_PRICE),
        )
    }
}

impl Default for PriceDomain {
    fn default() -> Self {
        Self::standard()
    }
}
