// ============================================================================
// Bucket Price Ladder
// Immutable index-addressed table of canonical bucket prices
// ============================================================================

use super::errors::LadderError;
use super::generator;
use crate::domain::PriceDomain;
use crate::numeric::{NumericError, Wad};
use num_bigint::BigInt;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Scaled prices of the standard domain, one per line in fenwick-index order
const STANDARD_ASSET: &str = include_str!("../../data/bucket_prices.txt");

static STANDARD_LADDER: Lazy<Arc<BucketPriceLadder>> = Lazy::new(|| {
    let ladder = BucketPriceLadder::parse(PriceDomain::standard(), STANDARD_ASSET)
        .expect("embedded bucket price asset matches the standard domain");
    tracing::debug!(entries = ladder.len(), "loaded embedded bucket price ladder");
    Arc::new(ladder)
});

/// Canonical price of every bucket, highest price first.
///
/// A ladder is validated once on construction and never mutated, so it can
/// be shared freely across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketPriceLadder {
    domain: PriceDomain,
    prices: Vec<Wad>,
}

impl BucketPriceLadder {
    // ========================================================================
    // Construction
    // ========================================================================

    /// The embedded ladder of the standard domain.
    pub fn standard() -> Arc<Self> {
        Arc::clone(&STANDARD_LADDER)
    }

    /// Build a ladder from prices in fenwick-index order.
    ///
    /// # Errors
    /// - `InvalidDomain` if the domain fails validation
    /// - `LengthMismatch` unless there is one price per fenwick index
    /// - `NotDecreasing` at the first price not below its predecessor
    /// - `BoundsMismatch` if the endpoints differ from the domain bounds
    pub fn from_prices(domain: PriceDomain, prices: Vec<Wad>) -> Result<Self, LadderError> {
        domain.validate().map_err(LadderError::InvalidDomain)?;

        let expected = domain.fenwick_count();
        if prices.len() != expected {
            return Err(LadderError::LengthMismatch {
                expected,
                actual: prices.len(),
            });
        }

        if let Some(pos) = prices.windows(2).position(|pair| pair[0] <= pair[1]) {
            return Err(LadderError::NotDecreasing { index: pos + 1 });
        }

        if prices.first() != Some(&domain.max_price) || prices.last() != Some(&domain.min_price) {
            return Err(LadderError::BoundsMismatch);
        }

        Ok(Self { domain, prices })
    }

    /// Parse the text asset format: one scaled integer per line, blank
    /// lines ignored.
    pub fn parse(domain: PriceDomain, text: &str) -> Result<Self, LadderError> {
        let prices = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(pos, line)| {
                line.trim()
                    .parse::<BigInt>()
                    .map(Wad::from_raw)
                    .map_err(|_| LadderError::Parse {
                        line: pos + 1,
                        source: NumericError::InvalidNumberFormat,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_prices(domain, prices)
    }

    /// Parse a JSON array of decimal price strings.
    #[cfg(feature = "serde")]
    pub fn from_json(domain: PriceDomain, json: &str) -> Result<Self, LadderError> {
        let prices: Vec<Wad> =
            serde_json::from_str(json).map_err(|e| LadderError::Json(e.to_string()))?;
        Self::from_prices(domain, prices)
    }

    /// Regenerate every price of `domain` with the fixed-point power
    /// function.
    pub fn generate(domain: PriceDomain) -> Result<Self, LadderError> {
        domain.validate().map_err(LadderError::InvalidDomain)?;

        let prices = generator::price_ladder(
            domain.max_bucket_index,
            domain.min_bucket_index,
            &domain.step_ratio,
        )?;
        tracing::debug!(entries = prices.len(), "generated bucket price ladder");

        Self::from_prices(domain, prices)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Price at a fenwick index
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Wad> {
        self.prices.get(index)
    }

    /// Number of prices
    #[inline]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Always false for a validated ladder
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// All prices, highest first
    #[inline]
    pub fn prices(&self) -> &[Wad] {
        &self.prices
    }

    /// Iterate prices, highest first
    pub fn iter(&self) -> std::slice::Iter<'_, Wad> {
        self.prices.iter()
    }

    /// The domain this ladder was built for
    #[inline]
    pub fn domain(&self) -> &PriceDomain {
        &self.domain
    }

    /// Render in the text asset format accepted by [`Self::parse`].
    pub fn to_asset_string(&self) -> String {
        let mut out = String::with_capacity(self.prices.len() * 24);
        for price in &self.prices {
            out.push_str(&price.raw().to_string());
            out.push('\n');
        }
        out
    }
}

impl<'a> IntoIterator for &'a BucketPriceLadder {
    type Item = &'a Wad;
    type IntoIter = std::slice::Iter<'a, Wad>;

    fn into_iter(self) -> Self::IntoIter {
        self.prices.iter()
    }
}
