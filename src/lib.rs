// ============================================================================
// Bucket Price Ladder Library
// Deterministic WAD arithmetic and bucket index/price conversion
// ============================================================================

//! # Bucket Price Ladder
//!
//! The numeric core that translates between human-meaningful prices and the
//! discrete fenwick indices of a lending protocol's price ladder.
//!
//! ## Features
//!
//! - **WAD fixed-point arithmetic** over arbitrary-precision integers, with
//!   the half-up rounding of the on-chain reference
//! - **Embedded price ladder** of 7389 canonical bucket prices, bit-exact
//!   with the authoritative fixed-point power function
//! - **Index/price conversion** with a round trip that never disagrees with
//!   the ladder
//! - **Regeneration** of ladders for other price-domain constants
//!
//! Everything is pure and synchronous: no I/O and no shared mutable state.
//!
//! ## Example
//!
//! ```rust
//! use bucket_price_ladder::prelude::*;
//!
//! // A caller-supplied target price snaps to its canonical bucket
//! let target = to_wad("2000").unwrap();
//! let index = price_to_index(&target).unwrap();
//! assert_eq!(index, 2632);
//!
//! let price = index_to_price(index).unwrap();
//! assert_eq!(from_wad(&price), "2000.221618840727700609");
//!
//! // WAD arithmetic rounds half up
//! assert_eq!(wmul(&to_wad("2").unwrap(), &to_wad("3").unwrap()), to_wad("6").unwrap());
//! ```

pub mod converter;
pub mod domain;
pub mod ladder;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::converter::{index_to_price, price_to_index, IndexPriceConverter};
    pub use crate::domain::{PriceDomain, MAX_BUCKET_INDEX, MAX_FENWICK_INDEX, MIN_BUCKET_INDEX};
    pub use crate::ladder::{BucketPriceLadder, LadderError};
    pub use crate::numeric::{
        from_wad, max, min, to_wad, wdiv, wmul, NumericError, NumericResult, Wad,
    };
}

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_end_to_end_target_price() {
        // Caller supplies a target price of 2000
        let target = to_wad("2000").unwrap();
        let index = price_to_index(&target).unwrap();
        assert_eq!(index, 2632);

        // The lookup returns the canonical bucket price, not the target
        let canonical = index_to_price(index).unwrap();
        assert_eq!(canonical, to_wad("2000.221618840727700609").unwrap());
        assert_ne!(canonical, target);

        // And the canonical price maps back to the same bucket
        assert_eq!(price_to_index(&canonical).unwrap(), index);
    }

    #[test]
    fn test_validation_before_work() {
        assert_eq!(
            to_wad("12abc").and_then(|p| price_to_index(&p)),
            Err(NumericError::InvalidNumberFormat)
        );
        assert_eq!(
            to_wad("1222333444").and_then(|p| price_to_index(&p)),
            Err(NumericError::PriceOutOfBounds)
        );
    }

    #[test]
    fn test_concurrent_readers_agree() {
        let converter = IndexPriceConverter::standard();
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                thread::spawn(move || {
                    (worker..=MAX_FENWICK_INDEX as i64)
                        .step_by(97)
                        .map(|index| {
                            let price = index_to_price(index).unwrap();
                            price_to_index(&price).unwrap() == index
                        })
                        .all(|ok| ok)
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert!(Arc::ptr_eq(converter.ladder(), &BucketPriceLadder::standard()));
    }

    #[test]
    fn test_regenerated_ladder_converts_identically() {
        let regenerated = Arc::new(BucketPriceLadder::generate(PriceDomain::standard()).unwrap());
        let converter = IndexPriceConverter::new(regenerated).unwrap();

        for literal in ["2000", "100.0", "1.0", "0.00682", "0.0000001", "999999999"] {
            let price = to_wad(literal).unwrap();
            assert_eq!(
                converter.price_to_index(&price).unwrap(),
                price_to_index(&price).unwrap(),
                "price {}",
                literal
            );
        }
    }
}
