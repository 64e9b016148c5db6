// ============================================================================
// Ladder Module
// The bucket price table and the procedure that regenerates it
// ============================================================================
//
// The embedded table is a versioned data asset: regenerate it with
// `BucketPriceLadder::generate` whenever the price-domain constants change.

mod errors;
pub mod generator;
mod price_ladder;

pub use errors::LadderError;
pub use price_ladder::BucketPriceLadder;
