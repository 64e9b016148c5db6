// ============================================================================
// Domain Module
// Price-domain configuration shared by the ladder and the converter
// ============================================================================

pub mod config;

pub use config::{PriceDomain, MAX_BUCKET_INDEX, MAX_FENWICK_INDEX, MIN_BUCKET_INDEX};
