// ============================================================================
// Converter Module
// Fenwick index <-> price conversion over a bucket price ladder
// ============================================================================

mod index_price;

pub use index_price::{index_to_price, price_to_index, IndexPriceConverter};
