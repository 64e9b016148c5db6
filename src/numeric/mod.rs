// ============================================================================
// Numeric Module
// WAD fixed-point arithmetic for exact financial calculations
// ============================================================================
//
// This module provides:
// - Wad: 18-decimal fixed-point value over an arbitrary-precision integer
// - to_wad/from_wad/wmul/wdiv/min/max: the WAD arithmetic surface
// - log2_ratio: extended-precision binary logarithm of a rational
// - NumericError: Error types for arithmetic and conversion
//
// Design principles:
// - No floating-point operations
// - Full-width products before a single explicit rounding step
// - All fallible operations return Result (no panics)

mod errors;
mod log2;
mod wad;

pub use errors::{NumericError, NumericResult};
pub use log2::{log2_ratio, LOG2_FRACTION_BITS};
pub use wad::{from_wad, max, min, to_wad, wdiv, wmul, Wad, WAD_DECIMALS, WAD_SCALE};

pub(crate) use wad::{wad_scale, wad_scale_squared};
