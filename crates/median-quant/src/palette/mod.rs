//! Palette types and the median-cut palette builder.
//!
//! [`Histogram`] collapses an image into its distinct colors, [`median_cut`]
//! reduces those to a color budget, and [`Palette`] stores the result with
//! the per-entry precomputation the pixel mapper needs.

mod error;
mod histogram;
mod median_cut;
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use histogram::{Histogram, HistogramEntry};
pub use median_cut::median_cut;
pub use palette::{Palette, MAX_COLORS};
