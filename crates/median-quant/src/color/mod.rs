//! Color types and conversion utilities
//!
//! Pixels enter and leave the crate as [`Rgba8`]: straight (unpremultiplied)
//! 8-bit sRGB with an 8-bit alpha channel. Internally the pipeline works in
//! three spaces:
//!
//! - **sRGB** ([`Srgb`]): gamma-encoded storage form, used for palette
//!   entries and byte-exact comparisons.
//! - **Linear RGB** ([`LinearRgb`]): light intensity. Quantization error is
//!   accumulated and diffused here because light adds linearly.
//! - **Oklab** ([`Oklab`]): perceptually uniform. Nearest-color matching
//!   measures distance here.
//!
//! # Example
//!
//! ```
//! use median_quant::{LinearRgb, Oklab, Rgba8};
//!
//! let px = Rgba8::new(128, 64, 32, 255);
//! let linear = LinearRgb::from(px.rgb());
//! let lab = Oklab::from(linear);
//! assert!(lab.l > 0.0 && lab.l < 1.0);
//! ```

mod linear_rgb;
mod lut;
mod oklab;
mod rgba;
mod srgb;

pub use linear_rgb::LinearRgb;
pub use oklab::Oklab;
pub use rgba::Rgba8;
pub use srgb::Srgb;
