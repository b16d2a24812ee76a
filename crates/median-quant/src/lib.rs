// Generated LUT tables carry more digits than f32 keeps.
#![allow(clippy::excessive_precision, clippy::module_inception)]

//! median-quant: median-cut palette quantization with error diffusion
//!
//! This library reduces a true-color RGBA image to at most 256 colors and
//! produces a palette-indexed image ready for an indexed-color encoder.
//!
//! # Quick Start
//!
//! The [`Quantizer`] builder is the primary entry point:
//!
//! ```
//! use median_quant::{Quantizer, Rgba8, SourceImage};
//!
//! let pixels = vec![Rgba8::opaque(128, 128, 128); 16];
//! let image = SourceImage::new(4, 4, pixels).unwrap();
//!
//! let result = Quantizer::new(16).unwrap().quantize(&image).unwrap();
//! assert_eq!(result.width(), 4);
//! assert_eq!(result.palette().len(), 1);
//! ```
//!
//! # Pipeline
//!
//! Two phases run once each, in order:
//!
//! 1. **Palette builder** ([`Quantizer::build_palette`]): count distinct
//!    colors into a [`Histogram`], then [`median_cut`] repeatedly splits the
//!    color region with the largest population-weighted variance at its
//!    weighted median until the budget is reached. Each region contributes
//!    its mean color.
//! 2. **Pixel mapper** ([`Quantizer::remap`]): map each pixel to its nearest
//!    [`Palette`] entry, either directly or with error diffusion using one of
//!    the kernels selected by [`DitherAlgorithm`].
//!
//! The palette is fixed before mapping begins; nothing flows back.
//!
//! # Transparency
//!
//! With transparency preservation enabled, alpha is kept. If the image has a
//! fully transparent pixel, palette index 0 is reserved for
//! [`Rgba8::TRANSPARENT`] and every fully transparent pixel maps to it.
//! Without preservation, pixels are composited ("Source Over") onto an
//! opaque background before either phase sees them.
//!
//! # Color Spaces
//!
//! | Space | Used for |
//! |-------|----------|
//! | [`Rgba8`] / [`Srgb`] | input, palette entries, output |
//! | [`LinearRgb`] | error diffusion (error is a difference in light) |
//! | [`Oklab`] | nearest-color matching (perceptual distance) |
//!
//! The nearest-color distance is squared Euclidean distance in Oklab plus the
//! squared alpha difference. Equidistant entries resolve to the lowest index.

pub mod api;
pub mod color;
pub mod dither;
pub mod image;
pub mod output;
pub mod palette;


pub use api::{QuantizeError, Quantizer};
pub use color::{LinearRgb, Oklab, Rgba8, Srgb};
pub use dither::{DitherAlgorithm, DitherOptions, Kernel, UnknownAlgorithmError};
pub use image::SourceImage;
pub use output::IndexedImage;
pub use palette::{
    median_cut, Histogram, HistogramEntry, Palette, PaletteError, ParseColorError, MAX_COLORS,
};
