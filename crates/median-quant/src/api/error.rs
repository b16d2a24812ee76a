//! Unified error type for the median-quant public API.

use thiserror::Error;

use crate::palette::PaletteError;

/// Errors surfaced by [`Quantizer`](crate::Quantizer) and
/// [`SourceImage`](crate::SourceImage).
///
/// All of these are detected before any pixel is mapped.
///
/// ```
/// use median_quant::{QuantizeError, Quantizer};
///
/// assert_eq!(Quantizer::new(0).err(), Some(QuantizeError::UnsupportedColorCount(0)));
/// assert!(Quantizer::new(256).is_ok());
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuantizeError {
    /// Color budget outside `1..=256`.
    #[error("color count must be between 1 and 256, got {0}")]
    UnsupportedColorCount(usize),

    /// The image has zero width or zero height.
    #[error("image has no pixels")]
    EmptyImage,

    /// Pixel buffer length does not match `width * height`.
    #[error("pixel buffer holds {actual} pixels, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The selected colors did not form a valid palette.
    #[error("palette error: {0}")]
    Palette(#[from] PaletteError),
}
