//! Palette struct with precomputed color spaces and nearest-color matching.

use std::collections::HashSet;

use super::error::PaletteError;
use crate::color::{LinearRgb, Oklab, Rgba8};

/// Largest palette an 8-bit indexed image can address.
pub const MAX_COLORS: usize = 256;

/// An ordered set of unique RGBA colors.
///
/// Entries are stored as [`Rgba8`] for output, and every color-space
/// conversion the mapper needs is done once here:
/// - LinearRgb + alpha (for error diffusion math)
/// - Oklab (for perceptual distance)
///
/// When built with [`Palette::with_sentinel`], index 0 is the fully
/// transparent sentinel ([`Rgba8::TRANSPARENT`]).
///
/// # Example
///
/// ```
/// use median_quant::{Palette, Rgba8};
///
/// let palette = Palette::new(&[Rgba8::opaque(0, 0, 0), Rgba8::opaque(255, 255, 255)]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.transparent_index(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgba8>,
    linear: Vec<LinearRgb>,
    oklab: Vec<Oklab>,
    alpha: Vec<f32>,
    transparent_index: Option<usize>,
}

impl Palette {
    /// Create a palette from unique colors.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyPalette`] if `colors` is empty
    /// - [`PaletteError::TooManyColors`] above [`MAX_COLORS`] entries
    /// - [`PaletteError::DuplicateColor`] if any color repeats
    pub fn new(colors: &[Rgba8]) -> Result<Self, PaletteError> {
        Self::build(colors.to_vec(), None)
    }

    /// Create a palette whose index 0 is the transparency sentinel, followed
    /// by `colors`.
    ///
    /// `colors` may be empty, in which case the palette holds only the
    /// sentinel. A `colors` entry equal to the sentinel is a duplicate.
    ///
    /// ```
    /// use median_quant::{Palette, Rgba8};
    ///
    /// let palette = Palette::with_sentinel(&[Rgba8::opaque(255, 0, 0)]).unwrap();
    /// assert_eq!(palette.transparent_index(), Some(0));
    /// assert_eq!(palette.color(0), Rgba8::TRANSPARENT);
    /// assert_eq!(palette.color(1), Rgba8::opaque(255, 0, 0));
    /// ```
    pub fn with_sentinel(colors: &[Rgba8]) -> Result<Self, PaletteError> {
        let mut all = Vec::with_capacity(colors.len() + 1);
        all.push(Rgba8::TRANSPARENT);
        all.extend_from_slice(colors);
        Self::build(all, Some(0))
    }

    fn build(colors: Vec<Rgba8>, transparent_index: Option<usize>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        if colors.len() > MAX_COLORS {
            return Err(PaletteError::TooManyColors {
                len: colors.len(),
                max: MAX_COLORS,
            });
        }

        let mut seen = HashSet::with_capacity(colors.len());
        for (i, color) in colors.iter().enumerate() {
            if !seen.insert(*color) {
                return Err(PaletteError::DuplicateColor { index: i });
            }
        }

        let linear: Vec<LinearRgb> = colors.iter().map(|c| LinearRgb::from(c.rgb())).collect();
        let oklab: Vec<Oklab> = linear.iter().map(|&l| Oklab::from(l)).collect();
        let alpha: Vec<f32> = colors.iter().map(|c| c.a as f32 / 255.0).collect();

        Ok(Self {
            colors,
            linear,
            oklab,
            alpha,
            transparent_index,
        })
    }

    /// Returns the number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`: empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn colors(&self) -> &[Rgba8] {
        &self.colors
    }

    #[inline]
    pub fn color(&self, idx: usize) -> Rgba8 {
        self.colors[idx]
    }

    /// Entry color in linear RGB.
    #[inline]
    pub fn linear(&self, idx: usize) -> LinearRgb {
        self.linear[idx]
    }

    #[inline]
    pub fn oklab(&self, idx: usize) -> Oklab {
        self.oklab[idx]
    }

    /// Entry alpha in 0.0..=1.0.
    #[inline]
    pub fn alpha(&self, idx: usize) -> f32 {
        self.alpha[idx]
    }

    /// Index of the transparency sentinel, if one was reserved.
    #[inline]
    pub fn transparent_index(&self) -> Option<usize> {
        self.transparent_index
    }

    /// Whether any entry is less than fully opaque.
    pub fn has_alpha(&self) -> bool {
        self.colors.iter().any(|c| !c.is_opaque())
    }

    /// Perceptual distance between a color and palette entry `idx`:
    /// squared Oklab distance plus squared alpha difference.
    #[inline]
    pub fn distance(&self, color: Oklab, alpha: f32, idx: usize) -> f32 {
        let da = alpha - self.alpha[idx];
        color.distance_squared(self.oklab[idx]) + da * da
    }

    /// Find the palette entry nearest to `color` with the given alpha.
    ///
    /// Returns `(index, distance)`. Equidistant entries resolve to the lowest
    /// index.
    ///
    /// ```
    /// use median_quant::{LinearRgb, Oklab, Palette, Rgba8};
    ///
    /// let palette = Palette::new(&[Rgba8::opaque(0, 0, 0), Rgba8::opaque(255, 255, 255)]).unwrap();
    /// let dark = Oklab::from(LinearRgb::new(0.05, 0.05, 0.05));
    /// assert_eq!(palette.find_nearest(dark, 1.0).0, 0);
    /// ```
    #[inline]
    pub fn find_nearest(&self, color: Oklab, alpha: f32) -> (usize, f32) {
        // Linear scan; at most 256 entries.
        let mut best_idx = 0;
        let mut best_dist = f32::INFINITY;
        for i in 0..self.colors.len() {
            let dist = self.distance(color, alpha, i);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }
        (best_idx, best_dist)
    }

    /// Nearest entry to an 8-bit pixel.
    #[inline]
    pub fn find_nearest_rgba(&self, pixel: Rgba8) -> usize {
        let lab = Oklab::from(LinearRgb::from(pixel.rgb()));
        self.find_nearest(lab, pixel.a as f32 / 255.0).0
    }
}
