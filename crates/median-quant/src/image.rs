//! The read-only source image and the shared pixel preparation step.

use crate::api::QuantizeError;
use crate::color::Rgba8;

/// A decoded, immutable RGBA image.
///
/// Pixels are stored row-major with the origin at the top-left corner.
/// Both the palette builder and the pixel mapper read it; neither mutates
/// it.
///
/// ```
/// use median_quant::{Rgba8, SourceImage};
///
/// let image = SourceImage::new(2, 1, vec![Rgba8::opaque(1, 2, 3), Rgba8::TRANSPARENT]).unwrap();
/// assert!(image.has_fully_transparent());
/// assert_eq!(image.pixel(1, 0), Rgba8::TRANSPARENT);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl SourceImage {
    /// Wrap a row-major pixel buffer.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::DimensionMismatch`] if `pixels.len()` is not
    /// `width * height`. Zero-sized images are accepted here and rejected
    /// when a palette is built.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgba8>) -> Result<Self, QuantizeError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(QuantizeError::DimensionMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from tightly packed RGBA8 bytes (4 bytes per pixel).
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, QuantizeError> {
        let expected = width as usize * height as usize;
        if bytes.len() != expected * 4 {
            return Err(QuantizeError::DimensionMismatch {
                expected,
                actual: bytes.len() / 4,
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| Rgba8::new(c[0], c[1], c[2], c[3]))
            .collect();
        Self::new(width, height, pixels)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// True when every pixel has alpha 255.
    pub fn is_opaque(&self) -> bool {
        self.pixels.iter().all(|p| p.is_opaque())
    }

    /// True when at least one pixel has alpha below 255.
    pub fn has_transparency(&self) -> bool {
        !self.is_opaque()
    }

    /// True when at least one pixel has alpha 0.
    pub fn has_fully_transparent(&self) -> bool {
        self.pixels.iter().any(|p| p.is_transparent())
    }
}

/// How pixels are normalized before histogramming and before mapping.
///
/// Chosen once per image, then applied identically by the palette builder
/// and the pixel mapper so the two never disagree about what a pixel is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AlphaMode {
    /// Alpha is kept. Fully transparent pixels collapse to
    /// [`Rgba8::TRANSPARENT`], which is the sentinel when the palette has one.
    Keep,
    /// No sentinel: every pixel is composited over this opaque background.
    Composite(Rgba8),
}

impl AlphaMode {
    #[inline]
    pub(crate) fn prepare(self, pixel: Rgba8) -> Rgba8 {
        match self {
            AlphaMode::Keep if pixel.is_transparent() => Rgba8::TRANSPARENT,
            AlphaMode::Keep => pixel,
            AlphaMode::Composite(background) => pixel.composite_over(background),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_length_mismatch() {
        assert_eq!(
            SourceImage::new(2, 2, vec![Rgba8::WHITE; 3]),
            Err(QuantizeError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_from_rgba_bytes() {
        let image = SourceImage::from_rgba_bytes(2, 1, &[1, 2, 3, 255, 4, 5, 6, 0]).unwrap();
        assert_eq!(image.pixels(), &[Rgba8::opaque(1, 2, 3), Rgba8::new(4, 5, 6, 0)]);
        assert!(SourceImage::from_rgba_bytes(2, 1, &[0; 7]).is_err());
    }

    #[test]
    fn test_opacity_queries() {
        let opaque = SourceImage::new(1, 2, vec![Rgba8::WHITE, Rgba8::opaque(0, 0, 0)]).unwrap();
        assert!(opaque.is_opaque());
        assert!(!opaque.has_transparency());

        assert!(!opaque.has_fully_transparent());

        let translucent = SourceImage::new(1, 1, vec![Rgba8::new(0, 0, 0, 254)]).unwrap();
        assert!(translucent.has_transparency());
        assert!(!translucent.has_fully_transparent());

        let holey = SourceImage::new(2, 1, vec![Rgba8::WHITE, Rgba8::new(9, 9, 9, 0)]).unwrap();
        assert!(holey.has_fully_transparent());
    }

    #[test]
    fn test_zero_sized_image_is_constructible() {
        let image = SourceImage::new(0, 5, Vec::new()).unwrap();
        assert!(image.is_empty());
        assert!(image.is_opaque());
    }

    #[test]
    fn test_keep_mode_collapses_only_fully_transparent() {
        assert_eq!(AlphaMode::Keep.prepare(Rgba8::new(200, 10, 10, 0)), Rgba8::TRANSPARENT);
        let half = Rgba8::new(200, 10, 10, 128);
        assert_eq!(AlphaMode::Keep.prepare(half), half);
    }

    #[test]
    fn test_composite_mode_flattens_alpha() {
        let mode = AlphaMode::Composite(Rgba8::WHITE);
        assert_eq!(mode.prepare(Rgba8::new(9, 9, 9, 0)), Rgba8::WHITE);
        assert_eq!(mode.prepare(Rgba8::opaque(9, 8, 7)), Rgba8::opaque(9, 8, 7));
        assert!(mode.prepare(Rgba8::new(0, 0, 0, 100)).is_opaque());
    }
}
