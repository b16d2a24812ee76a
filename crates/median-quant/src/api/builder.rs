//! Quantizer builder, the entry point for the crate.
//!
//! [`Quantizer`] runs the two phases in order: build a palette once over the
//! whole image, then map every pixel onto that fixed palette.

use tracing::debug;

use super::QuantizeError;
use crate::color::Rgba8;
use crate::dither::{dither_with_kernel, map_direct, DitherAlgorithm, DitherOptions};
use crate::image::{AlphaMode, SourceImage};
use crate::output::IndexedImage;
use crate::palette::{median_cut, Histogram, Palette, MAX_COLORS};

/// Palette quantizer with fluent configuration.
///
/// - [`new`](Self::new) validates the color budget up front
/// - setters consume and return `self`
/// - [`quantize`](Self::quantize) takes `&self`, so one quantizer can be
///   reused across images
///
/// # Transparency
///
/// With [`preserve_transparency`](Self::preserve_transparency) on, alpha is
/// kept. If the image also has a fully transparent pixel, palette index 0 is
/// the sentinel [`Rgba8::TRANSPARENT`] and only `max_colors - 1` slots remain
/// for the image's colors; fully transparent pixels always map to it.
/// Semi-transparent pixels take ordinary entries. With preservation off,
/// every pixel is composited over the [`background`](Self::background)
/// before anything else happens.
///
/// # Example
///
/// ```
/// use median_quant::{DitherAlgorithm, Quantizer, Rgba8, SourceImage};
///
/// let pixels = vec![
///     Rgba8::opaque(255, 0, 0),
///     Rgba8::opaque(0, 255, 0),
///     Rgba8::opaque(0, 0, 255),
///     Rgba8::opaque(255, 255, 255),
/// ];
/// let image = SourceImage::new(2, 2, pixels.clone()).unwrap();
///
/// let result = Quantizer::new(4)?
///     .dither(DitherAlgorithm::None)
///     .quantize(&image)?;
///
/// assert_eq!(result.palette().len(), 4);
/// for (i, &idx) in result.indices().iter().enumerate() {
///     assert_eq!(result.palette().color(idx as usize), pixels[i]);
/// }
/// # Ok::<(), median_quant::QuantizeError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Quantizer {
    max_colors: usize,
    algorithm: DitherAlgorithm,
    preserve_transparency: bool,
    background: Rgba8,
    options: DitherOptions,
}

impl Quantizer {
    /// Create a quantizer for at most `max_colors` palette entries.
    ///
    /// Defaults: Sierra Lite dithering, transparency flattened onto white,
    /// error clamp 0.5.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::UnsupportedColorCount`] unless `1 <= max_colors <= 256`.
    pub fn new(max_colors: usize) -> Result<Self, QuantizeError> {
        if !(1..=MAX_COLORS).contains(&max_colors) {
            return Err(QuantizeError::UnsupportedColorCount(max_colors));
        }
        Ok(Self {
            max_colors,
            algorithm: DitherAlgorithm::default(),
            preserve_transparency: false,
            background: Rgba8::WHITE,
            options: DitherOptions::default(),
        })
    }

    /// Select the mapping strategy. [`DitherAlgorithm::None`] disables
    /// dithering.
    #[inline]
    pub fn dither(mut self, algorithm: DitherAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[inline]
    pub fn preserve_transparency(mut self, enabled: bool) -> Self {
        self.preserve_transparency = enabled;
        self
    }

    /// Background for compositing when no sentinel is reserved. Its alpha is
    /// ignored.
    #[inline]
    pub fn background(mut self, background: Rgba8) -> Self {
        self.background = Rgba8 {
            a: 255,
            ..background
        };
        self
    }

    #[inline]
    pub fn error_clamp(mut self, clamp: f32) -> Self {
        self.options = self.options.error_clamp(clamp);
        self
    }

    #[inline]
    pub fn max_colors(&self) -> usize {
        self.max_colors
    }

    #[inline]
    pub fn algorithm(&self) -> DitherAlgorithm {
        self.algorithm
    }

    /// Select a palette of at most `max_colors` entries for `image`.
    ///
    /// The result is non-empty, free of duplicates, and never padded: an
    /// image with fewer distinct colors than the budget gets exactly those
    /// colors.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::EmptyImage`] for a zero-sized image.
    pub fn build_palette(&self, image: &SourceImage) -> Result<Palette, QuantizeError> {
        if image.is_empty() {
            return Err(QuantizeError::EmptyImage);
        }

        let mode = self.alpha_mode(None);
        let reserve = self.preserve_transparency && image.has_fully_transparent();
        let budget = if reserve {
            self.max_colors - 1
        } else {
            self.max_colors
        };

        // Sentinel pixels are already covered by index 0.
        let histogram = Histogram::from_pixels(
            image
                .pixels()
                .iter()
                .map(|&p| mode.prepare(p))
                .filter(|p| !(reserve && p.is_transparent())),
        );
        let distinct = histogram.len();
        let colors = median_cut(histogram, budget);

        let palette = if reserve {
            Palette::with_sentinel(&colors)?
        } else {
            Palette::new(&colors)?
        };

        debug!(
            distinct,
            budget,
            palette = palette.len(),
            sentinel = reserve,
            "built palette"
        );
        Ok(palette)
    }

    /// Map every pixel of `image` onto `palette`.
    ///
    /// Alpha is kept when transparency preservation is on or the palette has
    /// a sentinel. Otherwise pixels are composited over the background.
    ///
    /// # Panics
    ///
    /// On an empty palette. [`build_palette`](Self::build_palette) never
    /// produces one.
    pub fn remap(&self, image: &SourceImage, palette: &Palette) -> IndexedImage {
        assert!(!palette.is_empty(), "cannot remap onto an empty palette");

        let mode = self.alpha_mode(Some(palette));
        let width = image.width() as usize;
        let height = image.height() as usize;

        let indices = match self.algorithm.kernel() {
            None => map_direct(image.pixels(), palette, mode),
            Some(kernel) => dither_with_kernel(
                image.pixels(),
                width,
                height,
                palette,
                mode,
                kernel,
                &self.options,
            ),
        };

        debug!(
            width,
            height,
            algorithm = %self.algorithm,
            "mapped pixels"
        );
        IndexedImage::new(indices, image.width(), image.height(), palette.clone())
    }

    /// Alpha is kept when preservation is on or the palette carries a
    /// sentinel; otherwise pixels are flattened onto the background.
    fn alpha_mode(&self, palette: Option<&Palette>) -> AlphaMode {
        let sentinel = palette.is_some_and(|p| p.transparent_index().is_some());
        if self.preserve_transparency || sentinel {
            AlphaMode::Keep
        } else {
            AlphaMode::Composite(self.background)
        }
    }

    /// Build a palette for `image` and map the image onto it.
    pub fn quantize(&self, image: &SourceImage) -> Result<IndexedImage, QuantizeError> {
        let palette = self.build_palette(image)?;
        Ok(self.remap(image, &palette))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gradient(width: u32, height: u32) -> SourceImage {
        let pixels = (0..width * height)
            .map(|i| {
                let v = (i * 255 / (width * height - 1)) as u8;
                Rgba8::opaque(v, v / 2, 255 - v)
            })
            .collect();
        SourceImage::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_color_count_bounds() {
        assert_eq!(Quantizer::new(0), Err(QuantizeError::UnsupportedColorCount(0)));
        assert_eq!(
            Quantizer::new(257),
            Err(QuantizeError::UnsupportedColorCount(257))
        );
        assert!(Quantizer::new(1).is_ok());
        assert!(Quantizer::new(256).is_ok());
    }

    #[test]
    fn test_defaults_and_chaining() {
        let q = Quantizer::new(16).unwrap();
        assert_eq!(q.algorithm(), DitherAlgorithm::SierraLite);
        assert_eq!(q.background, Rgba8::WHITE);
        assert!(!q.preserve_transparency);

        let q = q
            .dither(DitherAlgorithm::Atkinson)
            .preserve_transparency(true)
            .background(Rgba8::new(1, 2, 3, 0))
            .error_clamp(0.25);
        assert_eq!(q.algorithm(), DitherAlgorithm::Atkinson);
        assert!(q.preserve_transparency);
        assert_eq!(q.background, Rgba8::opaque(1, 2, 3));
        assert_eq!(q.options.error_clamp, 0.25);
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let image = SourceImage::new(0, 0, Vec::new()).unwrap();
        let q = Quantizer::new(8).unwrap();
        assert_eq!(q.build_palette(&image), Err(QuantizeError::EmptyImage));
        assert_eq!(q.quantize(&image).err(), Some(QuantizeError::EmptyImage));
    }

    #[test]
    fn test_quantize_is_reusable() {
        let q = Quantizer::new(8).unwrap();
        let image = gradient(16, 16);
        assert_eq!(q.quantize(&image).unwrap(), q.quantize(&image).unwrap());
    }

    #[test]
    fn test_sentinel_reserved_only_for_transparent_images() {
        let q = Quantizer::new(4).unwrap().preserve_transparency(true);

        let opaque = gradient(8, 8);
        let palette = q.build_palette(&opaque).unwrap();
        assert_eq!(palette.transparent_index(), None);
        assert_eq!(palette.len(), 4);

        let mut pixels = opaque.pixels().to_vec();
        pixels[0] = Rgba8::new(255, 255, 255, 0);
        let holey = SourceImage::new(8, 8, pixels).unwrap();
        let palette = q.build_palette(&holey).unwrap();
        assert_eq!(palette.transparent_index(), Some(0));
        assert_eq!(palette.len(), 4);
    }

    #[test]
    fn test_fully_transparent_image_gets_sentinel_only() {
        let image = SourceImage::new(3, 1, vec![Rgba8::new(5, 6, 7, 0); 3]).unwrap();
        let result = Quantizer::new(16)
            .unwrap()
            .preserve_transparency(true)
            .quantize(&image)
            .unwrap();
        assert_eq!(result.palette().colors(), &[Rgba8::TRANSPARENT]);
        assert_eq!(result.indices(), &[0, 0, 0]);
    }

    #[test]
    fn test_without_preservation_alpha_is_flattened() {
        let image = SourceImage::new(
            2,
            1,
            vec![Rgba8::new(0, 0, 0, 0), Rgba8::new(0, 0, 0, 255)],
        )
        .unwrap();
        let result = Quantizer::new(4)
            .unwrap()
            .dither(DitherAlgorithm::None)
            .quantize(&image)
            .unwrap();
        assert!(result.palette().colors().iter().all(|c| c.is_opaque()));
        assert_eq!(result.color_at(0, 0), Rgba8::WHITE);
        assert_eq!(result.color_at(1, 0), Rgba8::opaque(0, 0, 0));
    }

    #[test]
    fn test_semi_transparent_colors_survive_with_sentinel() {
        let half = Rgba8::new(200, 100, 50, 128);
        let image = SourceImage::new(2, 1, vec![half, Rgba8::TRANSPARENT]).unwrap();
        let result = Quantizer::new(4)
            .unwrap()
            .preserve_transparency(true)
            .dither(DitherAlgorithm::None)
            .quantize(&image)
            .unwrap();
        assert_eq!(result.palette().colors(), &[Rgba8::TRANSPARENT, half]);
        assert_eq!(result.indices(), &[1, 0]);
    }

    #[test]
    fn test_semi_transparent_alpha_kept_without_sentinel() {
        let half = Rgba8::new(200, 100, 50, 128);
        let image = SourceImage::new(2, 1, vec![half, Rgba8::opaque(0, 0, 0)]).unwrap();
        let result = Quantizer::new(4)
            .unwrap()
            .preserve_transparency(true)
            .dither(DitherAlgorithm::None)
            .quantize(&image)
            .unwrap();
        assert_eq!(result.palette().transparent_index(), None);
        assert_eq!(result.color_at(0, 0), half);
        assert_eq!(result.color_at(1, 0), Rgba8::opaque(0, 0, 0));
    }

    #[test]
    fn test_remap_onto_foreign_palette() {
        let palette = Palette::new(&[Rgba8::opaque(0, 0, 0), Rgba8::WHITE]).unwrap();
        let image = SourceImage::new(
            2,
            1,
            vec![Rgba8::opaque(10, 10, 10), Rgba8::opaque(250, 250, 250)],
        )
        .unwrap();
        let q = Quantizer::new(2).unwrap().dither(DitherAlgorithm::None);
        assert_eq!(q.remap(&image, &palette).indices(), &[0, 1]);
    }
}
