use crate::color::Rgba8;
use crate::palette::Palette;

/// Palette indices with dimensions and the owning palette.
///
/// Indices are row-major and each is `< palette().len()`.
///
/// ```
/// use median_quant::{IndexedImage, Palette, Rgba8};
///
/// let palette = Palette::new(&[Rgba8::opaque(0, 0, 0), Rgba8::opaque(255, 255, 255)]).unwrap();
/// let image = IndexedImage::new(vec![0, 1, 1, 0], 2, 2, palette);
///
/// assert_eq!(image.indices(), &[0, 1, 1, 0]);
/// assert_eq!(image.to_rgba().len(), 2 * 2 * 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedImage {
    indices: Vec<u8>,
    width: u32,
    height: u32,
    palette: Palette,
}

impl IndexedImage {
    /// # Panics
    ///
    /// If `indices.len() != width * height` or any index is outside the
    /// palette.
    pub fn new(indices: Vec<u8>, width: u32, height: u32, palette: Palette) -> Self {
        assert_eq!(
            indices.len(),
            width as usize * height as usize,
            "index buffer does not match {width}x{height}"
        );
        assert!(
            indices.iter().all(|&i| (i as usize) < palette.len()),
            "index out of range for a {}-color palette",
            palette.len()
        );
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
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
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Palette color at `(x, y)`.
    #[inline]
    pub fn color_at(&self, x: u32, y: u32) -> Rgba8 {
        let idx = self.indices[y as usize * self.width as usize + x as usize];
        self.palette.color(idx as usize)
    }

    /// Expand back to tightly packed RGBA8 bytes through the palette.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.indices.len() * 4);
        for &idx in &self.indices {
            rgba.extend_from_slice(&self.palette.color(idx as usize).to_array());
        }
        rgba
    }

    /// Split into indices and palette, for encoders that take ownership.
    pub fn into_parts(self) -> (Vec<u8>, Palette) {
        (self.indices, self.palette)
    }
}
