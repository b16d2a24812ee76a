//! 8-bit RGBA pixel type.

use super::srgb::Srgb;

/// A straight-alpha sRGB pixel with 8 bits per channel.
///
/// This is the unit the quantizer consumes and the palette stores. Ordering
/// is lexicographic over `(r, g, b, a)`, which gives histograms and palettes
/// a deterministic order independent of hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// The canonical fully transparent color, used as the transparency
    /// sentinel at palette index 0.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Opaque white, the default compositing background.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque pixel.
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    #[inline]
    pub const fn from_array(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// The color channels as [`Srgb`], ignoring alpha.
    #[inline]
    pub fn rgb(self) -> Srgb {
        Srgb::from_u8(self.r, self.g, self.b)
    }

    /// "Source Over" compositing onto `background`.
    ///
    /// The background is treated as opaque (its alpha is ignored), so the
    /// result is always opaque. Each channel is
    /// `round((c * a + bg * (255 - a)) / 255)`.
    ///
    /// ```
    /// use median_quant::Rgba8;
    ///
    /// let half_black = Rgba8::new(0, 0, 0, 128);
    /// assert_eq!(half_black.composite_over(Rgba8::WHITE), Rgba8::opaque(127, 127, 127));
    /// ```
    #[inline]
    pub fn composite_over(self, background: Rgba8) -> Rgba8 {
        let a = self.a as u32;
        let inv = 255 - a;
        let blend = |c: u8, bg: u8| ((c as u32 * a + bg as u32 * inv + 127) / 255) as u8;
        Rgba8::opaque(
            blend(self.r, background.r),
            blend(self.g, background.g),
            blend(self.b, background.b),
        )
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(c: [u8; 4]) -> Self {
        Self::from_array(c)
    }
}
