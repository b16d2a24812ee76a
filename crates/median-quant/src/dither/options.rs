//! Dithering options.

/// Configuration for error diffusion.
///
/// # Example
///
/// ```
/// use median_quant::DitherOptions;
///
/// let options = DitherOptions::new().error_clamp(0.3);
/// assert_eq!(options.error_clamp, 0.3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DitherOptions {
    /// Maximum overshoot per channel, in linear RGB and alpha units.
    ///
    /// A pixel plus its accumulated error is clamped to
    /// `[-error_clamp, 1.0 + error_clamp]` before matching, which keeps large
    /// quantization errors from "blooming" across small palettes.
    ///
    /// Default: `0.5`
    pub error_clamp: f32,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self { error_clamp: 0.5 }
    }
}

impl DitherOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error clamp. Negative values become `0.0` and NaN becomes
    /// `0.0`; `f32::INFINITY` disables clamping.
    #[inline]
    pub fn error_clamp(mut self, clamp: f32) -> Self {
        self.error_clamp = if clamp.is_nan() { 0.0 } else { clamp.max(0.0) };
        self
    }
}
