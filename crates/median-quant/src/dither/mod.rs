//! The pixel mapper: direct nearest-color mapping and error diffusion.
//!
//! Both passes walk the image row-major, left to right and top to bottom.
//! Matching is done in Oklab (plus alpha); quantization error is measured
//! and diffused in linear RGB (plus alpha), since it stands for a
//! difference in emitted light.
//!
//! The diffusion pass is strictly sequential: every pixel's effective color
//! depends on the error already pushed into it by earlier pixels.

mod kernel;
mod options;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::color::{LinearRgb, Oklab, Rgba8};
use crate::image::AlphaMode;
use crate::palette::Palette;

pub use kernel::*;
pub use options::DitherOptions;

/// Mapping strategy, selected once per run.
///
/// `None` maps every pixel to its nearest palette entry; every other variant
/// diffuses error through its [`Kernel`].
///
/// ```
/// use median_quant::DitherAlgorithm;
///
/// let algorithm: DitherAlgorithm = "floyd-steinberg".parse().unwrap();
/// assert_eq!(algorithm.kernel().map(|k| k.divisor), Some(16));
/// assert!(DitherAlgorithm::None.kernel().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DitherAlgorithm {
    /// No dithering.
    None,
    FloydSteinberg,
    /// Sierra Lite: three taps, cheap, close to Floyd-Steinberg.
    #[default]
    SierraLite,
    SierraTwoRow,
    Sierra,
    JarvisJudiceNinke,
    Stucki,
    Burkes,
    /// Atkinson drops a quarter of the error.
    Atkinson,
}

impl DitherAlgorithm {
    pub const ALL: [DitherAlgorithm; 9] = [
        DitherAlgorithm::None,
        DitherAlgorithm::FloydSteinberg,
        DitherAlgorithm::SierraLite,
        DitherAlgorithm::SierraTwoRow,
        DitherAlgorithm::Sierra,
        DitherAlgorithm::JarvisJudiceNinke,
        DitherAlgorithm::Stucki,
        DitherAlgorithm::Burkes,
        DitherAlgorithm::Atkinson,
    ];

    /// The diffusion kernel, or `None` for direct mapping.
    pub fn kernel(self) -> Option<&'static Kernel> {
        match self {
            DitherAlgorithm::None => None,
            DitherAlgorithm::FloydSteinberg => Some(&FLOYD_STEINBERG),
            DitherAlgorithm::SierraLite => Some(&SIERRA_LITE),
            DitherAlgorithm::SierraTwoRow => Some(&SIERRA_TWO_ROW),
            DitherAlgorithm::Sierra => Some(&SIERRA),
            DitherAlgorithm::JarvisJudiceNinke => Some(&JARVIS_JUDICE_NINKE),
            DitherAlgorithm::Stucki => Some(&STUCKI),
            DitherAlgorithm::Burkes => Some(&BURKES),
            DitherAlgorithm::Atkinson => Some(&ATKINSON),
        }
    }

    /// Kebab-case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            DitherAlgorithm::None => "none",
            DitherAlgorithm::FloydSteinberg => "floyd-steinberg",
            DitherAlgorithm::SierraLite => "sierra-lite",
            DitherAlgorithm::SierraTwoRow => "sierra-two-row",
            DitherAlgorithm::Sierra => "sierra",
            DitherAlgorithm::JarvisJudiceNinke => "jarvis-judice-ninke",
            DitherAlgorithm::Stucki => "stucki",
            DitherAlgorithm::Burkes => "burkes",
            DitherAlgorithm::Atkinson => "atkinson",
        }
    }
}

impl fmt::Display for DitherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a dither algorithm name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dither algorithm {0:?}")]
pub struct UnknownAlgorithmError(pub String);

impl FromStr for DitherAlgorithm {
    type Err = UnknownAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        DitherAlgorithm::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| UnknownAlgorithmError(s.to_string()))
    }
}

/// Sliding window of per-pixel error rows.
///
/// Only the `max_dy + 1` rows a kernel can reach are kept. Each cell holds
/// linear R, G, B and alpha error. The buffer lives for one mapping pass.
#[derive(Debug)]
pub struct ErrorBuffer {
    /// `rows[0]` is the row being scanned.
    rows: Vec<Vec<[f32; 4]>>,
    width: usize,
}

impl ErrorBuffer {
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth.max(1)).map(|_| vec![[0.0; 4]; width]).collect(),
            width,
        }
    }

    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 4] {
        self.rows[0][x]
    }

    /// Add error to column `x`, `row_offset` rows below the current one.
    /// Out-of-range targets are ignored.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 4]) {
        if x < self.width && row_offset < self.rows.len() {
            let cell = &mut self.rows[row_offset][x];
            for (c, e) in cell.iter_mut().zip(error) {
                *c += e;
            }
        }
    }

    /// Drop the current row and open a zeroed one at the far end.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 4]);
        }
    }
}

#[inline]
pub(crate) fn clamp_channel(value: f32, max_error: f32) -> f32 {
    value.clamp(-max_error, 1.0 + max_error)
}

/// Map every pixel to its nearest palette entry.
///
/// Matching is memoized per distinct prepared color. With a transparency
/// sentinel, fully transparent pixels go straight to it.
pub(crate) fn map_direct(pixels: &[Rgba8], palette: &Palette, mode: AlphaMode) -> Vec<u8> {
    let sentinel = palette.transparent_index();
    let mut cache: HashMap<Rgba8, u8> = HashMap::new();

    pixels
        .iter()
        .map(|&raw| {
            let pixel = mode.prepare(raw);
            match sentinel {
                Some(t) if pixel.is_transparent() => t as u8,
                _ => *cache
                    .entry(pixel)
                    .or_insert_with(|| palette.find_nearest_rgba(pixel) as u8),
            }
        })
        .collect()
}

/// Error diffusion over the whole image with the given kernel.
///
/// For each pixel: add accumulated error, clamp, pick the nearest entry,
/// then push `(adjusted - chosen) * weight / divisor` to each in-bounds tap.
/// With a transparency sentinel, fully transparent pixels take it directly,
/// discard their accumulated error and diffuse nothing.
pub(crate) fn dither_with_kernel(
    pixels: &[Rgba8],
    width: usize,
    height: usize,
    palette: &Palette,
    mode: AlphaMode,
    kernel: &Kernel,
    options: &DitherOptions,
) -> Vec<u8> {
    let sentinel = palette.transparent_index();
    let clamp = options.error_clamp;
    let divisor = kernel.divisor as f32;

    let mut output = vec![0u8; width * height];
    let mut errors = ErrorBuffer::new(width, kernel.max_dy + 1);

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let pixel = mode.prepare(pixels[idx]);

            if let Some(t) = sentinel {
                if pixel.is_transparent() {
                    output[idx] = t as u8;
                    continue;
                }
            }

            let acc = errors.get_accumulated(x);
            let source = LinearRgb::from(pixel.rgb());
            let adjusted = [
                clamp_channel(source.r + acc[0], clamp),
                clamp_channel(source.g + acc[1], clamp),
                clamp_channel(source.b + acc[2], clamp),
                clamp_channel(pixel.a as f32 / 255.0 + acc[3], clamp),
            ];

            let lab = Oklab::from(LinearRgb::new(adjusted[0], adjusted[1], adjusted[2]));
            let (nearest, _) = palette.find_nearest(lab, adjusted[3].clamp(0.0, 1.0));
            output[idx] = nearest as u8;

            let chosen = palette.linear(nearest);
            let error = [
                adjusted[0] - chosen.r,
                adjusted[1] - chosen.g,
                adjusted[2] - chosen.b,
                adjusted[3] - palette.alpha(nearest),
            ];

            for &(dx, dy, weight) in kernel.entries {
                let nx = x as i32 + dx;
                let dy = dy as usize;
                if nx < 0 || nx as usize >= width || y + dy >= height {
                    continue;
                }
                let share = weight as f32 / divisor;
                errors.add_error(nx as usize, dy, error.map(|e| e * share));
            }
        }
        errors.advance_row();
    }

    output
}
