//! Distinct-color histogram.

use std::collections::HashMap;

use crate::color::Rgba8;

/// One distinct color and the number of pixels that carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramEntry {
    pub color: Rgba8,
    pub count: u64,
}

/// Population counts of every distinct color in a pixel stream.
///
/// Entries are sorted by color so that downstream work never depends on
/// hash iteration order.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    entries: Vec<HistogramEntry>,
}

impl Histogram {
    /// Count the colors produced by `pixels`.
    pub fn from_pixels<I>(pixels: I) -> Self
    where
        I: IntoIterator<Item = Rgba8>,
    {
        let mut counts: HashMap<Rgba8, u64> = HashMap::new();
        for px in pixels {
            *counts.entry(px).or_insert(0) += 1;
        }

        let mut entries: Vec<HistogramEntry> = counts
            .into_iter()
            .map(|(color, count)| HistogramEntry { color, count })
            .collect();
        entries.sort_unstable_by_key(|e| e.color);

        Self { entries }
    }

    pub fn into_entries(self) -> Vec<HistogramEntry> {
        self.entries
    }

    /// Number of distinct colors.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
