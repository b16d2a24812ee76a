//! Median-cut palette selection.
//!
//! The color space is partitioned greedily. Every region sits in a max-heap
//! keyed by its split priority: the population-weighted sum of squared
//! deviations along the region's widest channel (variance times
//! population). Each round pops the top region and cuts it at the weighted
//! median of that channel, so both halves carry roughly equal pixel counts.
//! Dense, spread-out clusters therefore earn more palette entries than
//! sparse or tight ones.
//!
//! Splitting stops when the region count reaches the budget or when the top
//! region holds a single distinct color. A region with two or more distinct
//! colors always has a strictly positive priority, so the second condition
//! means no region anywhere can be split.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use super::histogram::{Histogram, HistogramEntry};
use crate::color::Rgba8;

#[inline]
fn channel(color: Rgba8, ch: usize) -> u8 {
    color.to_array()[ch]
}

/// A box in RGBA space together with the histogram entries inside it.
#[derive(Debug)]
struct Region {
    entries: Vec<HistogramEntry>,
    population: u64,
    sums: [u64; 4],
    /// Channel with the largest spread (0=R, 1=G, 2=B, 3=A).
    widest: usize,
    priority: f64,
    /// Creation order; older regions win priority ties.
    seq: usize,
}

impl Region {
    fn new(entries: Vec<HistogramEntry>, seq: usize) -> Self {
        let mut population = 0u64;
        let mut sums = [0u64; 4];
        let mut sq_sums = [0u128; 4];

        for e in &entries {
            population += e.count;
            for (ch, &c) in e.color.to_array().iter().enumerate() {
                let c = c as u64;
                sums[ch] += c * e.count;
                sq_sums[ch] += (c * c) as u128 * e.count as u128;
            }
        }

        // n * SSE = n * sum(w c^2) - (sum(w c))^2, exact in integers.
        let mut widest = 0;
        let mut widest_scaled = 0u128;
        for ch in 0..4 {
            let s = sums[ch] as u128;
            let scaled = (population as u128 * sq_sums[ch]).saturating_sub(s * s);
            if scaled > widest_scaled {
                widest = ch;
                widest_scaled = scaled;
            }
        }
        let priority = if population == 0 {
            0.0
        } else {
            widest_scaled as f64 / population as f64
        };

        Self {
            entries,
            population,
            sums,
            widest,
            priority,
            seq,
        }
    }

    #[inline]
    fn is_splittable(&self) -> bool {
        self.entries.len() >= 2
    }

    /// Population-weighted mean color, rounded to nearest.
    fn mean(&self) -> Rgba8 {
        let n = self.population.max(1);
        let avg = |ch: usize| ((self.sums[ch] + n / 2) / n) as u8;
        Rgba8::new(avg(0), avg(1), avg(2), avg(3))
    }

    /// Cut at the weighted median of the widest channel.
    ///
    /// Both halves are non-empty. Callers must check [`Self::is_splittable`].
    fn split(mut self, next_seq: &mut usize) -> (Region, Region) {
        let ch = self.widest;
        self.entries
            .sort_unstable_by_key(|e| (channel(e.color, ch), e.color));

        let mut accumulated = 0u64;
        let mut cut = 1;
        for (i, e) in self.entries.iter().enumerate() {
            accumulated += e.count;
            if accumulated * 2 >= self.population {
                cut = i + 1;
                break;
            }
        }
        let cut = cut.clamp(1, self.entries.len() - 1);

        let upper = self.entries.split_off(cut);
        let lower = Region::new(self.entries, *next_seq);
        let upper = Region::new(upper, *next_seq + 1);
        *next_seq += 2;
        (lower, upper)
    }
}

impl Ord for Region {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Region {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Region {}

/// Order by descending population (then by color) and drop repeats.
///
/// Two regions can round to the same mean; the more populous one keeps the
/// slot.
fn finish(mut colors: Vec<(Rgba8, u64)>) -> Vec<Rgba8> {
    colors.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let mut seen = HashSet::with_capacity(colors.len());
    colors
        .into_iter()
        .filter(|(color, _)| seen.insert(*color))
        .map(|(color, _)| color)
        .collect()
}

/// Reduce a histogram to at most `max_colors` representative colors.
///
/// If the histogram already has no more than `max_colors` distinct colors
/// they are returned as-is, so the result never contains padding. Returns an
/// empty vector only for an empty histogram or a zero budget.
///
/// ```
/// use median_quant::{median_cut, Histogram, Rgba8};
///
/// let dark = Rgba8::opaque(10, 10, 10);
/// let darker = Rgba8::opaque(12, 12, 12);
/// let light = Rgba8::opaque(240, 240, 240);
/// let hist = Histogram::from_pixels([dark, darker, light, light]);
///
/// let colors = median_cut(hist, 2);
/// // Equal populations: ties are ordered by color.
/// assert_eq!(colors, vec![Rgba8::opaque(11, 11, 11), light]);
/// ```
pub fn median_cut(histogram: Histogram, max_colors: usize) -> Vec<Rgba8> {
    if max_colors == 0 || histogram.is_empty() {
        return Vec::new();
    }

    let entries = histogram.into_entries();
    if entries.len() <= max_colors {
        return finish(entries.into_iter().map(|e| (e.color, e.count)).collect());
    }

    let mut next_seq = 1;
    let mut heap = BinaryHeap::with_capacity(max_colors);
    heap.push(Region::new(entries, 0));

    while heap.len() < max_colors {
        let region = match heap.pop() {
            Some(r) if r.is_splittable() => r,
            Some(r) => {
                heap.push(r);
                break;
            }
            None => break,
        };
        let (lower, upper) = region.split(&mut next_seq);
        heap.push(lower);
        heap.push(upper);
    }

    tracing::debug!(
        regions = heap.len(),
        budget = max_colors,
        "median cut finished"
    );

    finish(heap.into_iter().map(|r| (r.mean(), r.population)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(r: u8, g: u8, b: u8, count: u64) -> HistogramEntry {
        HistogramEntry {
            color: Rgba8::opaque(r, g, b),
            count,
        }
    }

    #[test]
    fn test_region_stats() {
        let region = Region::new(vec![entry(0, 10, 0, 1), entry(100, 10, 0, 3)], 0);
        assert_eq!(region.population, 4);
        assert_eq!(region.widest, 0, "red has the only spread");
        assert_eq!(region.mean(), Rgba8::opaque(75, 10, 0));
        // Weighted SSE on red: 1*75^2 + 3*25^2 = 7500.
        assert!((region.priority - 7500.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_color_region_has_zero_priority() {
        let region = Region::new(vec![entry(5, 6, 7, 1000)], 0);
        assert_eq!(region.priority, 0.0);
        assert!(!region.is_splittable());
    }

    #[test]
    fn test_split_balances_population() {
        let region = Region::new(
            vec![
                entry(0, 0, 0, 10),
                entry(50, 0, 0, 10),
                entry(100, 0, 0, 10),
                entry(200, 0, 0, 10),
            ],
            0,
        );
        let mut seq = 1;
        let (lower, upper) = region.split(&mut seq);
        assert_eq!(lower.population, 20);
        assert_eq!(upper.population, 20);
        assert_eq!(seq, 3);
    }

    #[test]
    fn test_split_with_dominant_entry_keeps_both_sides() {
        let region = Region::new(vec![entry(0, 0, 0, 1000), entry(255, 0, 0, 1)], 0);
        let mut seq = 1;
        let (lower, upper) = region.split(&mut seq);
        assert_eq!(lower.entries.len(), 1);
        assert_eq!(upper.entries.len(), 1);
    }

    #[test]
    fn test_budget_is_respected() {
        let hist = Histogram::from_pixels(
            (0..=255u8).flat_map(|v| [Rgba8::opaque(v, 255 - v, v / 2)]),
        );
        for budget in [1, 2, 3, 7, 16, 100] {
            let colors = median_cut(hist.clone(), budget);
            assert!(colors.len() <= budget, "budget {budget}: got {}", colors.len());
            assert!(!colors.is_empty());
        }
    }

    #[test]
    fn test_fewer_colors_than_budget_returns_exact_colors() {
        let hist = Histogram::from_pixels([
            Rgba8::opaque(1, 2, 3),
            Rgba8::opaque(4, 5, 6),
            Rgba8::opaque(4, 5, 6),
        ]);
        let colors = median_cut(hist, 256);
        assert_eq!(colors, vec![Rgba8::opaque(4, 5, 6), Rgba8::opaque(1, 2, 3)]);
    }

    #[test]
    fn test_dense_cluster_gets_more_entries() {
        // 1000 pixels over 100 dark shades plus 10 bright pixels: the dark
        // cluster holds almost all the population and most of the budget.
        let mut pixels = Vec::new();
        for i in 0..1000u32 {
            let v = (i % 100) as u8;
            pixels.push(Rgba8::opaque(v, v, v));
        }
        pixels.extend(std::iter::repeat(Rgba8::opaque(255, 255, 0)).take(10));

        let colors = median_cut(Histogram::from_pixels(pixels), 4);
        let dark = colors.iter().filter(|c| c.r < 128).count();
        assert_eq!(colors.len(), 4);
        assert!(dark >= 3, "dark cluster got only {dark} of {:?}", colors);
    }

    #[test]
    fn test_zero_budget_or_empty_histogram() {
        assert!(median_cut(Histogram::default(), 8).is_empty());
        let hist = Histogram::from_pixels([Rgba8::opaque(1, 1, 1)]);
        assert!(median_cut(hist, 0).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let pixels: Vec<Rgba8> = (0..4096u32)
            .map(|i| Rgba8::opaque((i * 7) as u8, (i * 13) as u8, (i * 29) as u8))
            .collect();
        let a = median_cut(Histogram::from_pixels(pixels.clone()), 16);
        let b = median_cut(Histogram::from_pixels(pixels), 16);
        assert_eq!(a, b);
    }
}
