//! Gamma lookup table
//!
//! The sRGB decoding table is generated at compile time by build.rs and
//! sampled with linear interpolation between neighbouring entries.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

#[inline]
fn sample(table: &[f32; 4096], x: f32) -> f32 {
    // NaN clamps to NaN; treat it as 0 so a bad accumulator never indexes OOB.
    let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };

    let scaled = x * 4095.0;
    let index = scaled as usize;
    if index >= 4095 {
        return table[4095];
    }

    let frac = scaled - index as f32;
    let a = table[index];
    let b = table[index + 1];
    a + (b - a) * frac
}

/// Convert an sRGB value (0.0..=1.0) to linear light.
///
/// Out-of-range input is clamped.
#[inline]
pub fn srgb_to_linear(srgb: f32) -> f32 {
    sample(&SRGB_TO_LINEAR, srgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert!(srgb_to_linear(0.0).abs() < 1e-6);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(srgb_to_linear(-0.5), srgb_to_linear(0.0));
        assert_eq!(srgb_to_linear(1.7), srgb_to_linear(1.0));
        assert_eq!(srgb_to_linear(f32::NAN), srgb_to_linear(0.0));
    }

    #[test]
    fn test_monotonicity() {
        let mut prev = srgb_to_linear(0.0);
        for i in 1..=1000 {
            let lin = srgb_to_linear(i as f32 / 1000.0);
            assert!(lin >= prev, "srgb_to_linear not monotonic at {i}");
            prev = lin;
        }
    }

    #[test]
    fn test_mid_grey_reference() {
        // sRGB 0.5 is about 21.4% linear light.
        assert!((srgb_to_linear(0.5) - 0.214).abs() < 1e-3);
    }
}
