//! Integer HSV/RGB conversion for diagnostic output.
//!
//! Uses the classic 8-bit hue-sector algorithm: the hue circle is split
//! into six regions of 43 (43 ~ 255/6) and all arithmetic is integer with
//! truncation. The conversions are deliberately not exact inverses of each
//! other; repeated round trips drift by a few counts per channel, which is
//! acceptable for display purposes.

use crate::types::Hsv8;
use palette::Srgb;

/// Converts an 8-bit HSV triple to 8-bit RGB.
pub fn hsv_to_rgb(hsv: Hsv8) -> Srgb<u8> {
    if hsv.s == 0 {
        return Srgb::new(hsv.v, hsv.v, hsv.v);
    }

    // 16-bit intermediates; all products stay below 2^16.
    let h = hsv.h as u16;
    let s = hsv.s as u16;
    let v = hsv.v as u16;

    let region = h / 43;
    let remainder = (h - region * 43) * 6;

    let p = ((v * (255 - s)) >> 8) as u8;
    let q = ((v * (255 - ((s * remainder) >> 8))) >> 8) as u8;
    let t = ((v * (255 - ((s * (255 - remainder)) >> 8))) >> 8) as u8;
    let v = hsv.v;

    match region {
        0 => Srgb::new(v, t, p),
        1 => Srgb::new(q, v, p),
        2 => Srgb::new(p, v, t),
        3 => Srgb::new(p, q, v),
        4 => Srgb::new(t, p, v),
        _ => Srgb::new(v, p, q),
    }
}

/// Converts an 8-bit RGB triple to 8-bit HSV.
///
/// Value is the channel maximum; a zero value or zero saturation short
/// circuits with hue 0. Hue wraps modulo 256, so reds slightly on the
/// magenta side come out near 255.
pub fn rgb_to_hsv(rgb: Srgb<u8>) -> Hsv8 {
    let rgb_min = rgb.red.min(rgb.green).min(rgb.blue);
    let rgb_max = rgb.red.max(rgb.green).max(rgb.blue);

    let v = rgb_max;
    if v == 0 {
        return Hsv8::new(0, 0, 0);
    }

    let span = (rgb_max - rgb_min) as i32;
    let s = (255 * span / v as i32) as u8;
    if s == 0 {
        return Hsv8::new(0, 0, v);
    }

    let h = if rgb_max == rgb.red {
        43 * (rgb.green as i32 - rgb.blue as i32) / span
    } else if rgb_max == rgb.green {
        85 + 43 * (rgb.blue as i32 - rgb.red as i32) / span
    } else {
        171 + 43 * (rgb.red as i32 - rgb.green as i32) / span
    };

    Hsv8::new(h as u8, s, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::rgb8;

    /// Deterministic PRNG so fixtures are reproducible.
    struct XorShift32(u32);

    impl XorShift32 {
        fn next_u8(&mut self) -> u8 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.0 = x;
            x as u8
        }
    }

    #[test]
    fn zero_saturation_yields_gray() {
        assert_eq!(hsv_to_rgb(Hsv8::new(123, 0, 77)), rgb8(77, 77, 77));
    }

    #[test]
    fn zero_value_yields_black_hsv() {
        assert_eq!(rgb_to_hsv(rgb8(0, 0, 0)), Hsv8::new(0, 0, 0));
    }

    #[test]
    fn gray_has_zero_saturation_and_hue() {
        assert_eq!(rgb_to_hsv(rgb8(128, 128, 128)), Hsv8::new(0, 0, 128));
    }

    #[test]
    fn primary_hues_land_in_expected_sectors() {
        assert_eq!(rgb_to_hsv(rgb8(255, 0, 0)), Hsv8::new(0, 255, 255));
        assert_eq!(rgb_to_hsv(rgb8(0, 255, 0)), Hsv8::new(85, 255, 255));
        assert_eq!(rgb_to_hsv(rgb8(0, 0, 255)), Hsv8::new(171, 255, 255));
    }

    #[test]
    fn primary_round_trips_show_only_truncation_loss() {
        // Red is an exact fixed point; green and blue lose a few counts to
        // the remainder truncation. The literals document that loss.
        assert_eq!(hsv_to_rgb(rgb_to_hsv(rgb8(255, 0, 0))), rgb8(255, 0, 0));
        assert_eq!(hsv_to_rgb(rgb_to_hsv(rgb8(0, 255, 0))), rgb8(3, 255, 0));
        assert_eq!(hsv_to_rgb(rgb_to_hsv(rgb8(0, 0, 255))), rgb8(0, 3, 255));
    }

    #[test]
    fn hue_wraps_for_magenta_leaning_reds() {
        let hsv = rgb_to_hsv(rgb8(200, 0, 100));
        assert!(hsv.h > 200, "expected wrapped hue, got {}", hsv.h);
    }

    #[test]
    fn value_channel_survives_round_trip_exactly() {
        let mut rng = XorShift32(0x1234_5678);
        for _ in 0..100 {
            let rgb = rgb8(rng.next_u8(), rng.next_u8(), rng.next_u8());
            let max_before = rgb.red.max(rgb.green).max(rgb.blue);
            let out = hsv_to_rgb(rgb_to_hsv(rgb));
            let max_after = out.red.max(out.green).max(out.blue);
            assert_eq!(max_before, max_after);
        }
    }

    #[test]
    fn round_trip_stabilizes_within_truncation_bound() {
        // One trip through HSV quantizes the color; a second trip must stay
        // within the truncation drift of the first. The integer algorithm
        // oscillates by up to ~6 counts per channel, never more.
        let mut rng = XorShift32(0x1234_5678);
        for _ in 0..100 {
            let rgb = rgb8(rng.next_u8(), rng.next_u8(), rng.next_u8());
            let first = hsv_to_rgb(rgb_to_hsv(rgb));
            let second = hsv_to_rgb(rgb_to_hsv(first));

            for (a, b) in [
                (first.red, second.red),
                (first.green, second.green),
                (first.blue, second.blue),
            ] {
                let drift = (a as i16 - b as i16).unsigned_abs();
                assert!(drift <= 8, "channel drifted by {} counts", drift);
            }
        }
    }
}
