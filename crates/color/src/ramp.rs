//! Intensity to color ramp.
//!
//! A four-segment piecewise-linear ramp tuned for intensities in `[0, 255]`:
//!
//! | intensity      | red        | green          | blue           |
//! |----------------|------------|----------------|----------------|
//! | `..=34`        | 0          | `i*255/34`     | 255            |
//! | `35..=67`      | 0          | 255            | `(67-i)*255/33`|
//! | `68..=100`     | `(i-67)*255/33` | 255       | 0              |
//! | `101..`        | 255        | `(255-i)*255/156` | 0           |
//!
//! Divisions floor. Channel values outside `[0, 255]` (negative intensities,
//! or anything above 255 in the last segment) are reduced to their low
//! 8 bits, so they wrap modulo 256 instead of saturating. Use
//! [`ChannelOverflow::Clamp`] to saturate instead.

use xyzi2rgb_core::Rgb;

const SEGMENT_CYAN_END: i128 = 34;
const SEGMENT_GREEN_END: i128 = 67;
const SEGMENT_YELLOW_END: i128 = 100;
const TOP: i128 = 255;
const TOP_SPAN: i128 = 256 - SEGMENT_YELLOW_END;

/// What to do with a channel value computed outside `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOverflow {
    /// Keep the low 8 bits. Matches the PCL-era colorizer bit for bit.
    #[default]
    Wrap,
    /// Saturate to `0` or `255`. Deviates from the reference colors for
    /// intensities above 255 and below 0.
    Clamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorRamp {
    pub overflow: ChannelOverflow,
}

impl ColorRamp {
    pub fn new(overflow: ChannelOverflow) -> Self {
        Self { overflow }
    }

    pub fn map(&self, intensity: i64) -> Rgb {
        let [r, g, b] = raw_channels(intensity);
        match self.overflow {
            // The truncating cast keeps the low 8 bits that `from_channels` masks.
            ChannelOverflow::Wrap => Rgb::from_channels(r as i64, g as i64, b as i64),
            ChannelOverflow::Clamp => Rgb::new(clamp(r), clamp(g), clamp(b)),
        }
    }
}

/// Maps an intensity to a color with 8-bit wraparound.
///
/// ```
/// use xyzi2rgb_color::intensity_to_rgb;
/// use xyzi2rgb_core::Rgb;
///
/// assert_eq!(intensity_to_rgb(20), Rgb::new(0, 150, 255));
/// assert_eq!(intensity_to_rgb(100), Rgb::new(255, 255, 0));
/// ```
pub fn intensity_to_rgb(intensity: i64) -> Rgb {
    ColorRamp::default().map(intensity)
}

/// Unmasked channel values. `i128` keeps `i64::MAX * 255` representable.
fn raw_channels(intensity: i64) -> [i128; 3] {
    let i = i128::from(intensity);
    if i <= SEGMENT_CYAN_END {
        [0, (i * 255).div_euclid(SEGMENT_CYAN_END), 255]
    } else if i <= SEGMENT_GREEN_END {
        let span = SEGMENT_GREEN_END - SEGMENT_CYAN_END;
        [0, 255, ((SEGMENT_GREEN_END - i) * 255).div_euclid(span)]
    } else if i <= SEGMENT_YELLOW_END {
        let span = SEGMENT_YELLOW_END - SEGMENT_GREEN_END;
        [((i - SEGMENT_GREEN_END) * 255).div_euclid(span), 255, 0]
    } else {
        [255, ((TOP - i) * 255).div_euclid(TOP_SPAN), 0]
    }
}

fn clamp(v: i128) -> u8 {
    v.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn segment_boundaries() {
        assert_eq!(intensity_to_rgb(0), Rgb::new(0, 0, 255));
        assert_eq!(intensity_to_rgb(34), Rgb::new(0, 255, 255));
        assert_eq!(intensity_to_rgb(35), Rgb::new(0, 255, 247));
        assert_eq!(intensity_to_rgb(67), Rgb::new(0, 255, 0));
        assert_eq!(intensity_to_rgb(68), Rgb::new(7, 255, 0));
        assert_eq!(intensity_to_rgb(100), Rgb::new(255, 255, 0));
        assert_eq!(intensity_to_rgb(101), Rgb::new(255, 251, 0));
        assert_eq!(intensity_to_rgb(255), Rgb::new(255, 0, 0));
    }

    #[test]
    fn mid_segment_values() {
        assert_eq!(intensity_to_rgb(20), Rgb::new(0, 150, 255));
        assert_eq!(intensity_to_rgb(50), Rgb::new(0, 255, 131));
        assert_eq!(intensity_to_rgb(80), Rgb::new(100, 255, 0));
        assert_eq!(intensity_to_rgb(200), Rgb::new(255, 89, 0));
    }

    #[test]
    fn above_255_wraps() {
        // (255 - 256) * 255 / 156 floors to -2
        assert_eq!(intensity_to_rgb(256), Rgb::new(255, 254, 0));
        // (255 - 500) * 255 = -62475, floor(-62475 / 156) = -401, -401 & 0xFF = 111
        assert_eq!(intensity_to_rgb(500), Rgb::new(255, 111, 0));
    }

    #[test]
    fn negative_intensity_wraps() {
        // -255 / 34 floors to -8
        assert_eq!(intensity_to_rgb(-1), Rgb::new(0, 248, 255));
    }

    #[test]
    fn clamp_saturates_instead() {
        let ramp = ColorRamp::new(ChannelOverflow::Clamp);
        assert_eq!(ramp.map(500), Rgb::new(255, 0, 0));
        assert_eq!(ramp.map(-1), Rgb::new(0, 0, 255));
        assert_eq!(ramp.map(20), intensity_to_rgb(20));
    }

    #[test]
    fn extreme_inputs_do_not_overflow() {
        let _ = intensity_to_rgb(i64::MAX);
        let _ = intensity_to_rgb(i64::MIN);
        let ramp = ColorRamp::new(ChannelOverflow::Clamp);
        assert_eq!(ramp.map(i64::MAX), Rgb::new(255, 0, 0));
        assert_eq!(ramp.map(i64::MIN), Rgb::new(0, 0, 255));
    }

    proptest! {
        #[test]
        fn wrap_and_clamp_agree_on_tuned_range(i in 0i64..=255) {
            prop_assert_eq!(
                ColorRamp::new(ChannelOverflow::Wrap).map(i),
                ColorRamp::new(ChannelOverflow::Clamp).map(i)
            );
        }

        #[test]
        fn wrap_is_low_byte_of_unbounded_channels(i in any::<i64>()) {
            let [r, g, b] = raw_channels(i);
            let low = |v: i128| v.rem_euclid(256) as u8;
            prop_assert_eq!(intensity_to_rgb(i), Rgb::new(low(r), low(g), low(b)));
        }

        #[test]
        fn green_rises_in_first_segment(a in 0i64..=34, b in 0i64..=34) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(intensity_to_rgb(lo).g <= intensity_to_rgb(hi).g);
        }

        #[test]
        fn blue_falls_in_second_segment(a in 35i64..=67, b in 35i64..=67) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(intensity_to_rgb(lo).b >= intensity_to_rgb(hi).b);
        }

        #[test]
        fn red_rises_in_third_segment(a in 68i64..=100, b in 68i64..=100) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(intensity_to_rgb(lo).r <= intensity_to_rgb(hi).r);
        }

        #[test]
        fn green_falls_in_last_segment(a in 101i64..=255, b in 101i64..=255) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(intensity_to_rgb(lo).g >= intensity_to_rgb(hi).g);
        }
    }
}
