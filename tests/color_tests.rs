use prism_demo::math::{hsv_to_rgb, wrap_unit, Color};

#[cfg(test)]
mod color_tests {
    use super::*;

    const TOLERANCE: f32 = 1e-5;

    fn assert_close(actual: Color, expected: Color) {
        assert!(
            actual.max_difference(expected) < TOLERANCE,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_primary_hues() {
        assert_close(hsv_to_rgb(0.0, 1.0, 1.0), Color::new(1.0, 0.0, 0.0));
        assert_close(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), Color::new(0.0, 1.0, 0.0));
        assert_close(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), Color::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_components_stay_in_unit_range() {
        for hi in 0..100 {
            for si in 0..=4 {
                for vi in 0..=4 {
                    let h = hi as f32 / 100.0;
                    let (s, v) = (si as f32 / 4.0, vi as f32 / 4.0);
                    let c = hsv_to_rgb(h, s, v);
                    for channel in c.to_array() {
                        assert!((0.0..=1.0).contains(&channel), "{:?} at h={} s={} v={}", c, h, s, v);
                    }
                }
            }
        }
    }

    #[test]
    fn test_hue_wraps_by_one() {
        for hi in 0..50 {
            let h = hi as f32 / 50.0;
            assert_close(hsv_to_rgb(h, 0.8, 0.9), hsv_to_rgb(h + 1.0, 0.8, 0.9));
        }
    }

    #[test]
    fn test_zero_saturation_is_grey() {
        let grey = hsv_to_rgb(0.42, 0.0, 0.5);
        assert_close(grey, Color::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_wrap_unit_range() {
        for value in [-2.5_f32, -1e-9, 0.0, 0.999, 1.0, 3.25] {
            let wrapped = wrap_unit(value);
            assert!((0.0..1.0).contains(&wrapped), "{} wrapped to {}", value, wrapped);
        }
        assert!((wrap_unit(3.25) - 0.25).abs() < TOLERANCE);
        assert!((wrap_unit(-0.25) - 0.75).abs() < TOLERANCE);
    }
}
