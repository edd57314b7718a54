use glam::Vec3;
use prism_demo::gradient::{centroid, offset_hue, radial_gradient, radial_hues};
use prism_demo::math::{hsv_to_rgb, Color};

#[cfg(test)]
mod gradient_tests {
    use super::*;

    fn assert_hues(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-5, "expected {:?}, got {:?}", expected, actual);
        }
    }

    #[test]
    fn test_identical_vertices_get_hue_zero() {
        let vertices = vec![Vec3::new(3.0, -2.0, 7.0); 6];
        assert_hues(&radial_hues(&vertices), &[0.0; 6]);

        let colors = radial_gradient(&vertices);
        assert!(colors.iter().all(|c| c.max_difference(Color::new(1.0, 0.0, 0.0)) < 1e-6));
    }

    #[test]
    fn test_hue_is_normalised_distance() {
        // Symmetric about the origin so the centroid is exact.
        let vertices = [
            Vec3::ZERO,
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(-0.5, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
        ];
        assert_eq!(centroid(&vertices), Vec3::ZERO);
        assert_hues(&radial_hues(&vertices), &[0.0, 0.5, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn test_gradient_is_parallel_to_vertices() {
        let vertices = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
        let field = radial_gradient(&vertices);
        assert_eq!(field.len(), vertices.len());

        let hues = radial_hues(&vertices);
        for (color, hue) in field.iter().zip(hues) {
            assert!(color.max_difference(hsv_to_rgb(hue, 1.0, 1.0)) < 1e-6);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(radial_hues(&[]).is_empty());
        assert!(radial_gradient(&[]).is_empty());
    }

    #[test]
    fn test_offset_hues_for_four_corners() {
        let at_zero: Vec<f32> = (0..4).map(|i| offset_hue(0.0, i, 4.0)).collect();
        assert_hues(&at_zero, &[0.0, 0.25, 0.5, 0.75]);

        let shifted: Vec<f32> = (0..4).map(|i| offset_hue(0.5, i, 4.0)).collect();
        assert_hues(&shifted, &[0.5, 0.75, 0.0, 0.25]);
    }

    #[test]
    fn test_offset_hue_over_columns() {
        let width = 720.0;
        assert!((offset_hue(0.1, 360, width) - 0.6).abs() < 1e-5);
        assert!((offset_hue(0.9, 360, width) - 0.4).abs() < 1e-5);
    }
}
