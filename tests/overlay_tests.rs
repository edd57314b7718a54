use prism_demo::math::hsv_to_rgb;
use prism_demo::overlay::{border_vertices, draw_gradient_rect, fill_vertices, OverlayRect, BORDER_WIDTH};
use prism_demo::render::{Primitive, RecordingBackend, RenderBackend, Viewport, DEFAULT_LINE_WIDTH};

#[cfg(test)]
mod overlay_tests {
    use super::*;

    #[test]
    fn test_fill_sweeps_the_full_hue_circle() {
        let rect = OverlayRect::new(0.0, 0.0, 400.0, 50.0, 0.0);
        let fill = fill_vertices(&rect);
        assert_eq!(fill.len(), 400 * 4);

        // Column 100 of 400 sits a quarter of the way round.
        let column = &fill[100 * 4..101 * 4];
        let expected = hsv_to_rgb(0.25, 1.0, 1.0);
        for vertex in column {
            assert!(vertex.color().max_difference(expected) < 1e-5);
        }
    }

    #[test]
    fn test_columns_tile_the_rectangle() {
        let rect = OverlayRect::new(40.0, 550.0, 720.0, 50.0, 0.3);
        let fill = fill_vertices(&rect);

        for (i, quad) in fill.chunks_exact(4).enumerate() {
            let left = 40.0 + i as f32;
            assert_eq!(quad[0].position, [left, 550.0, 0.0]);
            assert_eq!(quad[1].position, [left, 600.0, 0.0]);
            assert_eq!(quad[2].position, [left + 1.0, 600.0, 0.0]);
            assert_eq!(quad[3].position, [left + 1.0, 550.0, 0.0]);
        }
    }

    #[test]
    fn test_border_corner_hues() {
        let rect = OverlayRect::new(0.0, 0.0, 10.0, 10.0, 0.5);
        let border = border_vertices(&rect);
        let expected = [0.5, 0.75, 0.0, 0.25].map(|h| hsv_to_rgb(h, 1.0, 1.0));

        for (vertex, color) in border.iter().zip(expected) {
            assert!(vertex.color().max_difference(color) < 1e-5);
        }
    }

    #[test]
    fn test_draw_submits_fill_then_wide_border() {
        let mut backend = RecordingBackend::new(Viewport::new(800, 600));
        let rect = OverlayRect::band(800.0, 0.0, 0.9, 50.0, 0.0);
        draw_gradient_rect(&mut backend, &rect);

        let calls: Vec<_> = backend.draw_calls().collect();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].primitive, Primitive::Quads);
        assert_eq!(calls[0].line_width, DEFAULT_LINE_WIDTH);
        assert_eq!(calls[1].primitive, Primitive::LineLoop);
        assert_eq!(calls[1].line_width, BORDER_WIDTH);
        assert_eq!(calls[1].vertices.len(), 4);

        assert_eq!(backend.line_width(), DEFAULT_LINE_WIDTH);
    }

    #[test]
    fn test_draw_leaves_transforms_untouched() {
        let mut backend = RecordingBackend::new(Viewport::new(800, 600));
        let before = backend.transforms().clone();
        draw_gradient_rect(&mut backend, &OverlayRect::new(0.0, 0.0, 10.0, 10.0, 0.0));
        assert_eq!(*backend.transforms(), before);
    }
}
