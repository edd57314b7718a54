//! Screen-space rainbow rectangles drawn over the 3D scene.

use glam::Vec3;

use crate::gradient::offset_color;
use crate::render::{Primitive, RenderBackend, Vertex, DEFAULT_LINE_WIDTH};

/// Border stroke in pixels.
pub const BORDER_WIDTH: f32 = 2.0;

const BORDER_CORNERS: f32 = 4.0;

/// Rectangle in window pixels, y growing downwards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OverlayRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub hue_phase: f32,
}

impl OverlayRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32, hue_phase: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            hue_phase,
        }
    }

    /// Horizontally centred band of `width_fraction` of the window.
    pub fn band(window_width: f32, y: f32, width_fraction: f32, height: f32, hue_phase: f32) -> Self {
        let width = window_width * width_fraction;
        Self::new((window_width - width) / 2.0, y, width, height, hue_phase)
    }

    /// Number of unit-wide fill columns.
    pub fn columns(&self) -> usize {
        self.width.max(0.0) as usize
    }

    /// Corners in outline order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Vec3; 4] {
        let (x0, y0) = (self.x, self.y);
        let (x1, y1) = (self.x + self.width, self.y + self.height);
        [
            Vec3::new(x0, y0, 0.0),
            Vec3::new(x1, y0, 0.0),
            Vec3::new(x1, y1, 0.0),
            Vec3::new(x0, y1, 0.0),
        ]
    }
}

/// One quad per pixel column, each column colored by its offset hue.
pub fn fill_vertices(rect: &OverlayRect) -> Vec<Vertex> {
    let columns = rect.columns();
    let mut vertices = Vec::with_capacity(columns * 4);

    for i in 0..columns {
        let color = offset_color(rect.hue_phase, i, rect.width);
        let left = rect.x + i as f32;
        let right = left + 1.0;
        let top = rect.y;
        let bottom = rect.y + rect.height;

        vertices.push(Vertex::new(Vec3::new(left, top, 0.0), color));
        vertices.push(Vertex::new(Vec3::new(left, bottom, 0.0), color));
        vertices.push(Vertex::new(Vec3::new(right, bottom, 0.0), color));
        vertices.push(Vertex::new(Vec3::new(right, top, 0.0), color));
    }

    vertices
}

pub fn border_vertices(rect: &OverlayRect) -> [Vertex; 4] {
    let corners = rect.corners();
    std::array::from_fn(|i| {
        Vertex::new(corners[i], offset_color(rect.hue_phase, i, BORDER_CORNERS))
    })
}

/// Draws the filled gradient and its border with the backend's current
/// transforms. Line width is restored to the default afterwards.
pub fn draw_gradient_rect<B: RenderBackend + ?Sized>(backend: &mut B, rect: &OverlayRect) {
    backend.submit(Primitive::Quads, &fill_vertices(rect));

    backend.set_line_width(BORDER_WIDTH);
    backend.submit(Primitive::LineLoop, &border_vertices(rect));
    backend.set_line_width(DEFAULT_LINE_WIDTH);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::hsv_to_rgb;

    #[test]
    fn test_band_is_centred() {
        let rect = OverlayRect::band(800.0, 0.0, 0.9, 50.0, 0.0);
        assert!((rect.width - 720.0).abs() < 1e-4);
        assert!((rect.x - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_fill_has_one_quad_per_column() {
        let rect = OverlayRect::new(10.0, 20.0, 16.5, 5.0, 0.0);
        let vertices = fill_vertices(&rect);
        assert_eq!(vertices.len(), 16 * 4);

        let last = &vertices[vertices.len() - 4..];
        assert_eq!(last[0].position, [25.0, 20.0, 0.0]);
        assert_eq!(last[2].position, [26.0, 25.0, 0.0]);
    }

    #[test]
    fn test_first_column_uses_phase_hue() {
        let rect = OverlayRect::new(0.0, 0.0, 100.0, 10.0, 1.0 / 3.0);
        let vertices = fill_vertices(&rect);
        let expected = hsv_to_rgb(1.0 / 3.0, 1.0, 1.0);
        assert!(vertices[0].color().max_difference(expected) < 1e-5);
    }

    #[test]
    fn test_border_corner_order() {
        let rect = OverlayRect::new(1.0, 2.0, 3.0, 4.0, 0.0);
        let border = border_vertices(&rect);
        assert_eq!(border[0].position, [1.0, 2.0, 0.0]);
        assert_eq!(border[1].position, [4.0, 2.0, 0.0]);
        assert_eq!(border[2].position, [4.0, 6.0, 0.0]);
        assert_eq!(border[3].position, [1.0, 6.0, 0.0]);
    }

    #[test]
    fn test_empty_rect_has_no_fill() {
        let rect = OverlayRect::new(0.0, 0.0, 0.0, 50.0, 0.0);
        assert!(fill_vertices(&rect).is_empty());
    }
}
