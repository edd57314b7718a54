use anyhow::Result;
use glam::Vec3;

use super::transform::TransformStack;
use crate::math::Color;

/// Position + color, laid out for direct upload to a vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn color(&self) -> Color {
        Color::from(self.color)
    }
}

/// How a submitted vertex list is assembled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Primitive {
    /// Independent segments, two vertices each.
    Lines,
    /// Closed outline through every vertex in order.
    LineLoop,
    /// Independent triangles, three vertices each.
    Triangles,
    /// Independent quads, four vertices each, wound around the perimeter.
    Quads,
}

/// Handle to a vertex list uploaded once with [`RenderBackend::upload_mesh`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub(crate) usize);

/// Drawable surface size in physical pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; 1.0 for a collapsed surface.
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Immediate-mode rendering surface.
///
/// Every submission captures the transform stack's combined matrix at the
/// moment of the call, the way fixed-function pipelines latch the current
/// matrices at draw time.
pub trait RenderBackend {
    fn viewport(&self) -> Viewport;

    fn transforms(&mut self) -> &mut TransformStack;

    fn set_depth_test(&mut self, enabled: bool);

    /// Stroke width in pixels for subsequent line primitives.
    fn set_line_width(&mut self, width: f32);

    /// Starts a new frame, clearing color and depth.
    fn clear(&mut self, color: Color);

    fn submit(&mut self, primitive: Primitive, vertices: &[Vertex]);

    /// Keeps a triangle list resident so it can be redrawn every frame
    /// without resubmitting its vertices.
    fn upload_mesh(&mut self, vertices: &[Vertex]) -> MeshHandle;

    fn draw_mesh(&mut self, mesh: MeshHandle);

    /// Shows the finished frame.
    fn present(&mut self) -> Result<()>;
}

/// A backend that also owns the window-side pieces of the frame loop.
pub trait FrameHost: RenderBackend {
    /// Returns true once the user asked to close the window.
    fn poll_close(&mut self) -> bool;

    /// Releases surface resources. Called once, after the last frame.
    fn release(&mut self) {}
}

pub const DEFAULT_LINE_WIDTH: f32 = 1.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_is_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn test_vertex_round_trips_position_and_color() {
        let v = Vertex::new(Vec3::new(1.0, 2.0, 3.0), Color::new(0.5, 0.25, 1.0));
        assert_eq!(v.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(v.color(), Color::new(0.5, 0.25, 1.0));
    }

    #[test]
    fn test_viewport_aspect() {
        assert_eq!(Viewport::new(800, 600).aspect(), 800.0 / 600.0);
        assert_eq!(Viewport::new(800, 0).aspect(), 1.0);
    }
}
