//! In-memory backend that records submissions instead of drawing them.
//!
//! Only the current frame is kept: [`RenderBackend::clear`] drops the
//! previous frame's commands, so long headless runs stay bounded in memory.

use anyhow::Result;
use glam::Mat4;

use super::backend::{
    FrameHost, MeshHandle, Primitive, RenderBackend, Vertex, Viewport, DEFAULT_LINE_WIDTH,
};
use super::transform::TransformStack;
use crate::math::Color;

#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub primitive: Primitive,
    pub vertices: Vec<Vertex>,
    /// Combined projection × model matrix at submission time.
    pub transform: Mat4,
    pub line_width: f32,
    pub depth_test: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Clear(Color),
    Draw(DrawCall),
    DrawMesh {
        mesh: MeshHandle,
        transform: Mat4,
        depth_test: bool,
    },
    Present,
}

#[derive(Debug)]
pub struct RecordingBackend {
    viewport: Viewport,
    transforms: TransformStack,
    depth_test: bool,
    line_width: f32,
    meshes: Vec<Vec<Vertex>>,
    commands: Vec<Command>,
    frames_presented: u64,
    close_after: Option<u64>,
    released: bool,
}

impl RecordingBackend {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            transforms: TransformStack::new(),
            depth_test: false,
            line_width: DEFAULT_LINE_WIDTH,
            meshes: Vec::new(),
            commands: Vec::new(),
            frames_presented: 0,
            close_after: None,
            released: false,
        }
    }

    /// Raises the close signal once `frames` frames have been presented.
    pub fn close_after(mut self, frames: u64) -> Self {
        self.close_after = Some(frames);
        self
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Commands recorded since the last clear.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn draw_calls(&self) -> impl Iterator<Item = &DrawCall> {
        self.commands.iter().filter_map(|c| match c {
            Command::Draw(call) => Some(call),
            _ => None,
        })
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&[Vertex]> {
        self.meshes.get(handle.0).map(Vec::as_slice)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl RenderBackend for RecordingBackend {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn transforms(&mut self) -> &mut TransformStack {
        &mut self.transforms
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(Command::Clear(color));
    }

    fn submit(&mut self, primitive: Primitive, vertices: &[Vertex]) {
        self.commands.push(Command::Draw(DrawCall {
            primitive,
            vertices: vertices.to_vec(),
            transform: self.transforms.combined(),
            line_width: self.line_width,
            depth_test: self.depth_test,
        }));
    }

    fn upload_mesh(&mut self, vertices: &[Vertex]) -> MeshHandle {
        self.meshes.push(vertices.to_vec());
        MeshHandle(self.meshes.len() - 1)
    }

    fn draw_mesh(&mut self, mesh: MeshHandle) {
        debug_assert!(mesh.0 < self.meshes.len(), "unknown mesh {:?}", mesh);
        self.commands.push(Command::DrawMesh {
            mesh,
            transform: self.transforms.combined(),
            depth_test: self.depth_test,
        });
    }

    fn present(&mut self) -> Result<()> {
        self.commands.push(Command::Present);
        self.frames_presented += 1;
        Ok(())
    }
}

impl FrameHost for RecordingBackend {
    fn poll_close(&mut self) -> bool {
        self.close_after
            .is_some_and(|limit| self.frames_presented >= limit)
    }

    fn release(&mut self) {
        self.meshes.clear();
        self.commands.clear();
        self.released = true;
    }
}
