//! Rendering collaborator: the backend contract, its transform stack, and
//! two implementations (wgpu on a window, in-memory recording).

mod backend;
pub mod gpu;
pub mod recording;
mod transform;

pub use backend::{
    FrameHost, MeshHandle, Primitive, RenderBackend, Vertex, Viewport, DEFAULT_LINE_WIDTH,
};
pub use gpu::GpuBackend;
pub use recording::{Command, DrawCall, RecordingBackend};
pub use transform::{MatrixMode, TransformStack};
