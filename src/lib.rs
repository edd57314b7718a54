pub mod app;
pub mod cli;
pub mod driver;
pub mod geometry;
pub mod gradient;
pub mod loaders;
pub mod logging;
pub mod math;
pub mod overlay;
pub mod render;
pub mod scene;

pub use driver::{AnimationState, DriverConfig, DriverState, SceneDriver};
pub use scene::{Scene, SceneKind};
