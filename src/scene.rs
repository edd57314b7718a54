//! Scene variants: which topology is shown and how it is drawn.
//!
//! Wireframe solids submit white edges every frame. The imported mesh is
//! colored once by radial gradient and kept resident on the backend.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use glam::{Vec2, Vec3};

use crate::geometry::{self, Topology, TorusParams};
use crate::gradient::{radial_gradient, GradientField};
use crate::loaders::load_triangle_stream;
use crate::math::Color;
use crate::render::{MeshHandle, Primitive, RenderBackend, TransformStack, Vertex};

pub const WIREFRAME_CAMERA_DISTANCE: f32 = 5.0;
pub const MESH_CAMERA_DISTANCE: f32 = 20.0;

const WIREFRAME_SPIN_AXIS: Vec3 = Vec3::new(3.0, 1.0, 1.0);
const WIREFRAME_SPIN_DEGREES: f32 = 1.0;
const MESH_SPIN_DEGREES: f32 = 0.5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    Cube,
    Pyramid,
    Torus,
    Mesh,
}

impl SceneKind {
    pub fn title(self) -> &'static str {
        match self {
            SceneKind::Cube => "Rotating Cube with Rainbow Borders",
            SceneKind::Pyramid => "Rotating Pyramid with Rainbow Borders",
            SceneKind::Torus => "Rotating Torus with Rainbow Borders",
            SceneKind::Mesh => "Rainbow Gradient Mesh with Rainbow Borders",
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SceneKind::Cube => "cube",
            SceneKind::Pyramid => "pyramid",
            SceneKind::Torus => "torus",
            SceneKind::Mesh => "mesh",
        };
        f.write_str(name)
    }
}

/// Per-frame rotation applied to the model before drawing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Spin {
    /// Single accumulated angle about a fixed axis, held in `angles.x`.
    Axis { axis: Vec3, degrees_per_frame: f32 },
    /// Independent pitch (`angles.x`, about X) and yaw (`angles.y`, about Y).
    PitchYaw { degrees_per_frame: f32 },
}

impl Spin {
    pub fn advance(&self, angles: &mut Vec2) {
        match *self {
            Spin::Axis { degrees_per_frame, .. } => angles.x += degrees_per_frame,
            Spin::PitchYaw { degrees_per_frame } => *angles += Vec2::splat(degrees_per_frame),
        }
    }

    pub fn apply(&self, angles: Vec2, transforms: &mut TransformStack) {
        match *self {
            Spin::Axis { axis, .. } => transforms.rotate(angles.x, axis),
            Spin::PitchYaw { .. } => {
                transforms.rotate(angles.x, Vec3::X);
                transforms.rotate(angles.y, Vec3::Y);
            }
        }
    }
}

#[derive(Clone, Debug)]
enum Style {
    Wireframe {
        lines: Vec<Vertex>,
    },
    Gradient {
        colors: GradientField,
        triangles: Vec<Vertex>,
        mesh: Option<MeshHandle>,
    },
}

#[derive(Clone, Debug)]
pub struct Scene {
    title: String,
    topology: Topology,
    style: Style,
    spin: Spin,
    camera_distance: f32,
    depth_test: bool,
}

impl Scene {
    /// Builds the scene for `kind`. `mesh_path` is only read for
    /// [`SceneKind::Mesh`]; a decode failure is returned to the caller.
    pub fn build(kind: SceneKind, mesh_path: &Path) -> Result<Self> {
        let scene = match kind {
            SceneKind::Cube => Self::wireframe(kind.title(), geometry::create_cube()),
            SceneKind::Pyramid => Self::wireframe(kind.title(), geometry::create_pyramid()),
            SceneKind::Torus => {
                Self::wireframe(kind.title(), geometry::create_torus(TorusParams::default()))
            }
            SceneKind::Mesh => {
                let stream = load_triangle_stream(mesh_path)?;
                let name = mesh_path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "mesh".to_string());
                let topology = geometry::from_triangle_stream(name, stream)
                    .with_context(|| format!("Failed to import mesh {}", mesh_path.display()))?;
                Self::gradient(kind.title(), topology)
            }
        };

        log::info!(
            "Scene '{}' ready: {} vertices, {}",
            scene.topology.name(),
            scene.topology.vertex_count(),
            match scene.topology.edges() {
                Some(edges) => format!("{} edges", edges.len()),
                None => format!("{} triangles", scene.topology.triangle_count()),
            }
        );

        Ok(scene)
    }

    /// White edges spinning about (3, 1, 1), no depth test.
    pub fn wireframe(title: impl Into<String>, topology: Topology) -> Self {
        let lines = topology
            .segments()
            .flat_map(|(a, b)| [Vertex::new(a, Color::WHITE), Vertex::new(b, Color::WHITE)])
            .collect();

        Self {
            title: title.into(),
            topology,
            style: Style::Wireframe { lines },
            spin: Spin::Axis {
                axis: WIREFRAME_SPIN_AXIS,
                degrees_per_frame: WIREFRAME_SPIN_DEGREES,
            },
            camera_distance: WIREFRAME_CAMERA_DISTANCE,
            depth_test: false,
        }
    }

    /// Radially colored triangles with pitch/yaw spin and depth test.
    pub fn gradient(title: impl Into<String>, topology: Topology) -> Self {
        let colors = radial_gradient(topology.vertices());
        let triangles = topology
            .vertices()
            .iter()
            .zip(&colors)
            .map(|(&position, &color)| Vertex::new(position, color))
            .collect();

        Self {
            title: title.into(),
            topology,
            style: Style::Gradient {
                colors,
                triangles,
                mesh: None,
            },
            spin: Spin::PitchYaw {
                degrees_per_frame: MESH_SPIN_DEGREES,
            },
            camera_distance: MESH_CAMERA_DISTANCE,
            depth_test: true,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn spin(&self) -> Spin {
        self.spin
    }

    pub fn camera_distance(&self) -> f32 {
        self.camera_distance
    }

    pub fn depth_test(&self) -> bool {
        self.depth_test
    }

    pub fn gradient_field(&self) -> Option<&GradientField> {
        match &self.style {
            Style::Gradient { colors, .. } => Some(colors),
            Style::Wireframe { .. } => None,
        }
    }

    /// Uploads static geometry. Safe to call again; the mesh is uploaded once.
    pub fn prepare<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        if let Style::Gradient { triangles, mesh, .. } = &mut self.style {
            if mesh.is_none() {
                *mesh = Some(backend.upload_mesh(triangles));
            }
        }
    }

    /// Submits the topology with the backend's current transforms.
    pub fn draw<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        backend.set_depth_test(self.depth_test);
        match &self.style {
            Style::Wireframe { lines } => backend.submit(Primitive::Lines, lines),
            Style::Gradient { mesh: Some(handle), .. } => backend.draw_mesh(*handle),
            Style::Gradient { triangles, mesh: None, .. } => {
                backend.submit(Primitive::Triangles, triangles)
            }
        }
    }
}
