use std::f32::consts::TAU;

use glam::Vec3;

use super::{Edge, Topology};

/// Shape parameters for [`create_torus`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TorusParams {
    /// Distance from the torus centre to the centre of the tube.
    pub major_radius: f32,
    /// Radius of the tube.
    pub minor_radius: f32,
    /// Points per circular cross-section.
    pub segments: usize,
    /// Cross-sections swept around the major circle.
    pub rings: usize,
}

impl Default for TorusParams {
    fn default() -> Self {
        Self {
            major_radius: 1.0,
            minor_radius: 0.3,
            segments: 30,
            rings: 30,
        }
    }
}

/// A single point per loop would connect every vertex to itself.
pub const MIN_DIVISIONS: usize = 2;

/// Ring-of-rings wireframe with wraparound in both directions.
///
/// Vertex `(ring, segment)` lives at index `ring * segments + segment`. Each
/// vertex owns two edges: to its neighbour within the ring and to the same
/// segment on the next ring.
///
/// Counts below [`MIN_DIVISIONS`] are raised to it, in every build.
pub fn create_torus(params: TorusParams) -> Topology {
    if params.segments < MIN_DIVISIONS || params.rings < MIN_DIVISIONS {
        log::warn!(
            "torus {}x{} raised to at least {} divisions",
            params.rings,
            params.segments,
            MIN_DIVISIONS
        );
    }
    let segments = params.segments.max(MIN_DIVISIONS);
    let rings = params.rings.max(MIN_DIVISIONS);
    let (major, minor) = (params.major_radius, params.minor_radius);

    let vertices = (0..rings)
        .flat_map(|i| {
            let phi = TAU * i as f32 / rings as f32;
            (0..segments).map(move |j| {
                let theta = TAU * j as f32 / segments as f32;
                let tube = major + minor * theta.cos();
                Vec3::new(tube * phi.cos(), tube * phi.sin(), minor * theta.sin())
            })
        })
        .collect();

    let index = |ring: usize, segment: usize| ring * segments + segment;
    let edges = (0..rings)
        .flat_map(|i| {
            (0..segments).flat_map(move |j| {
                [
                    Edge::new(index(i, j), index(i, (j + 1) % segments)),
                    Edge::new(index(i, j), index((i + 1) % rings, j)),
                ]
            })
        })
        .collect();

    Topology::wireframe("torus", vertices, edges)
}
