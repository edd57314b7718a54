//! Procedural and imported topology.
//!
//! Every generator returns a [`Topology`]: a vertex list plus exactly one
//! connectivity form. Wireframe solids carry explicit edges; imported meshes
//! carry an implicit triangle list where every three consecutive vertices
//! form one triangle.

mod cube;
mod mesh;
mod pyramid;
mod torus;

use anyhow::{bail, Result};
use glam::Vec3;


pub use cube::create_cube;
pub use mesh::{from_triangle_stream, normalize_to_size, CANONICAL_SIZE};
pub use pyramid::create_pyramid;
pub use torus::{create_torus, TorusParams};

/// Unordered pair of vertex indices.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge(pub usize, pub usize);

impl Edge {
    pub const fn new(a: usize, b: usize) -> Self {
        Self(a, b)
    }

    /// Canonical (low, high) ordering, so (a, b) and (b, a) compare equal.
    pub fn key(self) -> (usize, usize) {
        if self.0 <= self.1 {
            (self.0, self.1)
        } else {
            (self.1, self.0)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Connectivity {
    /// Explicit line segments between vertex indices.
    Edges(Vec<Edge>),
    /// Flat triangle list; vertices are consumed three at a time.
    Triangles,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Topology {
    name: String,
    vertices: Vec<Vec3>,
    connectivity: Connectivity,
}

impl Topology {
    pub fn wireframe(name: impl Into<String>, vertices: Vec<Vec3>, edges: Vec<Edge>) -> Self {
        let topology = Self {
            name: name.into(),
            vertices,
            connectivity: Connectivity::Edges(edges),
        };
        debug_assert!(topology.validate().is_ok(), "{:?}", topology.validate());
        topology
    }

    pub fn triangles(name: impl Into<String>, vertices: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            vertices,
            connectivity: Connectivity::Triangles,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn edges(&self) -> Option<&[Edge]> {
        match &self.connectivity {
            Connectivity::Edges(edges) => Some(edges),
            Connectivity::Triangles => None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        match self.connectivity {
            Connectivity::Edges(_) => 0,
            Connectivity::Triangles => self.vertices.len() / 3,
        }
    }

    /// Endpoint pairs of every edge; empty for triangle topologies.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.edges()
            .unwrap_or(&[])
            .iter()
            .map(|e| (self.vertices[e.0], self.vertices[e.1]))
    }

    /// Checks the structural invariants of the connectivity.
    pub fn validate(&self) -> Result<()> {
        match &self.connectivity {
            Connectivity::Edges(edges) => {
                let count = self.vertices.len();
                for (i, edge) in edges.iter().enumerate() {
                    if edge.0 >= count || edge.1 >= count {
                        bail!(
                            "{}: edge {} ({}, {}) out of range for {} vertices",
                            self.name, i, edge.0, edge.1, count
                        );
                    }
                    if edge.0 == edge.1 {
                        bail!("{}: edge {} is a self-loop on vertex {}", self.name, i, edge.0);
                    }
                }
            }
            Connectivity::Triangles => {
                if self.vertices.len() % 3 != 0 {
                    bail!(
                        "{}: triangle stream length {} is not a multiple of 3",
                        self.name,
                        self.vertices.len()
                    );
                }
            }
        }
        Ok(())
    }
}
