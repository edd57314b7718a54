pub mod gltf_triangles;
pub mod stl;

use anyhow::{bail, Context, Result};
use glam::Vec3;
use std::path::Path;

pub use gltf_triangles::load_gltf_triangles;
pub use stl::{load_stl, parse_stl};

/// Decodes a triangulated solid into a flat vertex stream, picking the
/// decoder from the file extension.
pub fn load_triangle_stream(path: impl AsRef<Path>) -> Result<Vec<Vec3>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .with_context(|| format!("Mesh file has no extension: {:?}", path))?;

    match extension.as_str() {
        "stl" => load_stl(path),
        "gltf" | "glb" => load_gltf_triangles(path),
        other => bail!("Unsupported mesh format '.{}' for {:?}", other, path),
    }
}
