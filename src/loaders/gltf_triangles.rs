use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use std::path::Path;

/// Loads a glTF/GLB file and flattens every triangle primitive into a
/// world-space vertex stream, three vertices per triangle.
pub fn load_gltf_triangles(path: impl AsRef<Path>) -> Result<Vec<Vec3>> {
    let path = path.as_ref();
    log::info!("Loading glTF file: {:?}", path);

    let (gltf, buffers, _images) =
        gltf::import(path).with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    log::debug!(
        "glTF loaded: {} scenes, {} nodes, {} meshes",
        gltf.scenes().count(),
        gltf.nodes().count(),
        gltf.meshes().count()
    );

    let mut stream = Vec::new();
    for scene in gltf.scenes() {
        log::debug!("Processing scene: {:?}", scene.name());

        for node in scene.nodes() {
            process_node(&node, &buffers, &Mat4::IDENTITY, &mut stream)?;
        }
    }

    log::debug!("Extracted {} triangles from glTF", stream.len() / 3);
    Ok(stream)
}

/// Recursively walks the node tree, accumulating transforms.
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    stream: &mut Vec<Vec3>,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, buffers, &global_transform, stream)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, stream)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    stream: &mut Vec<Vec3>,
) -> Result<()> {
    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "Skipping {:?} primitive in mesh {:?}",
                primitive.mode(),
                mesh.name()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let vertices: Vec<Vec3> = reader
            .read_positions()
            .context("Mesh primitive has no positions")?
            .map(|pos| transform.transform_point3(Vec3::from_array(pos)))
            .collect();

        match reader.read_indices() {
            Some(indices) => {
                let indices: Vec<u32> = indices.into_u32().collect();
                for triangle in indices.chunks_exact(3) {
                    for &i in triangle {
                        let vertex = vertices
                            .get(i as usize)
                            .with_context(|| format!("Index {} out of range in mesh {:?}", i, mesh.name()))?;
                        stream.push(*vertex);
                    }
                }
            }
            // No indices: positions already form a triangle list.
            None => {
                let whole = vertices.len() - vertices.len() % 3;
                stream.extend_from_slice(&vertices[..whole]);
            }
        }
    }

    Ok(())
}
