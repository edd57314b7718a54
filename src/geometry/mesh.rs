use anyhow::{bail, Result};
use glam::Vec3;

use super::Topology;
use crate::gradient::centroid;
use crate::math::AABB;

/// Largest bounding dimension of every imported mesh after normalisation.
pub const CANONICAL_SIZE: f32 = 10.0;

/// Recentres `points` on their mean and rescales them uniformly so the
/// largest bounding dimension equals `size`.
///
/// Returns the scale factor applied. A zero-extent point set is only
/// recentred (scale 1).
pub fn normalize_to_size(points: &mut [Vec3], size: f32) -> f32 {
    let Some(bounds) = AABB::from_points(points) else {
        return 1.0;
    };

    let largest = bounds.largest_dimension();
    let center = centroid(points);
    let scale = if largest > 0.0 { size / largest } else { 1.0 };

    for point in points.iter_mut() {
        *point = (*point - center) * scale;
    }

    scale
}

/// Builds a normalised triangle topology from a flat vertex stream.
///
/// Fails when the stream is empty, is not a whole number of triangles, or
/// holds non-finite coordinates.
pub fn from_triangle_stream(name: impl Into<String>, mut stream: Vec<Vec3>) -> Result<Topology> {
    let name = name.into();

    if stream.is_empty() {
        bail!("{}: mesh contains no triangles", name);
    }
    if stream.len() % 3 != 0 {
        bail!(
            "{}: vertex stream length {} is not a multiple of 3",
            name,
            stream.len()
        );
    }
    if let Some(index) = stream.iter().position(|v| !v.is_finite()) {
        bail!("{}: vertex {} has a non-finite coordinate", name, index);
    }

    let extent = AABB::from_points(&stream).map_or(0.0, |b| b.largest_dimension());
    if extent == 0.0 {
        log::warn!("{}: all vertices coincide, mesh left unscaled", name);
    }

    let scale = normalize_to_size(&mut stream, CANONICAL_SIZE);
    log::info!(
        "{}: {} triangles normalised to size {} (scale {:.4})",
        name,
        stream.len() / 3,
        CANONICAL_SIZE,
        scale
    );

    Ok(Topology::triangles(name, stream))
}
