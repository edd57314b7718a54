//! Hue assignment for static meshes and animated overlays.
//!
//! Two modes share the [`hsv_to_rgb`] mapper:
//! - radial: each vertex's distance from the centroid, normalised by the
//!   largest such distance, is used directly as its hue
//! - offset: an index into `count` evenly spaced slots is shifted by the
//!   animated hue phase

use glam::Vec3;

use crate::math::{hsv_to_rgb, wrap_unit, Color};

/// One color per vertex, parallel to a topology's vertex list.
pub type GradientField = Vec<Color>;

/// Below this radius (relative to the centroid magnitude) every vertex is
/// treated as coincident.
const DEGENERATE_RADIUS: f32 = 1e-6;

/// Arithmetic mean of `points`; the origin for an empty slice.
pub fn centroid(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::ZERO;
    }
    points.iter().copied().sum::<Vec3>() / points.len() as f32
}

/// Normalised radial distance of every vertex from the centroid.
///
/// Values lie in [0, 1]. Coincident vertices all map to 0.
pub fn radial_hues(vertices: &[Vec3]) -> Vec<f32> {
    let center = centroid(vertices);
    let distances: Vec<f32> = vertices.iter().map(|v| v.distance(center)).collect();
    let max_distance = distances.iter().copied().fold(0.0_f32, f32::max);

    let threshold = DEGENERATE_RADIUS * center.abs().max_element().max(1.0);
    if max_distance <= threshold {
        return vec![0.0; vertices.len()];
    }

    distances.into_iter().map(|d| d / max_distance).collect()
}

/// Fully saturated rainbow coloring by radial distance.
pub fn radial_gradient(vertices: &[Vec3]) -> GradientField {
    radial_hues(vertices)
        .into_iter()
        .map(|hue| hsv_to_rgb(hue, 1.0, 1.0))
        .collect()
}

/// Hue of slot `index` out of `count`, shifted by `phase` and wrapped.
///
/// `count` is a real number so that fractional column counts (a rectangle
/// 719.5 pixels wide) spread hues the same way the fill does.
pub fn offset_hue(phase: f32, index: usize, count: f32) -> f32 {
    if count <= 0.0 {
        return wrap_unit(phase);
    }
    wrap_unit(phase + index as f32 / count)
}

pub fn offset_color(phase: f32, index: usize, count: f32) -> Color {
    hsv_to_rgb(offset_hue(phase, index, count), 1.0, 1.0)
}
