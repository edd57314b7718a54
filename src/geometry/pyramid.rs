use glam::Vec3;

use super::{Edge, Topology};

/// Square pyramid: apex at (0, 1, 0) over a base at y = -1.
pub fn create_pyramid() -> Topology {
    let apex = Vec3::new(0.0, 1.0, 0.0);

    // Base square corners
    let front_left = Vec3::new(-1.0, -1.0, -1.0);
    let front_right = Vec3::new(1.0, -1.0, -1.0);
    let back_right = Vec3::new(1.0, -1.0, 1.0);
    let back_left = Vec3::new(-1.0, -1.0, 1.0);

    let vertices = vec![apex, front_left, front_right, back_right, back_left];

    let sides = (1..=4).map(|corner| Edge::new(0, corner));
    let base = (1..=4).map(|corner| Edge::new(corner, corner % 4 + 1));
    let edges = sides.chain(base).collect();

    Topology::wireframe("pyramid", vertices, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pyramid_counts() {
        let pyramid = create_pyramid();
        assert_eq!(pyramid.vertex_count(), 5);
        assert_eq!(pyramid.edges().map(<[Edge]>::len), Some(8));
    }

    #[test]
    fn test_pyramid_base_is_closed_loop() {
        let pyramid = create_pyramid();
        let edges = pyramid.edges().unwrap();
        assert_eq!(&edges[4..], &[Edge(1, 2), Edge(2, 3), Edge(3, 4), Edge(4, 1)]);
    }
}
