use glam::Vec3;

use super::{Edge, Topology};

const VERTICES: [[f32; 3]; 8] = [
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (0, 3),
    (0, 4),
    (2, 1),
    (2, 3),
    (2, 7),
    (6, 3),
    (6, 4),
    (6, 7),
    (5, 1),
    (5, 4),
    (5, 7),
];

/// Unit-extent cube centred on the origin: 8 corners, 12 edges.
pub fn create_cube() -> Topology {
    let vertices = VERTICES.iter().map(|&v| Vec3::from_array(v)).collect();
    let edges = EDGES.iter().map(|&(a, b)| Edge::new(a, b)).collect();
    Topology::wireframe("cube", vertices, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_edges_have_unit_length_two() {
        let cube = create_cube();
        for (a, b) in cube.segments() {
            assert_eq!(a.distance(b), 2.0, "edge {:?} -> {:?} is not adjacent", a, b);
        }
    }
}
