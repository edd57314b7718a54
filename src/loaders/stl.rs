//! STL decoding (binary and ASCII).
//!
//! Binary layout: 80-byte header, little-endian `u32` facet count, then per
//! facet a normal (3×f32), three vertices (9×f32) and a `u16` attribute.
//! Normals and attributes are ignored.

use anyhow::{bail, Context, Result};
use glam::Vec3;
use std::path::Path;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

pub fn load_stl(path: impl AsRef<Path>) -> Result<Vec<Vec3>> {
    let path = path.as_ref();
    log::info!("Loading STL file: {:?}", path);

    let bytes = std::fs::read(path).with_context(|| format!("Failed to read STL file: {:?}", path))?;
    let vertices = parse_stl(&bytes).with_context(|| format!("Failed to decode STL file: {:?}", path))?;

    log::debug!("STL decoded: {} vertices", vertices.len());
    Ok(vertices)
}

/// Decodes STL bytes into a flat triangle vertex stream.
pub fn parse_stl(bytes: &[u8]) -> Result<Vec<Vec3>> {
    if let Some(count) = binary_facet_count(bytes) {
        return Ok(parse_binary(bytes, count));
    }

    if is_ascii_stl(bytes) {
        return parse_ascii(bytes);
    }

    if bytes.len() < HEADER_LEN + 4 {
        bail!("STL data is {} bytes, shorter than a binary header", bytes.len());
    }
    let declared = read_u32(bytes, HEADER_LEN) as usize;
    bail!(
        "Binary STL declares {} facets ({} bytes) but holds {} bytes",
        declared,
        HEADER_LEN + 4 + declared * FACET_LEN,
        bytes.len()
    )
}

/// Facet count when the length matches the binary layout exactly.
fn binary_facet_count(bytes: &[u8]) -> Option<usize> {
    if bytes.len() < HEADER_LEN + 4 {
        return None;
    }
    let count = read_u32(bytes, HEADER_LEN) as usize;
    let expected = count.checked_mul(FACET_LEN)?.checked_add(HEADER_LEN + 4)?;
    (expected == bytes.len()).then_some(count)
}

fn is_ascii_stl(bytes: &[u8]) -> bool {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    bytes[start..].starts_with(b"solid")
}

fn parse_binary(bytes: &[u8], count: usize) -> Vec<Vec3> {
    let mut vertices = Vec::with_capacity(count * 3);
    for facet in bytes[HEADER_LEN + 4..].chunks_exact(FACET_LEN) {
        // Skip the 12-byte normal.
        for corner in 0..3 {
            let offset = 12 + corner * 12;
            vertices.push(Vec3::new(
                read_f32(facet, offset),
                read_f32(facet, offset + 4),
                read_f32(facet, offset + 8),
            ));
        }
    }
    vertices
}

fn parse_ascii(bytes: &[u8]) -> Result<Vec<Vec3>> {
    let text = std::str::from_utf8(bytes).context("ASCII STL is not valid UTF-8")?;
    let mut vertices = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("vertex") {
            continue;
        }

        let mut coords = [0.0f32; 3];
        for coord in coords.iter_mut() {
            let token = tokens
                .next()
                .with_context(|| format!("line {}: vertex has fewer than 3 coordinates", line_no + 1))?;
            *coord = token
                .parse()
                .with_context(|| format!("line {}: invalid coordinate '{}'", line_no + 1, token))?;
        }
        vertices.push(Vec3::from_array(coords));
    }

    Ok(vertices)
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_bits(read_u32(bytes, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_stl(triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_LEN];
        buf.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for triangle in triangles {
            buf.extend_from_slice(&[0u8; 12]);
            for vertex in triangle {
                for c in vertex {
                    buf.extend_from_slice(&c.to_le_bytes());
                }
            }
            buf.extend_from_slice(&0u16.to_le_bytes());
        }
        buf
    }

    #[test]
    fn test_parse_binary_single_facet() {
        let bytes = binary_stl(&[[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 2.0, 3.0]]]);
        let vertices = parse_stl(&bytes).unwrap();
        assert_eq!(vertices, vec![Vec3::ZERO, Vec3::X, Vec3::new(0.0, 2.0, 3.0)]);
    }

    #[test]
    fn test_binary_header_starting_with_solid() {
        let mut bytes = binary_stl(&[[[1.0, 1.0, 1.0], [2.0, 1.0, 1.0], [1.0, 2.0, 1.0]]]);
        bytes[..5].copy_from_slice(b"solid");
        assert_eq!(parse_stl(&bytes).unwrap().len(), 3);
    }

    #[test]
    fn test_truncated_binary_is_rejected() {
        let mut bytes = binary_stl(&[[[0.0; 3]; 3], [[1.0; 3]; 3]]);
        bytes.truncate(bytes.len() - 10);
        let err = parse_stl(&bytes).unwrap_err();
        assert!(err.to_string().contains("declares 2 facets"));
    }

    #[test]
    fn test_parse_ascii() {
        let text = "solid tri\n  facet normal 0 0 1\n    outer loop\n      vertex 0 0 0\n      vertex 1 0 0\n      vertex 0 1 0\n    endloop\n  endfacet\nendsolid tri\n";
        let vertices = parse_stl(text.as_bytes()).unwrap();
        assert_eq!(vertices, vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
    }

    #[test]
    fn test_parse_ascii_bad_coordinate() {
        let text = "solid bad\nvertex 0 zero 0\nendsolid bad\n";
        let err = parse_stl(text.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid coordinate"));
    }

    #[test]
    fn test_short_garbage_is_rejected() {
        assert!(parse_stl(b"not a mesh").is_err());
    }
}
