//! STL surface reader (binary and ASCII).
//!
//! STL stores independent triangles, so every facet gets its own three
//! vertices. A binary file is recognized by its exact size
//! (`84 + 50 * triangle_count`); anything else is read as ASCII.

use glam::Vec3;

use super::SurfaceMesh;
use crate::error::MolvisError;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

fn is_binary(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_LEN + 4 {
        return false;
    }
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    count
        .checked_mul(FACET_LEN)
        .and_then(|n| n.checked_add(HEADER_LEN + 4))
        == Some(bytes.len())
}

fn read_vec3(chunk: &[u8]) -> Vec3 {
    let f = |i: usize| {
        f32::from_le_bytes([chunk[i], chunk[i + 1], chunk[i + 2], chunk[i + 3]])
    };
    Vec3::new(f(0), f(4), f(8))
}

fn push_facet(mesh: &mut SurfaceMesh, normal: Vec3, corners: [Vec3; 3]) {
    let computed = (corners[1] - corners[0]).cross(corners[2] - corners[0]);
    let n = normal
        .try_normalize()
        .or_else(|| computed.try_normalize())
        .unwrap_or(Vec3::Y);
    let base = mesh.positions.len() as u32;
    mesh.positions.extend_from_slice(&corners);
    mesh.normals.extend_from_slice(&[n; 3]);
    mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
}

fn parse_binary(name: &str, bytes: &[u8]) -> SurfaceMesh {
    let mut mesh = SurfaceMesh {
        name: name.to_owned(),
        ..SurfaceMesh::default()
    };
    for facet in bytes[HEADER_LEN + 4..].chunks_exact(FACET_LEN) {
        let normal = read_vec3(&facet[0..12]);
        let corners = [
            read_vec3(&facet[12..24]),
            read_vec3(&facet[24..36]),
            read_vec3(&facet[36..48]),
        ];
        push_facet(&mut mesh, normal, corners);
    }
    mesh
}

fn parse_ascii(name: &str, text: &str) -> Result<SurfaceMesh, MolvisError> {
    let mut mesh = SurfaceMesh {
        name: name.to_owned(),
        ..SurfaceMesh::default()
    };
    let mut normal = Vec3::ZERO;
    let mut corners: Vec<Vec3> = Vec::with_capacity(3);

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("solid") => {
                if let Some(solid_name) = parts.next() {
                    solid_name.clone_into(&mut mesh.name);
                }
            }
            Some("facet") => {
                // "facet normal nx ny nz"
                let _ = parts.next();
                normal = read_numbers(parts, line_no)?;
                corners.clear();
            }
            Some("vertex") => corners.push(read_numbers(parts, line_no)?),
            Some("endfacet") => {
                if corners.len() != 3 {
                    return Err(MolvisError::StructureLoad(format!(
                        "line {line_no}: facet has {} vertices",
                        corners.len()
                    )));
                }
                push_facet(&mut mesh, normal, [corners[0], corners[1], corners[2]]);
            }
            _ => {}
        }
    }
    Ok(mesh)
}

fn read_numbers<'a>(
    parts: impl Iterator<Item = &'a str>,
    line_no: usize,
) -> Result<Vec3, MolvisError> {
    let values: Vec<f32> = parts.filter_map(|s| s.parse().ok()).collect();
    match values.as_slice() {
        [x, y, z, ..] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(MolvisError::StructureLoad(format!(
            "line {line_no}: expected three numbers"
        ))),
    }
}

/// Parse STL bytes into a [`SurfaceMesh`].
///
/// # Errors
///
/// Returns [`MolvisError::StructureLoad`] for malformed ASCII facets or a
/// file without any triangles.
pub fn parse(name: &str, bytes: &[u8]) -> Result<SurfaceMesh, MolvisError> {
    let mesh = if is_binary(bytes) {
        parse_binary(name, bytes)
    } else {
        let text = String::from_utf8_lossy(bytes);
        parse_ascii(name, &text)?
    };
    if mesh.indices.is_empty() {
        return Err(MolvisError::StructureLoad(format!("{name}: no facets")));
    }
    log::info!("{}: {} triangles", mesh.name, mesh.triangle_count());
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_stl(facets: &[[Vec3; 4]]) -> Vec<u8> {
        let mut bytes = vec![0_u8; HEADER_LEN];
        bytes.extend_from_slice(&(facets.len() as u32).to_le_bytes());
        for facet in facets {
            for v in facet {
                for c in v.to_array() {
                    bytes.extend_from_slice(&c.to_le_bytes());
                }
            }
            bytes.extend_from_slice(&[0, 0]);
        }
        bytes
    }

    #[test]
    fn reads_binary_facets() {
        let bytes = binary_stl(&[[Vec3::Z, Vec3::ZERO, Vec3::X, Vec3::Y]]);
        assert!(is_binary(&bytes));
        let mesh = parse("tri", &bytes).unwrap();
        assert_eq!(mesh.positions, vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        assert_eq!(mesh.normals, vec![Vec3::Z; 3]);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn zero_normal_is_recomputed() {
        let bytes = binary_stl(&[[Vec3::ZERO, Vec3::ZERO, Vec3::Y, Vec3::X]]);
        let mesh = parse("tri", &bytes).unwrap();
        assert!((mesh.normals[0] - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn reads_ascii_facets() {
        let text = "\
solid pocket
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid pocket
";
        let mesh = parse("file", text.as_bytes()).unwrap();
        assert_eq!(mesh.name, "pocket");
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.normals[2], Vec3::Z);
    }

    #[test]
    fn truncated_ascii_facet_fails() {
        let text = "solid x\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nendloop\nendfacet\n";
        assert!(parse("x", text.as_bytes()).is_err());
    }

    #[test]
    fn empty_input_fails() {
        assert!(parse("x", b"").is_err());
    }
}
