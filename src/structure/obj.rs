//! Wavefront OBJ surface reader.
//!
//! Only geometry is read: `v`, `vn`, `f` and the `o`/`g` name. Faces with
//! more than three corners are fan-triangulated. Corners are de-duplicated
//! per `(position, normal)` pair so shared vertices stay shared.

use glam::Vec3;
use rustc_hash::FxHashMap;

use super::SurfaceMesh;
use crate::error::MolvisError;

fn parse_vec3(
    parts: &mut std::str::SplitWhitespace<'_>,
    line_no: usize,
) -> Result<Vec3, MolvisError> {
    let mut v = [0.0_f32; 3];
    for c in &mut v {
        *c = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                MolvisError::StructureLoad(format!(
                    "line {line_no}: expected three numbers"
                ))
            })?;
    }
    Ok(Vec3::from_array(v))
}

/// Resolve a 1-based (or negative, relative) OBJ index.
fn resolve_index(raw: &str, len: usize, line_no: usize) -> Result<usize, MolvisError> {
    let bad = || {
        MolvisError::StructureLoad(format!(
            "line {line_no}: face index {raw:?} out of range"
        ))
    };
    let idx: i64 = raw.parse().map_err(|_| bad())?;
    let resolved = if idx > 0 {
        idx - 1
    } else if idx < 0 {
        len as i64 + idx
    } else {
        return Err(bad());
    };
    if resolved < 0 || resolved as usize >= len {
        return Err(bad());
    }
    Ok(resolved as usize)
}

/// Parse OBJ text into a [`SurfaceMesh`].
///
/// # Errors
///
/// Returns [`MolvisError::StructureLoad`] for malformed numbers, face
/// indices out of range, or a file without faces.
pub fn parse(name: &str, content: &str) -> Result<SurfaceMesh, MolvisError> {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut mesh_name = None;

    let mut out = SurfaceMesh::default();
    let mut corner_map: FxHashMap<(usize, Option<usize>), u32> =
        FxHashMap::default();
    let mut out_normals: Vec<Option<Vec3>> = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => positions.push(parse_vec3(&mut parts, line_no)?),
            Some("vn") => normals.push(parse_vec3(&mut parts, line_no)?),
            Some("o" | "g") => {
                if mesh_name.is_none() {
                    mesh_name = parts.next().map(str::to_owned);
                }
            }
            Some("f") => {
                let mut face = Vec::new();
                for corner in parts {
                    let mut fields = corner.split('/');
                    let v = resolve_index(
                        fields.next().unwrap_or(""),
                        positions.len(),
                        line_no,
                    )?;
                    let _texcoord = fields.next();
                    let n = match fields.next() {
                        Some(raw) if !raw.is_empty() => {
                            Some(resolve_index(raw, normals.len(), line_no)?)
                        }
                        _ => None,
                    };
                    let index = *corner_map.entry((v, n)).or_insert_with(|| {
                        out.positions.push(positions[v]);
                        out_normals.push(n.map(|n| normals[n]));
                        (out.positions.len() - 1) as u32
                    });
                    face.push(index);
                }
                if face.len() < 3 {
                    return Err(MolvisError::StructureLoad(format!(
                        "line {line_no}: face with fewer than three corners"
                    )));
                }
                for i in 1..face.len() - 1 {
                    out.indices.extend_from_slice(&[face[0], face[i], face[i + 1]]);
                }
            }
            _ => {}
        }
    }

    if out.indices.is_empty() {
        return Err(MolvisError::StructureLoad(format!("{name}: no faces")));
    }

    out.name = mesh_name.unwrap_or_else(|| name.to_owned());
    if out_normals.iter().all(Option::is_some) {
        out.normals = out_normals
            .into_iter()
            .map(|n| n.and_then(Vec3::try_normalize).unwrap_or(Vec3::Y))
            .collect();
    } else {
        out.recompute_normals();
    }

    log::info!(
        "{}: {} vertices, {} triangles",
        out.name,
        out.positions.len(),
        out.triangle_count()
    );
    Ok(out)
}
