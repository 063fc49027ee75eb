//! Cartoon tube along the alpha-carbon trace.
//!
//! Each chain's CA positions are interpolated with a Catmull-Rom spline,
//! framed with rotation-minimizing frames and swept with a circular
//! profile.

use glam::Vec3;

use super::instances::{MeshData, MeshVertex};

/// A point along the spline with position, tangent, and frame vectors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SplinePoint {
    pub pos: Vec3,
    pub tangent: Vec3,
    pub normal: Vec3,
    pub binormal: Vec3,
}

/// Tube sweep parameters.
#[derive(Debug, Clone, Copy)]
pub struct TubeParams {
    /// Tube radius in Å.
    pub radius: f32,
    /// Spline samples between consecutive CA atoms.
    pub segments_per_span: usize,
    /// Vertices around the tube circumference.
    pub sides: usize,
    /// RGBA color.
    pub color: [f32; 4],
}

/// Catmull-Rom spline interpolation (passes through all control points).
pub(crate) fn catmull_rom(points: &[Vec3], segments_per_span: usize) -> Vec<Vec3> {
    let n = points.len();
    if n < 2 || segments_per_span == 0 {
        return points.to_vec();
    }
    if n < 3 {
        return linear_interpolate(points, segments_per_span);
    }

    let mut result = Vec::with_capacity((n - 1) * segments_per_span + 1);

    for i in 0..n - 1 {
        let p0 = if i == 0 {
            points[0] * 2.0 - points[1]
        } else {
            points[i - 1]
        };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = if i + 2 >= n {
            points[n - 1] * 2.0 - points[n - 2]
        } else {
            points[i + 2]
        };

        for j in 0..segments_per_span {
            let t = j as f32 / segments_per_span as f32;
            let t2 = t * t;
            let t3 = t2 * t;

            let pos = 0.5
                * ((2.0 * p1)
                    + (-p0 + p2) * t
                    + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
                    + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3);
            result.push(pos);
        }
    }

    result.push(points[n - 1]);
    result
}

/// Linear interpolation fallback for short point sequences.
pub(crate) fn linear_interpolate(points: &[Vec3], segments_per_span: usize) -> Vec<Vec3> {
    let mut result = Vec::new();
    for pair in points.windows(2) {
        for j in 0..segments_per_span {
            let t = j as f32 / segments_per_span as f32;
            result.push(pair[0].lerp(pair[1], t));
        }
    }
    if let Some(&last) = points.last() {
        result.push(last);
    }
    result
}

/// Attach finite-difference tangents to sampled positions.
fn with_tangents(positions: &[Vec3]) -> Vec<SplinePoint> {
    let n = positions.len();
    (0..n)
        .map(|i| {
            let prev = positions[i.saturating_sub(1)];
            let next = positions[(i + 1).min(n - 1)];
            SplinePoint {
                pos: positions[i],
                tangent: (next - prev).try_normalize().unwrap_or(Vec3::Z),
                normal: Vec3::ZERO,
                binormal: Vec3::ZERO,
            }
        })
        .collect()
}

/// Rotation-minimizing frames by double reflection.
pub(crate) fn compute_rmf(points: &mut [SplinePoint]) {
    if points.is_empty() {
        return;
    }

    let t0 = points[0].tangent;
    let arbitrary = if t0.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    let n0 = t0.cross(arbitrary).normalize();
    let b0 = t0.cross(n0).normalize();

    points[0].normal = n0;
    points[0].binormal = b0;

    for i in 0..points.len() - 1 {
        let x_i = points[i].pos;
        let x_i1 = points[i + 1].pos;
        let t_i = points[i].tangent;
        let t_i1 = points[i + 1].tangent;
        let r_i = points[i].normal;

        let v1 = x_i1 - x_i;
        let c1 = v1.dot(v1);

        if c1 < 1e-10 {
            points[i + 1].normal = r_i;
            points[i + 1].binormal = points[i].binormal;
            continue;
        }

        let r_i_l = r_i - (2.0 / c1) * v1.dot(r_i) * v1;
        let t_i_l = t_i - (2.0 / c1) * v1.dot(t_i) * v1;

        let v2 = t_i1 - t_i_l;
        let c2 = v2.dot(v2);

        let r_i1 = if c2 < 1e-10 {
            r_i_l
        } else {
            r_i_l - (2.0 / c2) * v2.dot(r_i_l) * v2
        };

        let r_i1 = (r_i1 - t_i1 * t_i1.dot(r_i1))
            .try_normalize()
            .unwrap_or(r_i);
        let s_i1 = t_i1.cross(r_i1).try_normalize().unwrap_or(points[i].binormal);

        points[i + 1].normal = r_i1;
        points[i + 1].binormal = s_i1;
    }
}

/// Sweep a circular profile along `points`.
fn sweep(points: &[SplinePoint], params: &TubeParams) -> MeshData {
    let sides = params.sides.max(3);
    let mut mesh = MeshData {
        vertices: Vec::with_capacity(points.len() * sides),
        indices: Vec::with_capacity(points.len().saturating_sub(1) * sides * 6),
    };

    for point in points {
        for k in 0..sides {
            let angle = (k as f32 / sides as f32) * std::f32::consts::TAU;
            let offset = point.normal * angle.cos() + point.binormal * angle.sin();
            mesh.vertices.push(MeshVertex {
                position: (point.pos + offset * params.radius).into(),
                normal: offset.normalize_or_zero().into(),
                color: params.color,
            });
        }
    }

    for i in 0..points.len().saturating_sub(1) {
        let ring = i * sides;
        let next_ring = (i + 1) * sides;
        for k in 0..sides {
            let k_next = (k + 1) % sides;
            let v0 = (ring + k) as u32;
            let v1 = (ring + k_next) as u32;
            let v2 = (next_ring + k) as u32;
            let v3 = (next_ring + k_next) as u32;
            mesh.indices.extend_from_slice(&[v0, v2, v1]);
            mesh.indices.extend_from_slice(&[v1, v2, v3]);
        }
    }

    mesh
}

/// Build one tube per chain and merge them into a single mesh.
///
/// Chains with fewer than two points are skipped.
#[must_use]
pub fn tube_mesh(chains: &[Vec<Vec3>], params: &TubeParams) -> MeshData {
    let mut mesh = MeshData::default();
    for chain in chains.iter().filter(|c| c.len() >= 2) {
        let positions = catmull_rom(chain, params.segments_per_span.max(1));
        let mut points = with_tangents(&positions);
        compute_rmf(&mut points);
        mesh.append(&sweep(&points, params));
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TubeParams {
        TubeParams {
            radius: 0.3,
            segments_per_span: 4,
            sides: 8,
            color: [0.5, 0.8, 0.5, 1.0],
        }
    }

    #[test]
    fn catmull_rom_passes_through_control_points() {
        let pts = [
            Vec3::ZERO,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 1.0, 1.0),
        ];
        let out = catmull_rom(&pts, 4);
        assert_eq!(out.len(), 3 * 4 + 1);
        for (i, p) in pts.iter().enumerate() {
            assert!((out[i * 4] - *p).length() < 1e-5);
        }
    }

    #[test]
    fn two_points_fall_back_to_lines() {
        let out = catmull_rom(&[Vec3::ZERO, Vec3::X], 2);
        assert_eq!(out, vec![Vec3::ZERO, Vec3::X * 0.5, Vec3::X]);
    }

    #[test]
    fn rmf_frames_are_orthonormal() {
        let positions: Vec<Vec3> = (0..20)
            .map(|i| {
                let t = i as f32 * 0.3;
                Vec3::new(t.cos(), t.sin(), t * 0.2)
            })
            .collect();
        let mut points = with_tangents(&positions);
        compute_rmf(&mut points);
        for p in &points {
            assert!(p.normal.dot(p.tangent).abs() < 1e-3);
            assert!(p.binormal.dot(p.tangent).abs() < 1e-3);
            assert!((p.normal.length() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn tube_has_a_ring_per_sample() {
        let chain = vec![Vec3::ZERO, Vec3::X * 3.8, Vec3::new(7.6, 1.0, 0.0)];
        let mesh = tube_mesh(&[chain], &params());
        let rings = 2 * 4 + 1;
        assert_eq!(mesh.vertices.len(), rings * 8);
        assert_eq!(mesh.indices.len(), (rings - 1) * 8 * 6);
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn vertices_sit_on_the_radius() {
        let mesh = tube_mesh(&[vec![Vec3::ZERO, Vec3::Z * 2.0]], &params());
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            let radial = Vec3::new(p.x, p.y, 0.0).length();
            assert!((radial - 0.3).abs() < 1e-4);
        }
    }

    #[test]
    fn short_chains_are_skipped() {
        assert!(tube_mesh(&[vec![Vec3::ZERO]], &params()).is_empty());
        assert!(tube_mesh(&[], &params()).is_empty());
    }
}
