//! Unit meshes the instanced passes scale per instance.
//!
//! Triangles wind counter-clockwise seen from outside.

use glam::Vec3;
use rustc_hash::FxHashMap;

/// Vertex of a unit mesh.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UnitVertex {
    /// Position.
    pub position: [f32; 3],
    /// Unit normal.
    pub normal: [f32; 3],
}

impl UnitVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    /// `wgpu` vertex layout for this struct.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Indexed unit mesh.
#[derive(Debug, Clone, Default)]
pub struct UnitMesh {
    /// Vertices.
    pub vertices: Vec<UnitVertex>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
}

/// Sphere of radius 1: an icosahedron split `subdivisions` times with
/// every vertex pushed onto the sphere.
#[must_use]
pub fn icosphere(subdivisions: u32) -> UnitMesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let mut points: Vec<Vec3> = [
        (-1.0, t, 0.0),
        (1.0, t, 0.0),
        (-1.0, -t, 0.0),
        (1.0, -t, 0.0),
        (0.0, -1.0, t),
        (0.0, 1.0, t),
        (0.0, -1.0, -t),
        (0.0, 1.0, -t),
        (t, 0.0, -1.0),
        (t, 0.0, 1.0),
        (-t, 0.0, -1.0),
        (-t, 0.0, 1.0),
    ]
    .iter()
    .map(|&(x, y, z)| Vec3::new(x, y, z).normalize())
    .collect();

    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];
    for face in &mut faces {
        let [a, b, c] = face.map(|i| points[i as usize]);
        if (b - a).cross(c - a).dot(a + b + c) < 0.0 {
            face.swap(1, 2);
        }
    }

    for _ in 0..subdivisions {
        let mut midpoints: FxHashMap<(u32, u32), u32> = FxHashMap::default();
        let mut midpoint = |i: u32, j: u32| -> u32 {
            let key = (i.min(j), i.max(j));
            *midpoints.entry(key).or_insert_with(|| {
                let p = (points[i as usize] + points[j as usize]).normalize();
                points.push(p);
                points.len() as u32 - 1
            })
        };
        faces = faces
            .iter()
            .flat_map(|&[a, b, c]| {
                let ab = midpoint(a, b);
                let bc = midpoint(b, c);
                let ca = midpoint(c, a);
                [[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]
            })
            .collect();
    }

    UnitMesh {
        vertices: points.iter().map(|&p| UnitVertex::new(p, p)).collect(),
        indices: faces.into_iter().flatten().collect(),
    }
}

/// Capped cylinder of radius 1 spanning `y ∈ [-0.5, 0.5]` with `sides`
/// segments (at least 3).
#[must_use]
pub fn cylinder(sides: u32) -> UnitMesh {
    let sides = sides.max(3);
    let ring: Vec<(f32, f32)> = (0..sides)
        .map(|i| {
            let angle = i as f32 / sides as f32 * std::f32::consts::TAU;
            (angle.cos(), angle.sin())
        })
        .collect();

    let mut mesh = UnitMesh::default();

    // Side: bottom ring then top ring.
    for y in [-0.5, 0.5] {
        mesh.vertices.extend(ring.iter().map(|&(x, z)| {
            UnitVertex::new(Vec3::new(x, y, z), Vec3::new(x, 0.0, z))
        }));
    }
    for i in 0..sides {
        let next = (i + 1) % sides;
        let (b0, b1) = (i, next);
        let (t0, t1) = (i + sides, next + sides);
        mesh.indices.extend([b0, t0, b1, b1, t0, t1]);
    }

    // Caps: center then ring, normals along the axis.
    for (y, normal) in [(0.5, Vec3::Y), (-0.5, Vec3::NEG_Y)] {
        let center = mesh.vertices.len() as u32;
        mesh.vertices.push(UnitVertex::new(Vec3::new(0.0, y, 0.0), normal));
        mesh.vertices.extend(
            ring.iter()
                .map(|&(x, z)| UnitVertex::new(Vec3::new(x, y, z), normal)),
        );
        for i in 0..sides {
            let a = center + 1 + i;
            let b = center + 1 + (i + 1) % sides;
            if normal.y > 0.0 {
                mesh.indices.extend([center, b, a]);
            } else {
                mesh.indices.extend([center, a, b]);
            }
        }
    }

    mesh
}
