//! GPU-layout instance and vertex records.
//!
//! Every struct here is `Pod` and mirrors a WGSL struct in
//! `assets/shaders`.

use glam::{Quat, Vec3};

/// Per-instance data for the sphere pass.
/// Must match the WGSL `SphereInstance` struct layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SphereInstance {
    /// xyz = position, w = radius
    pub center: [f32; 4],
    /// RGBA color
    pub color: [f32; 4],
}

impl SphereInstance {
    /// Sphere at `center` with `radius` and `color`.
    #[must_use]
    pub fn new(center: Vec3, radius: f32, color: [f32; 4]) -> Self {
        Self {
            center: [center.x, center.y, center.z, radius],
            color,
        }
    }

    /// Center position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.center[0], self.center[1], self.center[2])
    }

    /// Radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.center[3]
    }
}

/// Per-instance data for the cylinder (stick) pass.
/// Must match the WGSL `CylinderInstance` struct layout.
///
/// The unit cylinder spans `y ∈ [-0.5, 0.5]` with radius 1; the vertex
/// shader scales it by `(radius, length, radius)`, rotates it by
/// `rotation` and moves it to `center`. The lower half takes `color_a`,
/// the upper half `color_b`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CylinderInstance {
    /// xyz = midpoint, w = radius
    pub center: [f32; 4],
    /// Quaternion (x, y, z, w) taking +Y onto the stick axis
    pub rotation: [f32; 4],
    /// rgb = color of the origin half, w = length
    pub color_a: [f32; 4],
    /// rgb = color of the extremity half, w unused
    pub color_b: [f32; 4],
}

impl CylinderInstance {
    /// Stick from `origin` to `extremity`.
    ///
    /// Zero-length sticks keep the identity rotation; sticks pointing
    /// straight down rotate half a turn around X.
    #[must_use]
    pub fn between(
        origin: Vec3,
        extremity: Vec3,
        radius: f32,
        color_a: [f32; 3],
        color_b: [f32; 3],
    ) -> Self {
        let axis = extremity - origin;
        let length = axis.length();
        let rotation = axis
            .try_normalize()
            .map_or(Quat::IDENTITY, |dir| {
                if dir.dot(Vec3::Y) < -0.999_999 {
                    Quat::from_rotation_x(std::f32::consts::PI)
                } else {
                    Quat::from_rotation_arc(Vec3::Y, dir)
                }
            });
        let mid = (origin + extremity) * 0.5;
        Self {
            center: [mid.x, mid.y, mid.z, radius],
            rotation: rotation.to_array(),
            color_a: [color_a[0], color_a[1], color_a[2], length],
            color_b: [color_b[0], color_b[1], color_b[2], 0.0],
        }
    }

    /// Midpoint.
    #[must_use]
    pub fn midpoint(&self) -> Vec3 {
        Vec3::new(self.center[0], self.center[1], self.center[2])
    }

    /// Radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.center[3]
    }

    /// Axis length.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.color_a[3]
    }

    /// Unit axis direction.
    #[must_use]
    pub fn axis(&self) -> Vec3 {
        Quat::from_array(self.rotation) * Vec3::Y
    }

    /// The two axis endpoints.
    #[must_use]
    pub fn endpoints(&self) -> (Vec3, Vec3) {
        let half = self.axis() * (self.length() * 0.5);
        let mid = self.midpoint();
        (mid - half, mid + half)
    }
}

/// Vertex of a triangle mesh (surfaces, cartoon tube).
/// Must match the WGSL `MeshVertex` input layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position.
    pub position: [f32; 3],
    /// Unit normal.
    pub normal: [f32; 3],
    /// RGBA color.
    pub color: [f32; 4],
}

impl MeshVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4,
    ];

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

/// An indexed triangle mesh ready for upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertices.
    pub vertices: Vec<MeshVertex>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Append another mesh, offsetting its indices.
    pub fn append(&mut self, other: &Self) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// `true` when there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn cylinder_between_recovers_endpoints() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, -2.0, 3.0);
        let cyl = CylinderInstance::between(a, b, 0.2, [1.0; 3], [0.0; 3]);
        assert_close(cyl.midpoint(), (a + b) * 0.5);
        assert!((cyl.length() - 5.0).abs() < 1e-5);
        assert_eq!(cyl.radius(), 0.2);
        let (s, e) = cyl.endpoints();
        assert_close(s, a);
        assert_close(e, b);
    }

    #[test]
    fn vertical_sticks_need_no_rotation() {
        let cyl = CylinderInstance::between(Vec3::ZERO, Vec3::Y, 0.1, [1.0; 3], [1.0; 3]);
        assert_close(cyl.axis(), Vec3::Y);
    }

    #[test]
    fn downward_sticks_flip() {
        let cyl =
            CylinderInstance::between(Vec3::ZERO, Vec3::NEG_Y * 2.0, 0.1, [1.0; 3], [1.0; 3]);
        assert_close(cyl.axis(), Vec3::NEG_Y);
        let (s, e) = cyl.endpoints();
        assert_close(s, Vec3::ZERO);
        assert_close(e, Vec3::NEG_Y * 2.0);
    }

    #[test]
    fn degenerate_stick_is_identity() {
        let cyl = CylinderInstance::between(Vec3::ONE, Vec3::ONE, 0.1, [1.0; 3], [1.0; 3]);
        assert_eq!(cyl.length(), 0.0);
        assert_eq!(cyl.rotation, Quat::IDENTITY.to_array());
    }

    #[test]
    fn mesh_append_offsets_indices() {
        let tri = MeshData {
            vertices: vec![
                MeshVertex {
                    position: [0.0; 3],
                    normal: [0.0, 0.0, 1.0],
                    color: [1.0; 4],
                };
                3
            ],
            indices: vec![0, 1, 2],
        };
        let mut mesh = MeshData::default();
        mesh.append(&tri);
        mesh.append(&tri);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(!mesh.is_empty());
    }

    #[test]
    fn layouts_match_wgsl_sizes() {
        assert_eq!(size_of::<SphereInstance>(), 32);
        assert_eq!(size_of::<CylinderInstance>(), 64);
        assert_eq!(size_of::<MeshVertex>(), 40);
    }
}
