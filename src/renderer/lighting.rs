//! Key and fill directional lights that follow the camera.
//!
//! Light directions are configured in view space and converted to world
//! space on the CPU whenever the camera moves.

use glam::Vec3;

use crate::camera::Camera;
use crate::options::LightingOptions;

/// GPU lighting uniform.
/// Must match the WGSL `LightingUniform` struct layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// World-space direction toward the key light.
    pub key_dir: [f32; 3],
    /// Key light intensity.
    pub key_intensity: f32,
    /// World-space direction toward the fill light.
    pub fill_dir: [f32; 3],
    /// Fill light intensity (0 when only the key light is on).
    pub fill_intensity: f32,
    /// Ambient term.
    pub ambient: f32,
    /// Blinn-Phong specular strength.
    pub specular_intensity: f32,
    /// Blinn-Phong exponent.
    pub shininess: f32,
    _pad: f32,
}

/// Rotate a view-space direction into world space for `camera`.
fn view_to_world(camera: &Camera, dir: [f32; 3]) -> Vec3 {
    let back = (camera.eye - camera.target).normalize_or(Vec3::Z);
    let right = camera.up.cross(back).normalize_or(Vec3::X);
    let up = back.cross(right);
    (right * dir[0] + up * dir[1] + back * dir[2]).normalize_or(back)
}

impl LightingUniform {
    /// Uniform for `options` seen from `camera`.
    #[must_use]
    pub fn new(
        options: &LightingOptions,
        camera: &Camera,
        key_light_only: bool,
    ) -> Self {
        Self {
            key_dir: view_to_world(camera, options.light1_dir).to_array(),
            key_intensity: options.light1_intensity,
            fill_dir: view_to_world(camera, options.light2_dir).to_array(),
            fill_intensity: if key_light_only {
                0.0
            } else {
                options.light2_intensity
            },
            ambient: options.ambient,
            specular_intensity: options.specular_intensity,
            shininess: options.shininess,
            _pad: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(eye: Vec3) -> Camera {
        Camera {
            eye,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy: 50.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }

    fn close(a: [f32; 3], b: Vec3) -> bool {
        (Vec3::from(a) - b).length() < 1e-5
    }

    #[test]
    fn default_camera_keeps_view_directions() {
        let opts = LightingOptions::default();
        let u = LightingUniform::new(&opts, &camera(Vec3::Z * 10.0), false);
        assert!(close(u.key_dir, Vec3::from(opts.light1_dir).normalize()));
        assert!(close(u.fill_dir, Vec3::from(opts.light2_dir).normalize()));
        assert_eq!(u.fill_intensity, opts.light2_intensity);
    }

    #[test]
    fn lights_follow_the_camera() {
        let mut opts = LightingOptions::default();
        opts.light1_dir = [0.0, 0.0, 1.0];
        let u = LightingUniform::new(&opts, &camera(Vec3::X * 4.0), false);
        assert!(close(u.key_dir, Vec3::X));
    }

    #[test]
    fn key_light_only_turns_off_the_fill() {
        let opts = LightingOptions::default();
        let u = LightingUniform::new(&opts, &camera(Vec3::Z), true);
        assert_eq!(u.fill_intensity, 0.0);
        assert_eq!(u.key_intensity, opts.light1_intensity);
    }

    #[test]
    fn uniform_is_three_vec4s() {
        assert_eq!(size_of::<LightingUniform>(), 48);
    }
}
