use glam::{Quat, Vec2, Vec3};

use crate::camera::core::Camera;
use crate::options::CameraOptions;
use crate::scene::bounds::Aabb;

/// Trackball-style orbit camera around a focus point.
///
/// The eye sits at `focus + orientation·Z·distance`; dragging rotates the
/// orientation around the camera's own up and right axes, so there is no
/// gimbal lock and the model can be turned freely.
#[derive(Debug, Clone)]
pub struct CameraController {
    orientation: Quat,
    distance: f32,
    focus_point: Vec3,
    min_distance: f32,
    max_distance: f32,
    /// Bounds of the last fitted model, used by [`Self::reset`].
    fitted: Option<Aabb>,

    /// Camera derived from the orbit state.
    pub camera: Camera,
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
    /// Pan distance per pixel, relative to the orbit distance.
    pub pan_speed: f32,
    /// Distance fraction per scroll step.
    pub zoom_speed: f32,
}

impl CameraController {
    /// Controller looking down -Z at the origin.
    #[must_use]
    pub fn new(options: &CameraOptions, width: u32, height: u32) -> Self {
        let focus_point = Vec3::ZERO;
        let distance = 50.0;

        let camera = Camera {
            eye: focus_point + Vec3::new(0.0, 0.0, distance),
            target: focus_point,
            up: Vec3::Y,
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        };

        let mut controller = Self {
            orientation: Quat::IDENTITY,
            distance,
            focus_point,
            min_distance: options.min_distance,
            max_distance: options.zfar,
            fitted: None,
            camera,
            rotate_speed: 0.0,
            pan_speed: 0.0,
            zoom_speed: 0.0,
        };
        controller.apply_options(options);
        controller
    }

    /// Push camera options to the controller.
    pub fn apply_options(&mut self, options: &CameraOptions) {
        self.camera.fovy = options.fovy;
        self.min_distance = options.min_distance;
        self.rotate_speed = options.rotate_speed * 0.02;
        self.pan_speed = options.pan_speed * 0.004;
        self.zoom_speed = options.zoom_speed * 0.5;
        if let Some(bounds) = self.fitted {
            self.fit_to_bounds(&bounds);
        } else {
            self.update_camera_pos();
        }
    }

    fn update_camera_pos(&mut self) {
        let dir = self.orientation * Vec3::Z;

        self.camera.eye = self.focus_point + (dir * self.distance);
        self.camera.target = self.focus_point;
        self.camera.up = self.orientation * Vec3::Y;
    }

    /// Current orbit distance.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Current focus point.
    #[must_use]
    pub fn focus_point(&self) -> Vec3 {
        self.focus_point
    }

    /// Largest allowed orbit distance.
    #[must_use]
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Update the aspect ratio after a resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.aspect = width as f32 / height as f32;
        }
    }

    /// Orbit by a pointer drag in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        // Horizontal rotation around camera's up vector
        let up = self.orientation * Vec3::Y;
        let horizontal_rotation =
            Quat::from_axis_angle(up, -delta.x * self.rotate_speed);
        self.orientation = horizontal_rotation * self.orientation;

        // Vertical rotation around camera's right vector (after horizontal
        // rotation)
        let right = self.orientation * Vec3::X;
        let vertical_rotation =
            Quat::from_axis_angle(right, -delta.y * self.rotate_speed);
        self.orientation = (vertical_rotation * self.orientation).normalize();

        self.update_camera_pos();
    }

    /// Move the focus point in the view plane by a pointer drag in pixels.
    /// The step scales with the orbit distance.
    pub fn pan(&mut self, delta: Vec2) {
        let right = self.orientation * Vec3::X;
        let up = self.orientation * Vec3::Y;
        let speed = self.pan_speed * self.distance;

        self.focus_point += right * (-delta.x * speed) + up * (delta.y * speed);
        self.update_camera_pos();
    }

    /// Dolly toward (positive) or away from the focus point.
    pub fn zoom(&mut self, delta: f32) {
        self.distance *= 1.0 - delta * self.zoom_speed;
        self.distance = self
            .distance
            .clamp(self.min_distance, self.max_distance.max(self.min_distance));
        self.update_camera_pos();
    }

    /// Frame `bounds`: the whole box diagonal fits the vertical field of
    /// view, the camera keeps its heading on the XZ plane and the clip
    /// planes and zoom limit scale with the model.
    pub fn fit_to_bounds(&mut self, bounds: &Aabb) {
        if bounds.is_empty() {
            return;
        }
        self.fitted = Some(*bounds);

        // A single atom has no extent; frame it like a 1 Å box.
        let size = match bounds.diagonal() {
            d if d > f32::EPSILON => d,
            _ => 1.0,
        };
        let fovy = self.camera.fovy.to_radians();
        self.distance = size * 0.5 / (fovy * 0.5).tan();

        let heading = self.orientation * Vec3::Z;
        let flat = Vec3::new(heading.x, 0.0, heading.z)
            .try_normalize()
            .unwrap_or(Vec3::Z);
        self.orientation = Quat::from_rotation_y(flat.x.atan2(flat.z));

        self.camera.znear = size / 1000.0;
        self.camera.zfar = size * 1000.0;
        self.max_distance = size * 100.0;
        self.focus_point = bounds.center();
        self.update_camera_pos();
    }

    /// Return to the home orientation and frame the last fitted bounds.
    pub fn reset(&mut self) {
        self.orientation = Quat::IDENTITY;
        match self.fitted {
            Some(bounds) => self.fit_to_bounds(&bounds),
            None => {
                self.focus_point = Vec3::ZERO;
                self.update_camera_pos();
            }
        }
    }

    /// Forget the fitted model and return to the initial view.
    pub fn clear(&mut self, options: &CameraOptions) {
        let aspect = self.camera.aspect;
        *self = Self::new(options, 1, 1);
        self.camera.aspect = aspect;
    }
}
