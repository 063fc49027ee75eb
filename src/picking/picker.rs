//! Pointer picking: the mouse hovers through the camera, each VR
//! controller through its pointer ray.

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;

use super::ray::{ray_aabb, ray_cylinder, ray_sphere, ray_triangle, Ray};
use crate::camera::Camera;
use crate::scene::{Aabb, Pointer, Scene, SceneGeometry, SphereInstance};
use crate::xr::ControllerPose;

/// Nearest sphere along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Sphere instance index.
    pub instance: u32,
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Nearest sphere hit by `ray`. Equal distances go to the lower index.
///
/// `bounds` should enclose every sphere; a ray that misses it returns
/// `None` without testing any sphere.
#[must_use]
pub fn pick_ray(
    spheres: &[SphereInstance],
    bounds: &Aabb,
    ray: &Ray,
) -> Option<PickHit> {
    let _ = ray_aabb(ray, bounds)?;
    let mut best: Option<(u32, f32)> = None;
    for (i, sphere) in spheres.iter().enumerate() {
        let Some(t) = ray_sphere(ray, sphere.position(), sphere.radius())
        else {
            continue;
        };
        if best.is_none_or(|(_, d)| t < d) {
            best = Some((i as u32, t));
        }
    }
    best.map(|(instance, distance)| PickHit {
        instance,
        distance,
        point: ray.at(distance),
    })
}

/// Distance to the nearest stick or mesh triangle along `ray`. These
/// are never picked but stop a VR pointer line.
#[must_use]
pub fn occluder_distance(
    geometry: &SceneGeometry,
    bounds: &Aabb,
    ray: &Ray,
) -> Option<f32> {
    let _ = ray_aabb(ray, bounds)?;
    let sticks = geometry.cylinders.iter().filter_map(|c| {
        let (a, b) = c.endpoints();
        ray_cylinder(ray, a, b, c.radius())
    });
    let triangles = geometry.meshes.iter().flat_map(|mesh| {
        let vertex = |i: u32| {
            mesh.vertices.get(i as usize).map(|v| Vec3::from(v.position))
        };
        mesh.indices.chunks_exact(3).filter_map(move |tri| {
            ray_triangle(ray, vertex(tri[0])?, vertex(tri[1])?, vertex(tri[2])?)
        })
    });
    sticks.chain(triangles).min_by(f32::total_cmp)
}

/// Turns pointer rays into hover state on the scene.
#[derive(Debug, Default)]
pub struct ObjectPicker {
    enabled: bool,
    /// Current hit of each VR controller.
    controller_hits: FxHashMap<u8, PickHit>,
}

impl ObjectPicker {
    /// A disabled picker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether picking is on.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Turn picking on or off. Turning it off forgets controller hits.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.controller_hits.clear();
        }
    }

    /// Nearest sphere of `scene` along `ray`, if picking is on.
    #[must_use]
    pub fn pick_ray(&self, scene: &Scene, ray: &Ray) -> Option<PickHit> {
        if !self.enabled {
            return None;
        }
        pick_ray(&scene.geometry().spheres, &scene.bounds(), ray)
    }

    /// Hover-pick through the camera at `ndc`. The previous mouse
    /// highlight is replaced. Returns whether the highlight changed.
    pub fn pick_screen(
        &self,
        scene: &mut Scene,
        camera: &Camera,
        ndc: Vec2,
    ) -> bool {
        let hit = self.pick_ray(scene, &camera.ray_from_ndc(ndc));
        scene.set_hover(Pointer::Mouse, hit.map(|h| h.instance))
    }

    /// Drop the mouse highlight. Returns whether anything changed.
    pub fn clear_pointer(&self, scene: &mut Scene) -> bool {
        scene.set_hover(Pointer::Mouse, None)
    }

    /// Pick along a controller's pointer and return the pointer line
    /// length: the hit distance, or on a miss the distance to the first
    /// stick or surface, capped at `pointer_length`.
    ///
    /// The controller's own highlight is cleared first. It only picks
    /// while no other controller holds a pick.
    pub fn pick_controller(
        &mut self,
        scene: &mut Scene,
        controller: u8,
        pose: &ControllerPose,
        pointer_length: f32,
    ) -> f32 {
        let pointer = Pointer::Controller(controller);
        let _ = self.controller_hits.remove(&controller);
        let _ = scene.set_hover(pointer, None);

        let ray = pose.pointer_ray();
        if self.controller_hits.values().next().is_none() {
            if let Some(hit) = self.pick_ray(scene, &ray) {
                let _ = scene.set_hover(pointer, Some(hit.instance));
                let _ = self.controller_hits.insert(controller, hit);
                return hit.distance;
            }
        }
        occluder_distance(scene.geometry(), &scene.bounds(), &ray)
            .map_or(pointer_length, |d| d.min(pointer_length))
    }

    /// Current hit of `controller`.
    #[must_use]
    pub fn controller_hit(&self, controller: u8) -> Option<PickHit> {
        self.controller_hits.get(&controller).copied()
    }

    /// Forget `controller`'s hit and highlight.
    pub fn release_controller(&mut self, scene: &mut Scene, controller: u8) {
        let _ = self.controller_hits.remove(&controller);
        let _ = scene.set_hover(Pointer::Controller(controller), None);
    }

    /// Forget every controller hit.
    pub fn clear_controllers(&mut self, scene: &mut Scene) {
        for controller in self.controller_hits.drain().map(|(c, _)| c) {
            let _ = scene.set_hover(Pointer::Controller(controller), None);
        }
    }
}
