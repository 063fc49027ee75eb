//! CPU object picking and the ray intersection tests behind it.
//!
//! Pickable objects are the scene's sphere instances (atoms and JSON
//! spheres). The mouse and every VR controller each hold at most one
//! hovered instance.

mod picker;
pub mod ray;

pub use picker::{pick_ray, ObjectPicker, PickHit};
pub use ray::{ray_aabb, ray_cylinder, ray_sphere, ray_triangle, Ray};
