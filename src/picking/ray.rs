//! Ray intersection tests used for CPU picking.
//!
//! All functions return the ray parameter `t` of the nearest hit in front
//! of the origin (`t >= 0`), so with a normalized direction `t` is the hit
//! distance.

use glam::Vec3;

use crate::scene::bounds::Aabb;

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub dir: Vec3,
}

impl Ray {
    /// Ray from `origin` along `dir` (normalized here). Falls back to -Z
    /// for a zero direction.
    #[must_use]
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.try_normalize().unwrap_or(Vec3::NEG_Z),
        }
    }

    /// Point at parameter `t`.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Nearest intersection with a sphere.
#[must_use]
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t0 = -b - sqrt_disc;
    let t1 = -b + sqrt_disc;
    if t0 >= 0.0 {
        Some(t0)
    } else if t1 >= 0.0 {
        // Origin inside the sphere.
        Some(t1)
    } else {
        None
    }
}

/// Nearest intersection with a capped cylinder from `a` to `b`.
#[must_use]
pub fn ray_cylinder(ray: &Ray, a: Vec3, b: Vec3, radius: f32) -> Option<f32> {
    let axis = b - a;
    let len = axis.length();
    if len < 1e-6 {
        return ray_sphere(ray, a, radius);
    }
    let axis = axis / len;
    let oc = ray.origin - a;

    let d_perp = ray.dir - axis * ray.dir.dot(axis);
    let o_perp = oc - axis * oc.dot(axis);
    let qa = d_perp.length_squared();
    let qb = 2.0 * d_perp.dot(o_perp);
    let qc = o_perp.length_squared() - radius * radius;

    let mut best: Option<f32> = None;
    let mut consider = |t: f32| {
        if t >= 0.0 && best.is_none_or(|b| t < b) {
            best = Some(t);
        }
    };

    // Side wall.
    if qa > 1e-12 {
        let disc = qb * qb - 4.0 * qa * qc;
        if disc >= 0.0 {
            let sqrt_disc = disc.sqrt();
            for t in [(-qb - sqrt_disc) / (2.0 * qa), (-qb + sqrt_disc) / (2.0 * qa)] {
                let h = (ray.at(t) - a).dot(axis);
                if (0.0..=len).contains(&h) {
                    consider(t);
                }
            }
        }
    }

    // Caps.
    let denom = ray.dir.dot(axis);
    if denom.abs() > 1e-12 {
        for (center, h) in [(a, 0.0), (b, len)] {
            let t = (h - oc.dot(axis)) / denom;
            if (ray.at(t) - center).length_squared() <= radius * radius {
                consider(t);
            }
        }
    }

    best
}

/// Möller–Trumbore ray/triangle intersection (both faces).
#[must_use]
pub fn ray_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let p = ray.dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < 1e-9 {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - v0;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}

/// Slab test. Returns the entry parameter (0 when the origin is inside).
#[must_use]
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    if aabb.is_empty() {
        return None;
    }
    let inv = ray.dir.recip();
    let t1 = (aabb.min - ray.origin) * inv;
    let t2 = (aabb.max - ray.origin) * inv;
    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();
    if t_max < t_min.max(0.0) {
        None
    } else {
        Some(t_min.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_z() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z)
    }

    #[test]
    fn sphere_hit_and_miss() {
        assert_eq!(ray_sphere(&down_z(), Vec3::ZERO, 1.0), Some(9.0));
        assert_eq!(ray_sphere(&down_z(), Vec3::new(3.0, 0.0, 0.0), 1.0), None);
        // Behind the origin.
        assert_eq!(ray_sphere(&down_z(), Vec3::new(0.0, 0.0, 20.0), 1.0), None);
    }

    #[test]
    fn sphere_from_inside_hits_far_wall() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ray_sphere(&ray, Vec3::ZERO, 2.0), Some(2.0));
    }

    #[test]
    fn cylinder_side_and_cap() {
        let side = ray_cylinder(&down_z(), Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0), 0.5);
        assert!((side.unwrap() - 9.5).abs() < 1e-5);

        let cap = ray_cylinder(&down_z(), Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0), 0.5);
        assert!((cap.unwrap() - 8.0).abs() < 1e-5);

        let past_end =
            ray_cylinder(&down_z(), Vec3::new(2.0, -1.0, 0.0), Vec3::new(2.0, 1.0, 0.0), 0.5);
        assert_eq!(past_end, None);
    }

    #[test]
    fn triangle_hit_and_miss() {
        let (a, b, c) = (Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(ray_triangle(&down_z(), a, b, c), Some(10.0));
        let off = Ray::new(Vec3::new(5.0, 0.0, 10.0), Vec3::NEG_Z);
        assert_eq!(ray_triangle(&off, a, b, c), None);
    }

    #[test]
    fn aabb_entry_and_inside() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::ONE);
        assert_eq!(ray_aabb(&down_z(), &aabb), Some(9.0));
        assert_eq!(ray_aabb(&Ray::new(Vec3::ZERO, Vec3::X), &aabb), Some(0.0));
        assert_eq!(ray_aabb(&Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::X), &aabb), None);
        assert_eq!(ray_aabb(&down_z(), &Aabb::EMPTY), None);
    }
}
