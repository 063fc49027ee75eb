//! Axis-aligned bounding boxes.

use glam::Vec3;

/// An axis-aligned box. [`Aabb::EMPTY`] contains nothing and absorbs the
/// first point it includes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    /// The empty box (inverted infinities).
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Box spanning two corners in any order.
    #[must_use]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box containing every point.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::EMPTY;
        for p in points {
            aabb.include(p);
        }
        aabb
    }

    /// Grow to contain `p`.
    pub fn include(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Grow to contain another box.
    pub fn union(&mut self, other: &Self) {
        if !other.is_empty() {
            self.include(other.min);
            self.include(other.max);
        }
    }

    /// `true` when no point was ever included.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Box center (origin for an empty box).
    #[must_use]
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    /// Edge lengths (zero for an empty box).
    #[must_use]
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Length of the box diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }

    /// The same box moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec3) -> Self {
        if self.is_empty() {
            *self
        } else {
            Self {
                min: self.min + offset,
                max: self.max + offset,
            }
        }
    }

    /// Whether `p` lies inside or on the box.
    #[must_use]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// The twelve edges as `(start, end)` pairs.
    #[must_use]
    pub fn edges(&self) -> [(Vec3, Vec3); 12] {
        let (a, b) = (self.min, self.max);
        let c = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
        [
            (c(a.x, a.y, a.z), c(b.x, a.y, a.z)),
            (c(a.x, b.y, a.z), c(b.x, b.y, a.z)),
            (c(a.x, a.y, b.z), c(b.x, a.y, b.z)),
            (c(a.x, b.y, b.z), c(b.x, b.y, b.z)),
            (c(a.x, a.y, a.z), c(a.x, b.y, a.z)),
            (c(b.x, a.y, a.z), c(b.x, b.y, a.z)),
            (c(a.x, a.y, b.z), c(a.x, b.y, b.z)),
            (c(b.x, a.y, b.z), c(b.x, b.y, b.z)),
            (c(a.x, a.y, a.z), c(a.x, a.y, b.z)),
            (c(b.x, a.y, a.z), c(b.x, a.y, b.z)),
            (c(a.x, b.y, a.z), c(a.x, b.y, b.z)),
            (c(b.x, b.y, a.z), c(b.x, b.y, b.z)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_absorbs_first_point() {
        let mut aabb = Aabb::EMPTY;
        assert!(aabb.is_empty());
        assert_eq!(aabb.center(), Vec3::ZERO);
        aabb.include(Vec3::new(1.0, 2.0, 3.0));
        assert!(!aabb.is_empty());
        assert_eq!(aabb.min, aabb.max);
        assert_eq!(aabb.diagonal(), 0.0);
    }

    #[test]
    fn center_size_and_diagonal() {
        let aabb = Aabb::from_points([Vec3::ZERO, Vec3::new(2.0, 4.0, 4.0)]);
        assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 2.0));
        assert_eq!(aabb.size(), Vec3::new(2.0, 4.0, 4.0));
        assert_eq!(aabb.diagonal(), 6.0);
        assert!(aabb.contains(Vec3::ONE));
        assert!(!aabb.contains(Vec3::splat(-0.1)));
    }

    #[test]
    fn union_ignores_empty() {
        let mut aabb = Aabb::new(Vec3::ONE, Vec3::ZERO);
        aabb.union(&Aabb::EMPTY);
        assert_eq!(aabb, Aabb::new(Vec3::ZERO, Vec3::ONE));
    }

    #[test]
    fn edges_have_axis_lengths() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
        let mut lengths: Vec<f32> =
            aabb.edges().iter().map(|(s, e)| s.distance(*e)).collect();
        lengths.sort_by(f32::total_cmp);
        assert_eq!(lengths, [1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0, 3.0]);
    }
}
