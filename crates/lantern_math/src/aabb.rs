use crate::{Interval, Mat4, Mat4Ext, Ray, Vec3};

/// Axis-aligned bounding box used by primitives and the KD-tree.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from its min and max corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an empty box (contains nothing, neutral for `union`).
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Create a box from two arbitrary corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Tightest box around a set of points.
    pub fn enclosing<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        points
            .into_iter()
            .fold(Self::empty(), |acc, p| Self::new(acc.min.min(p), acc.max.max(p)))
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn is_empty(&self) -> bool {
        self.max.cmplt(self.min).any()
    }

    /// Grow any axis thinner than `delta` so flat geometry still has volume.
    pub fn padded(&self, delta: f32) -> Aabb {
        let mut out = *self;
        for axis in 0..3 {
            if out.max[axis] - out.min[axis] < delta {
                out.min[axis] -= delta / 2.0;
                out.max[axis] += delta / 2.0;
            }
        }
        out
    }

    /// Corner `i` in 0..8; bit 0 selects max x, bit 1 max y, bit 2 max z.
    pub fn corner(&self, i: usize) -> Vec3 {
        Vec3::new(
            if i & 1 == 0 { self.min.x } else { self.max.x },
            if i & 2 == 0 { self.min.y } else { self.max.y },
            if i & 4 == 0 { self.min.z } else { self.max.z },
        )
    }

    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| self.corner(i))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Surface area of the box; zero for empty boxes.
    pub fn surface_area(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let e = self.extent();
        2.0 * (e.x * e.y + e.y * e.z + e.z * e.x)
    }

    /// Split the box at `point` along `axis`, returning `(lower, upper)`.
    pub fn split(&self, axis: usize, point: f32) -> (Aabb, Aabb) {
        let mut lower = *self;
        let mut upper = *self;
        lower.max[axis] = point;
        upper.min[axis] = point;
        (lower, upper)
    }

    /// Slab test against the ray, restricted to `ray_t`.
    ///
    /// Returns the entry/exit parameters of the overlap, or `None` when the ray
    /// misses. Zero direction components yield infinite slab bounds, which the
    /// min/max folding handles without special cases.
    pub fn intersect_ray(&self, ray: &Ray, ray_t: Interval) -> Option<(f32, f32)> {
        let inv = ray.inv_direction();
        let mut t_min = ray_t.min;
        let mut t_max = ray_t.max;

        for axis in 0..3 {
            let mut t0 = (self.min[axis] - ray.origin[axis]) * inv[axis];
            let mut t1 = (self.max[axis] - ray.origin[axis]) * inv[axis];
            if inv[axis] < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            // NaN arises when the origin lies on a slab face with a zero direction
            if !t0.is_nan() {
                t_min = t_min.max(t0);
            }
            if !t1.is_nan() {
                t_max = t_max.min(t1);
            }
            if t_max < t_min {
                return None;
            }
        }

        Some((t_min, t_max))
    }
}

/// Bounds in object space together with the world-space box derived from them.
///
/// The world box is always the tight axis-aligned box over the eight
/// transformed object-space corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingVolume {
    pub local: Aabb,
    pub world: Aabb,
}

impl BoundingVolume {
    pub fn new(local: Aabb) -> Self {
        Self {
            local,
            world: local,
        }
    }

    /// Recompute the world box from the object-space box.
    pub fn transform(&mut self, matrix: &Mat4) {
        self.world = matrix.transform_aabb(&self.local);
    }

    pub fn transformed(mut self, matrix: &Mat4) -> Self {
        self.transform(matrix);
        self
    }

    pub fn corners(&self) -> [Vec3; 8] {
        self.world.corners()
    }

    pub fn surface_area(&self) -> f32 {
        self.world.surface_area()
    }

    pub fn intersect_ray(&self, ray: &Ray, ray_t: Interval) -> Option<(f32, f32)> {
        self.world.intersect_ray(ray, ray_t)
    }
}

impl Default for BoundingVolume {
    fn default() -> Self {
        Self::new(Aabb::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::ZERO, Vec3::ONE)
    }

    #[test]
    fn test_aabb_hit_through_center() {
        let ray = Ray::new(Vec3::new(0.5, 0.5, -1.0), Vec3::Z);
        let (t0, t1) = unit_box()
            .intersect_ray(&ray, Interval::new(0.0, f32::INFINITY))
            .unwrap();

        assert!((t0 - 1.0).abs() < 1e-5);
        assert!((t1 - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_aabb_miss() {
        let ray = Ray::new(Vec3::new(2.0, 2.0, -1.0), Vec3::Z);
        assert!(unit_box().intersect_ray(&ray, Interval::new(0.0, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_aabb_hit_respects_interval() {
        let ray = Ray::new(Vec3::new(0.5, 0.5, -1.0), Vec3::Z);
        assert!(unit_box().intersect_ray(&ray, Interval::new(0.0, 0.5)).is_none());
    }

    #[test]
    fn test_aabb_axis_parallel_ray() {
        // Direction has two zero components
        let ray = Ray::new(Vec3::new(0.25, 0.75, -3.0), Vec3::Z);
        assert!(unit_box().intersect_ray(&ray, Interval::new(0.0, 10.0)).is_some());

        let outside = Ray::new(Vec3::new(1.5, 0.75, -3.0), Vec3::Z);
        assert!(unit_box().intersect_ray(&outside, Interval::new(0.0, 10.0)).is_none());
    }

    #[test]
    fn test_aabb_origin_inside() {
        let ray = Ray::new(Vec3::splat(0.5), Vec3::new(1.0, 0.3, -0.2));
        let (t0, t1) = unit_box()
            .intersect_ray(&ray, Interval::new(0.0, f32::INFINITY))
            .unwrap();

        assert_eq!(t0, 0.0);
        assert!((t1 - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_aabb_surface_area() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
        assert!((aabb.surface_area() - 22.0).abs() < 1e-5);
        assert_eq!(Aabb::empty().surface_area(), 0.0);
    }

    #[test]
    fn test_aabb_corners() {
        let corners = unit_box().corners();

        assert_eq!(corners[0], Vec3::ZERO);
        assert_eq!(corners[7], Vec3::ONE);
        assert_eq!(corners[1], Vec3::X);
        assert_eq!(corners[2], Vec3::Y);
        assert_eq!(corners[4], Vec3::Z);
    }

    #[test]
    fn test_aabb_split() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::splat(4.0));
        let (lower, upper) = aabb.split(1, 1.0);

        assert_eq!(lower.max.y, 1.0);
        assert_eq!(upper.min.y, 1.0);
        assert_eq!(lower.min, aabb.min);
        assert_eq!(upper.max, aabb.max);
    }

    #[test]
    fn test_aabb_union_and_enclosing() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(-1.0), Vec3::splat(0.5));
        let u = a.union(&b);

        assert_eq!(u.min, Vec3::splat(-1.0));
        assert_eq!(u.max, Vec3::ONE);

        let e = Aabb::enclosing([Vec3::X, -Vec3::Y, Vec3::Z * 2.0]);
        assert_eq!(e.min, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(e.max, Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_aabb_padded() {
        let flat = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0)).padded(0.001);

        assert!(flat.extent().y > 0.0);
        assert_eq!(flat.extent().x, 1.0);
    }

    #[test]
    fn test_bounding_volume_transform_is_tight() {
        let mut volume = BoundingVolume::new(unit_box());
        volume.transform(&Mat4::from_rotation_z(std::f32::consts::FRAC_PI_4));

        let half_diag = std::f32::consts::SQRT_2 / 2.0;
        assert!((volume.world.min.x + half_diag).abs() < 1e-5);
        assert!((volume.world.max.x - half_diag).abs() < 1e-5);
        assert!(volume.world.min.y.abs() < 1e-5);
        assert!((volume.world.max.y - std::f32::consts::SQRT_2).abs() < 1e-5);

        // Object-space box is untouched
        assert_eq!(volume.local, unit_box());
    }
}
