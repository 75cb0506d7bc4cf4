//! Unbounded plane primitive.

use crate::hit::{RaycastHit, Spatial};
use lantern_math::{orthonormal_basis, Aabb, Interval, Mat4, Mat4Ext, Ray, Vec2, Vec3};

/// Half-width of the box used to bound an infinite plane.
pub const PLANE_EXTENT: f32 = 1.0e4;

/// An infinite plane through `point` with unit `normal`.
#[derive(Debug, Clone)]
pub struct InfinitePlane {
    point: Vec3,
    normal: Vec3,
    bounds: Aabb,
}

impl InfinitePlane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            point,
            normal,
            bounds: Self::compute_bounds(point, normal),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn transform(&mut self, matrix: &Mat4) {
        self.point = matrix.transform_point3(self.point);
        self.normal = matrix.transform_normal(self.normal);
        self.bounds = Self::compute_bounds(self.point, self.normal);
    }

    /// Large box, flattened along the normal when the plane is axis-aligned.
    fn compute_bounds(point: Vec3, normal: Vec3) -> Aabb {
        let mut min = Vec3::splat(-PLANE_EXTENT);
        let mut max = Vec3::splat(PLANE_EXTENT);
        for axis in 0..3 {
            if normal[axis].abs() > 0.9999 {
                min[axis] = point[axis];
                max[axis] = point[axis];
            }
        }
        Aabb::new(min, max).padded(0.0001)
    }
}

impl Spatial for InfinitePlane {
    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn intersect_ray(&self, ray: &Ray, ray_t: Interval) -> Option<RaycastHit> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = self.normal.dot(self.point - ray.origin) / denom;
        if !ray_t.admits(t) {
            return None;
        }

        let hit = RaycastHit::new(ray, t, self.normal);
        let (tangent, bitangent) = orthonormal_basis(self.normal);
        let local = hit.point - self.point;
        Some(hit.with_uv(Vec2::new(local.dot(tangent), local.dot(bitangent))))
    }
}
