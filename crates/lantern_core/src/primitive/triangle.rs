//! Triangle primitive.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::hit::{RaycastHit, Spatial};
use lantern_math::{Aabb, BoundingVolume, Interval, Mat4, Plane, PlaneSide, Ray, Vec2, Vec3};

/// A triangle primitive.
#[derive(Debug, Clone)]
pub struct Triangle {
    vertices: [Vec3; 3],
    /// Unit face normal, zero for degenerate triangles
    normal: Vec3,
    to_world: Mat4,
    volume: BoundingVolume,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        // Pad thin dimensions so axis-aligned triangles keep a volume
        let bbox = Aabb::enclosing([v0, v1, v2]).padded(0.0001);

        Self {
            vertices: [v0, v1, v2],
            normal: (v1 - v0).cross(v2 - v0).normalize_or_zero(),
            to_world: Mat4::IDENTITY,
            volume: BoundingVolume::new(bbox),
        }
    }

    pub fn vertices(&self) -> &[Vec3; 3] {
        &self.vertices
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn is_degenerate(&self) -> bool {
        self.normal == Vec3::ZERO
    }

    pub fn transform(&mut self, matrix: &Mat4) {
        for v in &mut self.vertices {
            *v = matrix.transform_point3(*v);
        }
        let [v0, v1, v2] = self.vertices;
        self.normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        self.to_world = *matrix * self.to_world;
        self.volume.transform(&self.to_world);
    }
}

impl Spatial for Triangle {
    fn bounds(&self) -> Aabb {
        self.volume.world
    }

    fn side_of_plane(&self, plane: &Plane) -> PlaneSide {
        plane.classify_points(&self.vertices)
    }

    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn intersect_ray(&self, ray: &Ray, ray_t: Interval) -> Option<RaycastHit> {
        let [v0, v1, v2] = self.vertices;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let h = ray.direction.cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.admits(t) {
            return None;
        }

        Some(
            RaycastHit::new(ray, t, self.normal)
                .with_barycentric(Vec3::new(1.0 - u - v, u, v))
                .with_uv(Vec2::new(u, v)),
        )
    }
}
