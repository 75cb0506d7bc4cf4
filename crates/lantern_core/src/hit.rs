//! Ray hits and the capability set shared by everything the KD-tree can index.

use lantern_math::{Aabb, Interval, Plane, PlaneSide, Ray, Vec2, Vec3};

/// Minimum hit distance accepted by leaf scans, to avoid self-intersection.
pub const RAY_EPSILON: f32 = 1e-4;

/// Record of a ray-element intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Point of intersection
    pub point: Vec3,
    /// Ray parameter of the intersection
    pub distance: f32,
    /// Surface normal, always facing against the ray
    pub normal: Vec3,
    /// Whether the ray hit the outside of the surface
    pub front_face: bool,
    /// Barycentric coordinates (triangles); zero for analytic shapes
    pub barycentric: Vec3,
    /// Texture coordinates
    pub uv: Vec2,
    /// Index of the hit element in its owning index
    pub element: usize,
}

impl RaycastHit {
    /// Build a hit, orienting `outward_normal` against the ray.
    pub fn new(ray: &Ray, distance: f32, outward_normal: Vec3) -> Self {
        let front_face = ray.direction.dot(outward_normal) < 0.0;
        Self {
            point: ray.at(distance),
            distance,
            normal: if front_face {
                outward_normal
            } else {
                -outward_normal
            },
            front_face,
            barycentric: Vec3::ZERO,
            uv: Vec2::ZERO,
            element: 0,
        }
    }

    pub fn with_uv(mut self, uv: Vec2) -> Self {
        self.uv = uv;
        self
    }

    pub fn with_barycentric(mut self, barycentric: Vec3) -> Self {
        self.barycentric = barycentric;
        self
    }

    /// Returns whichever of two optional hits is closer.
    pub fn closest(a: Option<RaycastHit>, b: Option<RaycastHit>) -> Option<RaycastHit> {
        match (a, b) {
            (Some(a), Some(b)) => Some(if b.distance < a.distance { b } else { a }),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

/// Anything that can be stored in a `KdTree`.
pub trait Spatial: Send + Sync {
    /// World-space bounds.
    fn bounds(&self) -> Aabb;

    /// Which side of `plane` this element lies on.
    ///
    /// The default classifies the corners of the bounding box, which is exact
    /// for axis-aligned boxes and conservative for everything else.
    fn side_of_plane(&self, plane: &Plane) -> PlaneSide {
        plane.classify_points(&self.bounds().corners())
    }

    /// Nearest intersection with a distance admitted by `ray_t`.
    fn intersect_ray(&self, ray: &Ray, ray_t: Interval) -> Option<RaycastHit>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_faces_ray() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let front = RaycastHit::new(&ray, 1.0, -Vec3::Z);
        assert!(front.front_face);
        assert_eq!(front.normal, -Vec3::Z);

        let back = RaycastHit::new(&ray, 1.0, Vec3::Z);
        assert!(!back.front_face);
        assert_eq!(back.normal, -Vec3::Z);
        assert_eq!(back.point, Vec3::Z);
    }

    #[test]
    fn test_closest() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let near = RaycastHit::new(&ray, 1.0, -Vec3::Z);
        let far = RaycastHit::new(&ray, 3.0, -Vec3::Z);

        assert_eq!(RaycastHit::closest(Some(far), Some(near)).unwrap().distance, 1.0);
        assert_eq!(RaycastHit::closest(None, Some(far)).unwrap().distance, 3.0);
        assert!(RaycastHit::closest(None, None).is_none());
    }
}
