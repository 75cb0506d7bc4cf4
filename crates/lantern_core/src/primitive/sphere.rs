//! Sphere primitive.

use crate::hit::{RaycastHit, Spatial};
use lantern_math::{Aabb, BoundingVolume, Interval, Mat4, Plane, PlaneSide, Ray, Vec2, Vec3};
use std::f32::consts::PI;

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    to_world: Mat4,
    volume: BoundingVolume,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);

        Self {
            center,
            radius,
            to_world: Mat4::IDENTITY,
            volume: BoundingVolume::new(Aabb::from_points(center - rvec, center + rvec)),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Move the sphere; non-uniform scale is approximated by the largest axis.
    pub fn transform(&mut self, matrix: &Mat4) {
        let (scale, _, _) = matrix.to_scale_rotation_translation();
        self.center = matrix.transform_point3(self.center);
        self.radius *= scale.abs().max_element();
        self.to_world = *matrix * self.to_world;
        self.volume.transform(&self.to_world);

        // The intersected shape is the scaled sphere, which can outgrow the
        // transformed local box under non-uniform scale
        let rvec = Vec3::splat(self.radius);
        self.volume.world = Aabb::from_points(self.center - rvec, self.center + rvec);
    }

    /// UV coordinates for a point on the unit sphere.
    fn sphere_uv(p: Vec3) -> Vec2 {
        // theta: angle down from +Y, phi: angle around Y from +X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        Vec2::new(phi / (2.0 * PI), theta / PI)
    }
}

impl Spatial for Sphere {
    fn bounds(&self) -> Aabb {
        self.volume.world
    }

    fn side_of_plane(&self, plane: &Plane) -> PlaneSide {
        let d = plane.signed_distance(self.center);
        PlaneSide::from_range(d - self.radius, d + self.radius)
    }

    fn intersect_ray(&self, ray: &Ray, ray_t: Interval) -> Option<RaycastHit> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.admits(root) {
            root = (h + sqrtd) / a;
            if !ray_t.admits(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(RaycastHit::new(ray, root, outward_normal).with_uv(Self::sphere_uv(outward_normal)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let hit = sphere.intersect_ray(&ray, forward()).unwrap();
        assert!((hit.distance - 0.5).abs() < 0.001);
        assert!(hit.front_face);
        assert!((hit.normal - Vec3::Z).length() < 0.001);
    }

    #[test]
    fn test_sphere_top_hit_from_above() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y);

        let hit = sphere.intersect_ray(&ray, forward()).unwrap();
        assert!((hit.distance - 1.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));

        assert!(sphere.intersect_ray(&ray, forward()).is_none());
    }

    #[test]
    fn test_sphere_inside_hits_back_face() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let hit = sphere.intersect_ray(&ray, forward()).unwrap();
        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert!(!hit.front_face);
        assert!((hit.normal + Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_sphere_side_of_plane() {
        let sphere = Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0);

        assert_eq!(sphere.side_of_plane(&Plane::axis_aligned(0, 1.0)), PlaneSide::Front);
        assert_eq!(sphere.side_of_plane(&Plane::axis_aligned(0, 5.0)), PlaneSide::Back);
        assert_eq!(sphere.side_of_plane(&Plane::axis_aligned(0, 3.0)), PlaneSide::Spanning);
    }

    #[test]
    fn test_sphere_transform() {
        let mut sphere = Sphere::new(Vec3::ZERO, 1.0);
        sphere.transform(&Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Default::default(),
            Vec3::new(0.0, 10.0, 0.0),
        ));

        assert_eq!(sphere.center(), Vec3::new(0.0, 10.0, 0.0));
        assert!((sphere.radius() - 2.0).abs() < 1e-5);
        assert!((sphere.bounds().max.y - 12.0).abs() < 1e-4);
        assert!((sphere.bounds().min.y - 8.0).abs() < 1e-4);
    }
}
