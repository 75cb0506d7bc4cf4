// Transform helpers layered on glam::Mat4.

use crate::Aabb;
use glam::{Mat3, Mat4, Vec3};

/// Extension trait for Mat4 used when placing primitives in the world.
pub trait Mat4Ext {
    /// Transform a direction (w=0): rotation and scale only.
    fn transform_direction(&self, direction: Vec3) -> Vec3;

    /// Transform a surface normal with the inverse-transpose and renormalize.
    fn transform_normal(&self, normal: Vec3) -> Vec3;

    /// Tight box over all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.transform_vector3(direction)
    }

    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        let normal_matrix = Mat3::from_mat4(*self).inverse().transpose();
        (normal_matrix * normal).normalize_or_zero()
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return *aabb;
        }
        Aabb::enclosing(aabb.corners().iter().map(|&c| self.transform_point3(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_direction_ignores_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let dir = Vec3::new(1.0, 2.0, 3.0);

        assert_eq!(mat.transform_direction(dir), dir);
    }

    #[test]
    fn test_transform_normal_non_uniform_scale() {
        let mat = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let n = Vec3::new(1.0, 1.0, 0.0).normalize();
        let transformed = mat.transform_normal(n);

        // Inverse-transpose shrinks the stretched axis
        let expected = Vec3::new(0.5, 1.0, 0.0).normalize();
        assert!((transformed - expected).length() < 1e-5);
    }

    #[test]
    fn test_transform_aabb_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let out = mat.transform_aabb(&aabb);

        assert_eq!(out.min, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(out.max, Vec3::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn test_transform_empty_aabb_stays_empty() {
        let mat = Mat4::from_scale(Vec3::splat(3.0));
        assert!(mat.transform_aabb(&Aabb::empty()).is_empty());
    }
}
