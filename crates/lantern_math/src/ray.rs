use crate::Vec3;

/// A ray in 3D space with an origin and a non-zero direction.
///
/// The inverse direction used by slab tests is computed per test rather
/// than stored here.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Componentwise reciprocal of the direction.
    #[inline]
    pub fn inv_direction(&self) -> Vec3 {
        Vec3::ONE / self.direction
    }

    /// Offset the origin along `normal` so secondary rays do not re-hit their surface.
    #[inline]
    pub fn offset(origin: Vec3, direction: Vec3, normal: Vec3, epsilon: f32) -> Self {
        let side = if direction.dot(normal) >= 0.0 { 1.0 } else { -1.0 };
        Self::new(origin + normal * (epsilon * side), direction)
    }
}
