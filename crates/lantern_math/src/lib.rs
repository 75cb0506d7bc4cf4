// Re-export glam for convenience
pub use glam::*;

// Lantern math types
mod aabb;
mod interval;
mod plane;
mod ray;
mod transform;

pub use aabb::{Aabb, BoundingVolume};
pub use interval::Interval;
pub use plane::{Plane, PlaneSide};
pub use ray::Ray;
pub use transform::Mat4Ext;

/// Linear RGB color.
pub type Color = Vec3;

/// Reflect `v` about the normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with normal `n`.
///
/// Returns `None` on total internal reflection.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, eta_ratio: f32) -> Option<Vec3> {
    let cos_theta = (-uv).dot(n).min(1.0);
    let sin_theta_sq = 1.0 - cos_theta * cos_theta;
    if eta_ratio * eta_ratio * sin_theta_sq > 1.0 {
        return None;
    }
    let r_out_perp = eta_ratio * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    Some(r_out_perp + r_out_parallel)
}

/// Build an orthonormal tangent/bitangent pair around a unit normal.
pub fn orthonormal_basis(n: Vec3) -> (Vec3, Vec3) {
    let sign = if n.z >= 0.0 { 1.0 } else { -1.0 };
    let a = -1.0 / (sign + n.z);
    let b = n.x * n.y * a;

    let tangent = Vec3::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x);
    let bitangent = Vec3::new(b, sign + n.y * n.y * a, -n.y);

    (tangent, bitangent)
}
