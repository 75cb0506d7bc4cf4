//! Random sampling helpers.
//!
//! All functions take the generator explicitly so every render job can own a
//! deterministic stream.

use lantern_math::{orthonormal_basis, Vec2, Vec3};
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform point in [0, 1)^2.
#[inline]
pub fn gen_vec2(rng: &mut dyn RngCore) -> Vec2 {
    Vec2::new(gen_f32(rng), gen_f32(rng))
}

/// Uniform pixel jitter in [-0.5, 0.5)^2.
#[inline]
pub fn sample_square(rng: &mut dyn RngCore) -> Vec2 {
    gen_vec2(rng) - Vec2::splat(0.5)
}

/// Map a local direction (z up) into the frame around `normal`.
#[inline]
pub fn local_to_world(local: Vec3, normal: Vec3) -> Vec3 {
    let (tangent, bitangent) = orthonormal_basis(normal);
    local.x * tangent + local.y * bitangent + local.z * normal
}

/// Direction at polar angle `acos(cos_theta)` and azimuth `2*pi*u` around `normal`.
pub fn spherical_direction(cos_theta: f32, u: f32, normal: Vec3) -> Vec3 {
    let cos_theta = cos_theta.clamp(-1.0, 1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * u;
    local_to_world(
        Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta),
        normal,
    )
}

/// Cosine-weighted direction in the hemisphere around `normal`.
pub fn cosine_hemisphere(normal: Vec3, u: Vec2) -> Vec3 {
    spherical_direction((1.0 - u.x).sqrt(), u.y, normal)
}
