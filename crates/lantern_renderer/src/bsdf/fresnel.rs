use lantern_math::Color;

/// Schlick's `(1 - cos)^5` weight.
#[inline]
pub fn schlick_weight(cos_theta: f32) -> f32 {
    let m = (1.0 - cos_theta).clamp(0.0, 1.0);
    let m2 = m * m;
    m2 * m2 * m
}

/// Schlick approximation of the Fresnel reflectance for reflectance `f0`
/// at normal incidence.
#[inline]
pub fn fresnel_schlick(f0: Color, cos_theta: f32) -> Color {
    f0 + (Color::ONE - f0) * schlick_weight(cos_theta)
}
