use super::distribution::NormalDistribution;
use super::fresnel::fresnel_schlick;
use super::geometry::GeometryTerm;
use super::{Bxdf, BxdfType, SurfaceParams};
use lantern_math::{reflect, Color, Vec2, Vec3};
use std::sync::Arc;

/// Cook-Torrance specular reflection, `F G D / (4 (n.l)(n.v))`.
pub struct CookTorrance {
    distribution: Arc<dyn NormalDistribution>,
    geometry: GeometryTerm,
}

impl CookTorrance {
    pub fn new(distribution: Arc<dyn NormalDistribution>, geometry: GeometryTerm) -> Self {
        Self {
            distribution,
            geometry,
        }
    }

    pub fn geometry(&self) -> GeometryTerm {
        self.geometry
    }
}

impl Bxdf for CookTorrance {
    fn kind(&self) -> BxdfType {
        BxdfType::SPECULAR
    }

    fn evaluate(&self, wo: Vec3, wi: Vec3, normal: Vec3, surface: &SurfaceParams) -> Color {
        let n_dot_v = normal.dot(wo);
        let n_dot_l = normal.dot(wi);
        if n_dot_v <= 0.0 || n_dot_l <= 0.0 {
            return Color::ZERO;
        }
        let Some(half) = (wo + wi).try_normalize() else {
            return Color::ZERO;
        };

        let n_dot_h = normal.dot(half).max(0.0);
        let v_dot_h = wo.dot(half).max(0.0);

        let f = fresnel_schlick(surface.specular, v_dot_h);
        let d = self.distribution.d(n_dot_h, surface.roughness);
        let g = self
            .geometry
            .evaluate(n_dot_l, n_dot_v, n_dot_h, v_dot_h, surface.roughness);

        (f * (d * g / (4.0 * n_dot_l * n_dot_v))).max(Color::ZERO)
    }

    fn sample_direction(&self, wo: Vec3, normal: Vec3, surface: &SurfaceParams, u: Vec2) -> Option<Vec3> {
        let half = self
            .distribution
            .sample_half_vector(normal, surface.roughness, u);
        if wo.dot(half) <= 0.0 {
            return None;
        }
        let wi = reflect(-wo, half);
        (normal.dot(wi) > 0.0).then_some(wi)
    }

    fn pdf(&self, wo: Vec3, wi: Vec3, normal: Vec3, surface: &SurfaceParams) -> f32 {
        let Some(half) = (wo + wi).try_normalize() else {
            return 0.0;
        };
        self.distribution
            .pdf(normal.dot(half), wo.dot(half), surface.roughness)
    }
}
