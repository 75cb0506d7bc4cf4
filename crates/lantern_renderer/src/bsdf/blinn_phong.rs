use super::{Bxdf, BxdfType, SurfaceParams};
use crate::sampling::spherical_direction;
use lantern_math::{reflect, Color, Vec2, Vec3};
use std::f32::consts::PI;

/// Energy-normalized Blinn-Phong lobe, `(e + 8) / (8 pi) (n.h)^e`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlinnPhong;

impl Bxdf for BlinnPhong {
    fn kind(&self) -> BxdfType {
        BxdfType::SPECULAR
    }

    fn evaluate(&self, wo: Vec3, wi: Vec3, normal: Vec3, surface: &SurfaceParams) -> Color {
        if normal.dot(wi) <= 0.0 || normal.dot(wo) <= 0.0 {
            return Color::ZERO;
        }
        let Some(half) = (wo + wi).try_normalize() else {
            return Color::ZERO;
        };
        let e = surface.shininess;
        let n_dot_h = normal.dot(half).max(0.0);
        surface.specular * ((e + 8.0) / (8.0 * PI) * n_dot_h.powf(e))
    }

    fn sample_direction(&self, wo: Vec3, normal: Vec3, surface: &SurfaceParams, u: Vec2) -> Option<Vec3> {
        let cos_theta = u.x.powf(1.0 / (surface.shininess + 1.0));
        let half = spherical_direction(cos_theta, u.y, normal);
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
        let v_dot_h = wo.dot(half);
        let n_dot_h = normal.dot(half);
        if v_dot_h <= 0.0 || n_dot_h <= 0.0 {
            return 0.0;
        }
        let e = surface.shininess;
        (e + 1.0) / (2.0 * PI) * n_dot_h.powf(e) / (4.0 * v_dot_h)
    }
}
