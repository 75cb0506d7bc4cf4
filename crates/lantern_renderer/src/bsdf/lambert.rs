use super::{Bxdf, BxdfType, SurfaceParams};
use crate::sampling::cosine_hemisphere;
use lantern_math::{Color, Vec2, Vec3};
use std::f32::consts::{FRAC_1_PI, PI};

/// Ideal diffuse reflection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lambert;

impl Bxdf for Lambert {
    fn kind(&self) -> BxdfType {
        BxdfType::DIFFUSE
    }

    fn evaluate(&self, _wo: Vec3, wi: Vec3, normal: Vec3, surface: &SurfaceParams) -> Color {
        if normal.dot(wi) <= 0.0 {
            return Color::ZERO;
        }
        surface.albedo * FRAC_1_PI
    }

    fn sample_direction(&self, _wo: Vec3, normal: Vec3, _surface: &SurfaceParams, u: Vec2) -> Option<Vec3> {
        Some(cosine_hemisphere(normal, u))
    }

    fn pdf(&self, _wo: Vec3, wi: Vec3, normal: Vec3, _surface: &SurfaceParams) -> f32 {
        normal.dot(wi).max(0.0) / PI
    }
}
