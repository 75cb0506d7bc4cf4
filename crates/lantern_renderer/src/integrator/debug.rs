use super::SurfaceIntegrator;
use crate::shading::{ShadingContext, SHADOW_EPSILON};
use lantern_core::{Material, RaycastHit};
use lantern_math::{refract, Color, Ray};
use rand::RngCore;

/// Flat albedo, with translucent surfaces blended against what lies behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugIntegrator;

impl SurfaceIntegrator for DebugIntegrator {
    fn li(
        &self,
        ctx: &ShadingContext,
        ray: &Ray,
        hit: &RaycastHit,
        material: &Material,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let albedo = material.albedo_at(hit.uv);
        if !material.is_translucent() || depth >= ctx.max_depth {
            return albedo;
        }

        let eta = if hit.front_face {
            1.0 / material.refractive_index
        } else {
            material.refractive_index
        };
        let direction = ray.direction.normalize();
        let through = refract(direction, hit.normal, eta).unwrap_or(direction);
        let continuation = Ray::offset(hit.point, through, hit.normal, SHADOW_EPSILON);

        let behind = ctx.trace(&continuation, depth + 1, rng);
        albedo * material.opacity + behind * (1.0 - material.opacity)
    }
}
