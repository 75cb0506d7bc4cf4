use super::SurfaceIntegrator;
use crate::bsdf::{BxdfType, SurfaceParams};
use crate::shading::{ShadingContext, SHADOW_EPSILON};
use lantern_core::{Material, RaycastHit};
use lantern_math::{reflect, Color, Ray};
use rand::RngCore;

/// Direct lighting with shadow rays plus recursive mirror reflection.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhittedIntegrator;

impl SurfaceIntegrator for WhittedIntegrator {
    fn li(
        &self,
        ctx: &ShadingContext,
        ray: &Ray,
        hit: &RaycastHit,
        material: &Material,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let surface = SurfaceParams::resolve(material, hit);
        let bsdf = ctx.bsdfs.select(material);
        let wo = -ray.direction.normalize();

        let mut radiance = ctx.direct_light(hit, wo, &surface, bsdf);

        if depth < ctx.max_depth && bsdf.has_specular() {
            let wi = reflect(-wo, hit.normal);
            if hit.normal.dot(wi) > 0.0 {
                let f = bsdf.evaluate(wo, wi, hit.normal, &surface, BxdfType::SPECULAR);
                if f.max_element() > 0.0 {
                    let reflected = Ray::offset(hit.point, wi, hit.normal, SHADOW_EPSILON);
                    radiance += f * ctx.trace(&reflected, depth + 1, rng);
                }
            }
        }

        radiance
    }
}
