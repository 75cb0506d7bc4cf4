use super::SurfaceIntegrator;
use crate::bsdf::{BxdfType, GgxDistribution, NormalDistribution, SurfaceParams};
use crate::sampling::gen_vec2;
use crate::shading::{ShadingContext, SHADOW_EPSILON};
use lantern_core::{Material, RaycastHit};
use lantern_math::{reflect, Color, Ray};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Samples with a smaller density are discarded.
const PDF_THRESHOLD: f32 = 1e-4;

/// Incoming radiance below this is not worth weighting.
const RADIANCE_THRESHOLD: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloParams {
    /// Reflection rays per hit
    pub sample_count: u32,
}

impl Default for MonteCarloParams {
    fn default() -> Self {
        Self { sample_count: 4 }
    }
}

/// Direct lighting plus GGX importance-sampled indirect reflection.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonteCarloIntegrator {
    params: MonteCarloParams,
    distribution: GgxDistribution,
}

impl MonteCarloIntegrator {
    pub fn new(params: MonteCarloParams) -> Self {
        Self {
            params,
            distribution: GgxDistribution,
        }
    }
}

impl SurfaceIntegrator for MonteCarloIntegrator {
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
        let normal = hit.normal;
        let wo = -ray.direction.normalize();

        let mut radiance = ctx.direct_light(hit, wo, &surface, bsdf);
        if depth >= ctx.max_depth || self.params.sample_count == 0 {
            return radiance;
        }

        let mut indirect = Color::ZERO;
        for _ in 0..self.params.sample_count {
            let half = self
                .distribution
                .sample_half_vector(normal, surface.roughness, gen_vec2(rng));
            let v_dot_h = wo.dot(half);
            if v_dot_h <= 0.0 {
                continue;
            }
            let wi = reflect(-wo, half);
            let n_dot_l = normal.dot(wi);
            if n_dot_l <= 0.0 {
                continue;
            }

            let pdf = self
                .distribution
                .pdf(normal.dot(half), v_dot_h, surface.roughness);
            if pdf < PDF_THRESHOLD {
                continue;
            }
            let f = bsdf.evaluate(wo, wi, normal, &surface, BxdfType::ALL);
            if f.max_element() <= 0.0 {
                continue;
            }

            let bounce = Ray::offset(hit.point, wi, normal, SHADOW_EPSILON);
            let li = ctx.trace(&bounce, depth + 1, rng);
            if li.max_element() < RADIANCE_THRESHOLD {
                continue;
            }
            indirect += f * li * (n_dot_l / pdf);
        }

        radiance += indirect / self.params.sample_count as f32;
        radiance
    }
}
