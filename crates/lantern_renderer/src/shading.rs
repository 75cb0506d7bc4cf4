//! Ray casting and shading entry point shared by all integrators.

use crate::bsdf::{Bsdf, BsdfSet, BxdfType, SurfaceParams};
use crate::integrator::SurfaceIntegrator;
use lantern_core::{RaycastHit, RenderContext};
use lantern_math::{Color, Ray, Vec3};
use rand::RngCore;

/// Offset applied to secondary ray origins.
pub const SHADOW_EPSILON: f32 = 1e-3;

/// Shadow ray length used for lights at infinity.
pub const SHADOW_DISTANCE: f32 = 1e6;

/// Result of shading one camera or secondary ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    Hit { radiance: Color, distance: f32 },
    Miss { background: Color },
}

impl Shading {
    pub fn radiance(&self) -> Color {
        match *self {
            Shading::Hit { radiance, .. } => radiance,
            Shading::Miss { background } => background,
        }
    }

    /// Hit distance; infinite on a miss.
    pub fn distance(&self) -> f32 {
        match *self {
            Shading::Hit { distance, .. } => distance,
            Shading::Miss { .. } => f32::INFINITY,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Shading::Hit { .. })
    }
}

/// Everything an integrator needs to trace further rays.
#[derive(Clone, Copy)]
pub struct ShadingContext<'a> {
    pub scene: &'a RenderContext,
    pub bsdfs: &'a BsdfSet,
    pub integrator: &'a dyn SurfaceIntegrator,
    pub max_depth: u32,
}

impl<'a> ShadingContext<'a> {
    pub fn new(
        scene: &'a RenderContext,
        bsdfs: &'a BsdfSet,
        integrator: &'a dyn SurfaceIntegrator,
        max_depth: u32,
    ) -> Self {
        Self {
            scene,
            bsdfs,
            integrator,
            max_depth,
        }
    }

    pub fn ray_cast(&self, ray: &Ray, max_distance: f32) -> Option<RaycastHit> {
        self.scene.scene.raycast(ray, max_distance)
    }

    pub fn is_occluded(&self, ray: &Ray, max_distance: f32) -> bool {
        self.scene.scene.is_occluded(ray, max_distance)
    }

    /// Trace `ray` and shade the closest hit, or the background on a miss.
    ///
    /// Rays deeper than `max_depth` contribute nothing.
    pub fn calculate_shading(&self, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Shading {
        if depth > self.max_depth {
            return Shading::Hit {
                radiance: Color::ZERO,
                distance: f32::INFINITY,
            };
        }

        let Some(hit) = self.ray_cast(ray, f32::INFINITY) else {
            return Shading::Miss {
                background: self.scene.background(ray.direction),
            };
        };

        let radiance = match self.scene.material_of(hit.element) {
            Some(material) => self.integrator.li(self, ray, &hit, material, depth, rng),
            None => Color::ZERO,
        };

        Shading::Hit {
            radiance,
            distance: hit.distance,
        }
    }

    /// Radiance arriving along `ray`.
    pub fn trace(&self, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        self.calculate_shading(ray, depth, rng).radiance()
    }

    /// Unoccluded contribution of every enabled light at `hit`.
    pub fn direct_light(&self, hit: &RaycastHit, wo: Vec3, surface: &SurfaceParams, bsdf: &Bsdf) -> Color {
        let mut total = Color::ZERO;

        for light in self.scene.enabled_lights() {
            let Some(sample) = light.illuminate(hit.point) else {
                continue;
            };
            let n_dot_l = hit.normal.dot(sample.direction);
            if n_dot_l <= 0.0 {
                continue;
            }

            let max_distance = if sample.distance.is_finite() {
                sample.distance - SHADOW_EPSILON
            } else {
                SHADOW_DISTANCE
            };
            let shadow_ray = Ray::offset(hit.point, sample.direction, hit.normal, SHADOW_EPSILON);
            if self.is_occluded(&shadow_ray, max_distance) {
                continue;
            }

            let f = bsdf.evaluate(wo, sample.direction, hit.normal, surface, BxdfType::ALL);
            total += f * sample.radiance * n_dot_l;
        }

        total
    }
}
