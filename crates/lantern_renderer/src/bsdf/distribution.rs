//! Microfacet normal distributions.
//!
//! Both distributions are parameterized by a perceptual roughness in (0, 1].

use crate::sampling::spherical_direction;
use lantern_math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::sync::Arc;
use strum::{Display, EnumString, EnumVariantNames};

const DENOM_EPSILON: f32 = 1e-7;
const MIN_EXPONENT: f32 = 1e-4;

pub trait NormalDistribution: Send + Sync {
    /// Microfacet density `D(h)` for `cos(theta_h) = n_dot_h`.
    fn d(&self, n_dot_h: f32, roughness: f32) -> f32;

    /// Map a uniform sample to `cos(theta_h)`.
    fn sample_cos_theta(&self, u: f32, roughness: f32) -> f32;

    /// Solid angle density of sampled half vectors.
    fn half_vector_pdf(&self, n_dot_h: f32, roughness: f32) -> f32;

    /// Sample a half vector around `normal`.
    fn sample_half_vector(&self, normal: Vec3, roughness: f32, u: Vec2) -> Vec3 {
        spherical_direction(self.sample_cos_theta(u.x, roughness), u.y, normal)
    }

    /// Density of the reflected direction, `p_h / (4 (v.h))`.
    fn pdf(&self, n_dot_h: f32, v_dot_h: f32, roughness: f32) -> f32 {
        if v_dot_h <= 0.0 {
            return 0.0;
        }
        self.half_vector_pdf(n_dot_h, roughness) / (4.0 * v_dot_h)
    }
}

/// Trowbridge-Reitz (GGX) distribution with `alpha^2 = roughness^3`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GgxDistribution;

impl GgxDistribution {
    #[inline]
    fn alpha_sq(roughness: f32) -> f32 {
        roughness * roughness * roughness
    }
}

impl NormalDistribution for GgxDistribution {
    fn d(&self, n_dot_h: f32, roughness: f32) -> f32 {
        if n_dot_h <= 0.0 {
            return 0.0;
        }
        let a2 = Self::alpha_sq(roughness);
        let denom = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
        a2 / (PI * (denom * denom).max(DENOM_EPSILON))
    }

    fn sample_cos_theta(&self, u: f32, roughness: f32) -> f32 {
        let a2 = Self::alpha_sq(roughness);
        ((1.0 - u) / ((a2 - 1.0) * u + 1.0)).max(0.0).sqrt()
    }

    fn half_vector_pdf(&self, n_dot_h: f32, roughness: f32) -> f32 {
        self.d(n_dot_h, roughness) * n_dot_h.max(0.0)
    }
}

/// Blinn distribution with exponent `e = 2 / roughness^3 - 2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlinnDistribution;

impl BlinnDistribution {
    #[inline]
    pub fn exponent(roughness: f32) -> f32 {
        let r3 = (roughness * roughness * roughness).max(DENOM_EPSILON);
        (2.0 / r3 - 2.0).max(MIN_EXPONENT)
    }
}

impl NormalDistribution for BlinnDistribution {
    fn d(&self, n_dot_h: f32, roughness: f32) -> f32 {
        if n_dot_h <= 0.0 {
            return 0.0;
        }
        let e = Self::exponent(roughness);
        (e + 2.0) / (2.0 * PI) * n_dot_h.powf(e)
    }

    fn sample_cos_theta(&self, u: f32, roughness: f32) -> f32 {
        let e = Self::exponent(roughness);
        u.powf(1.0 / (e + 1.0))
    }

    fn half_vector_pdf(&self, n_dot_h: f32, roughness: f32) -> f32 {
        if n_dot_h <= 0.0 {
            return 0.0;
        }
        let e = Self::exponent(roughness);
        (e + 1.0) / (2.0 * PI) * n_dot_h.powf(e)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumVariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DistributionKind {
    #[default]
    Ggx,
    Blinn,
}

impl DistributionKind {
    pub fn instantiate(self) -> Arc<dyn NormalDistribution> {
        match self {
            DistributionKind::Ggx => Arc::new(GgxDistribution),
            DistributionKind::Blinn => Arc::new(BlinnDistribution),
        }
    }
}
