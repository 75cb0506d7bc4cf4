//! Bidirectional scattering distribution functions.
//!
//! A [`Bsdf`] pairs an optional diffuse lobe with an optional specular lobe.
//! Lobes are stateless and shared; per-hit parameters come from
//! [`SurfaceParams`], resolved from the material and the hit record.
//!
//! All directions point away from the surface: `wo` toward the viewer and
//! `wi` toward the light.

pub mod blinn_phong;
pub mod distribution;
pub mod fresnel;
pub mod geometry;
pub mod lambert;
pub mod microfacet;

pub use blinn_phong::BlinnPhong;
pub use distribution::{BlinnDistribution, DistributionKind, GgxDistribution, NormalDistribution};
pub use geometry::GeometryTerm;
pub use lambert::Lambert;
pub use microfacet::CookTorrance;

use bitflags::bitflags;
use lantern_core::{Material, RaycastHit, ShadingModel};
use lantern_math::{Color, Vec2, Vec3};
use std::sync::Arc;

/// Roughness below this makes the distributions numerically unstable.
const MIN_ROUGHNESS: f32 = 0.02;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BxdfType: u8 {
        const DIFFUSE = 1 << 0;
        const SPECULAR = 1 << 1;
        const ALL = Self::DIFFUSE.bits() | Self::SPECULAR.bits();
    }
}

/// Shading inputs for one hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceParams {
    /// Diffuse reflectance
    pub albedo: Color,
    /// Specular reflectance at normal incidence
    pub specular: Color,
    pub roughness: f32,
    /// Blinn-Phong exponent
    pub shininess: f32,
}

impl SurfaceParams {
    pub fn diffuse(albedo: Color) -> Self {
        Self {
            albedo,
            specular: Color::ZERO,
            roughness: 1.0,
            shininess: 1.0,
        }
    }

    pub fn resolve(material: &Material, hit: &RaycastHit) -> Self {
        let base = material.albedo_at(hit.uv);
        match material.model {
            ShadingModel::Lambert => Self::diffuse(base),
            ShadingModel::Phong(params) => Self {
                albedo: base,
                specular: params.specular,
                roughness: (2.0 / (params.shininess + 2.0)).cbrt().clamp(MIN_ROUGHNESS, 1.0),
                shininess: params.shininess.max(0.0),
            },
            ShadingModel::Microfacet(params) => {
                let metallic = params.metallic.clamp(0.0, 1.0);
                Self {
                    albedo: base * (1.0 - metallic),
                    specular: Color::splat(params.reflectance).lerp(base, metallic),
                    roughness: params.roughness.clamp(MIN_ROUGHNESS, 1.0),
                    shininess: 1.0,
                }
            }
        }
    }
}

/// A single reflection lobe.
pub trait Bxdf: Send + Sync {
    fn kind(&self) -> BxdfType;

    /// Reflectance for light arriving from `wi` and leaving toward `wo`.
    fn evaluate(&self, wo: Vec3, wi: Vec3, normal: Vec3, surface: &SurfaceParams) -> Color;

    /// Importance-sample an incident direction. `None` when the sample falls
    /// below the surface.
    fn sample_direction(&self, wo: Vec3, normal: Vec3, surface: &SurfaceParams, u: Vec2) -> Option<Vec3>;

    /// Solid angle density of `sample_direction` producing `wi`.
    fn pdf(&self, wo: Vec3, wi: Vec3, normal: Vec3, surface: &SurfaceParams) -> f32;
}

/// A diffuse and a specular lobe combined as `d (1 - s) + s`.
#[derive(Clone, Default)]
pub struct Bsdf {
    diffuse: Option<Arc<dyn Bxdf>>,
    specular: Option<Arc<dyn Bxdf>>,
}

impl Bsdf {
    pub fn new(diffuse: Option<Arc<dyn Bxdf>>, specular: Option<Arc<dyn Bxdf>>) -> Self {
        Self { diffuse, specular }
    }

    pub fn has_specular(&self) -> bool {
        self.specular.is_some()
    }

    /// Evaluate the lobes selected by `mask`.
    ///
    /// Each lobe is clamped to [0, 1] per channel before combining, which
    /// keeps the result between `max(d, s)` and `min(1, d + s)`.
    pub fn evaluate(&self, wo: Vec3, wi: Vec3, normal: Vec3, surface: &SurfaceParams, mask: BxdfType) -> Color {
        let lobe = |bxdf: &Option<Arc<dyn Bxdf>>, kind: BxdfType| match bxdf {
            Some(bxdf) if mask.contains(kind) => bxdf
                .evaluate(wo, wi, normal, surface)
                .clamp(Color::ZERO, Color::ONE),
            _ => Color::ZERO,
        };

        let d = lobe(&self.diffuse, BxdfType::DIFFUSE);
        let s = lobe(&self.specular, BxdfType::SPECULAR);
        d * (Color::ONE - s) + s
    }

    /// The lobe used for importance sampling; specular wins when both match.
    fn sampling_lobe(&self, mask: BxdfType) -> Option<&Arc<dyn Bxdf>> {
        let specular = self.specular.as_ref().filter(|_| mask.contains(BxdfType::SPECULAR));
        let diffuse = self.diffuse.as_ref().filter(|_| mask.contains(BxdfType::DIFFUSE));
        specular.or(diffuse)
    }

    pub fn generate_sample_vector(
        &self,
        wo: Vec3,
        normal: Vec3,
        surface: &SurfaceParams,
        mask: BxdfType,
        u: Vec2,
    ) -> Option<Vec3> {
        self.sampling_lobe(mask)?
            .sample_direction(wo, normal, surface, u)
    }

    pub fn calculate_pdf(&self, wo: Vec3, wi: Vec3, normal: Vec3, surface: &SurfaceParams, mask: BxdfType) -> f32 {
        self.sampling_lobe(mask)
            .map_or(0.0, |lobe| lobe.pdf(wo, wi, normal, surface))
    }
}

/// One shared [`Bsdf`] per shading model.
#[derive(Clone)]
pub struct BsdfSet {
    lambert: Bsdf,
    phong: Bsdf,
    microfacet: Bsdf,
}

impl BsdfSet {
    pub fn new(distribution: DistributionKind, geometry: GeometryTerm) -> Self {
        let diffuse: Arc<dyn Bxdf> = Arc::new(Lambert);
        let phong: Arc<dyn Bxdf> = Arc::new(BlinnPhong);
        let cook_torrance: Arc<dyn Bxdf> = Arc::new(CookTorrance::new(distribution.instantiate(), geometry));

        Self {
            lambert: Bsdf::new(Some(diffuse.clone()), None),
            phong: Bsdf::new(Some(diffuse.clone()), Some(phong)),
            microfacet: Bsdf::new(Some(diffuse), Some(cook_torrance)),
        }
    }

    pub fn select(&self, material: &Material) -> &Bsdf {
        match material.model {
            ShadingModel::Lambert => &self.lambert,
            ShadingModel::Phong(_) => &self.phong,
            ShadingModel::Microfacet(_) => &self.microfacet,
        }
    }
}

impl Default for BsdfSet {
    fn default() -> Self {
        Self::new(DistributionKind::default(), GeometryTerm::default())
    }
}
