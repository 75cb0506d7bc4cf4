//! Surface integrators.
//!
//! An integrator computes the radiance leaving a hit point toward the ray
//! origin. Secondary rays go back through [`ShadingContext::calculate_shading`],
//! so every integrator honors the same depth limit.

mod debug;
mod monte_carlo;
mod whitted;

pub use debug::DebugIntegrator;
pub use monte_carlo::{MonteCarloIntegrator, MonteCarloParams};
pub use whitted::WhittedIntegrator;

use crate::shading::ShadingContext;
use lantern_core::{Material, RaycastHit};
use lantern_math::{Color, Ray};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::{Display, EnumString, EnumVariantNames};

pub trait SurfaceIntegrator: Send + Sync {
    fn li(
        &self,
        ctx: &ShadingContext,
        ray: &Ray,
        hit: &RaycastHit,
        material: &Material,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color;
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Display, EnumString, EnumVariantNames)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IntegratorKind {
    Debug,
    #[default]
    Whitted,
    MonteCarlo(MonteCarloParams),
}

impl IntegratorKind {
    pub fn instantiate(self) -> Arc<dyn SurfaceIntegrator> {
        match self {
            IntegratorKind::Debug => Arc::new(DebugIntegrator),
            IntegratorKind::Whitted => Arc::new(WhittedIntegrator),
            IntegratorKind::MonteCarlo(params) => Arc::new(MonteCarloIntegrator::new(params)),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::bsdf::BsdfSet;
    use lantern_core::{
        Camera, KdTreeConfig, Light, RenderContext, SceneObject, SceneTree, Skybox, Sphere,
    };
    use lantern_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::str::FromStr;

    /// Unit sphere at the origin lit from straight above.
    pub(crate) fn lit_sphere(material: Material) -> RenderContext {
        let camera = Camera::new()
            .with_resolution(32, 32)
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let mut scene = SceneTree::new(KdTreeConfig::default());
        scene
            .add(SceneObject::new("ball", Sphere::new(Vec3::ZERO, 1.0), 0))
            .unwrap();

        RenderContext::new(camera, scene, vec![material])
            .unwrap()
            .with_lights(vec![Light::directional(-Vec3::Y, Color::ONE, 1.0)])
            .with_skybox(Skybox::Solid(Color::new(0.1, 0.2, 0.3)))
    }

    pub(crate) fn shade(kind: IntegratorKind, context: &RenderContext, ray: &Ray, max_depth: u32) -> crate::shading::Shading {
        let bsdfs = BsdfSet::default();
        let integrator = kind.instantiate();
        let ctx = ShadingContext::new(context, &bsdfs, integrator.as_ref(), max_depth);
        let mut rng = StdRng::seed_from_u64(11);
        ctx.calculate_shading(ray, 0, &mut rng)
    }

    #[test]
    fn test_parse_integrator_kind() {
        assert_eq!(IntegratorKind::from_str("whitted").unwrap(), IntegratorKind::Whitted);
        assert_eq!(IntegratorKind::from_str("debug").unwrap(), IntegratorKind::Debug);
        assert_eq!(
            IntegratorKind::from_str("monte_carlo").unwrap(),
            IntegratorKind::MonteCarlo(MonteCarloParams::default())
        );
        assert_eq!(IntegratorKind::default().to_string(), "whitted");
    }

    #[test]
    fn test_integrator_kind_json() {
        let kind: IntegratorKind = serde_json::from_str(r#"{"monte_carlo":{"sample_count":2}}"#).unwrap();
        assert_eq!(kind, IntegratorKind::MonteCarlo(MonteCarloParams { sample_count: 2 }));
    }

    #[test]
    fn test_miss_returns_background_for_every_integrator() {
        let context = lit_sphere(Material::lambert("grey", Color::splat(0.5)));
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::X);

        for kind in [
            IntegratorKind::Debug,
            IntegratorKind::Whitted,
            IntegratorKind::MonteCarlo(MonteCarloParams::default()),
        ] {
            let shading = shade(kind, &context, &ray, 2);
            assert_eq!(shading, crate::shading::Shading::Miss { background: Color::new(0.1, 0.2, 0.3) });
        }
    }

    #[test]
    fn test_depth_past_limit_is_black() {
        let context = lit_sphere(Material::lambert("grey", Color::splat(0.5)));
        let bsdfs = BsdfSet::default();
        let integrator = IntegratorKind::Whitted.instantiate();
        let ctx = ShadingContext::new(&context, &bsdfs, integrator.as_ref(), 1);
        let mut rng = StdRng::seed_from_u64(2);

        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y);
        assert_eq!(ctx.trace(&ray, 2, &mut rng), Color::ZERO);
    }
}
