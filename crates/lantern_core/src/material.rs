//! Surface materials.
//!
//! A material stores only parameters. The renderer maps `ShadingModel` to a
//! BSDF, so the same BxDF instances are shared across every material.

use crate::texture::Texture;
use lantern_math::{Color, Vec2};
use std::sync::Arc;

/// Parameters of a Phong-style glossy surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongParams {
    pub specular: Color,
    pub shininess: f32,
}

impl Default for PhongParams {
    fn default() -> Self {
        Self {
            specular: Color::splat(0.04),
            shininess: 32.0,
        }
    }
}

/// Parameters of a physically based microfacet surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MicrofacetParams {
    pub roughness: f32,
    pub metallic: f32,
    /// Dielectric reflectance at normal incidence
    pub reflectance: f32,
}

impl Default for MicrofacetParams {
    fn default() -> Self {
        Self {
            roughness: 0.5,
            metallic: 0.0,
            reflectance: 0.04,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShadingModel {
    Lambert,
    Phong(PhongParams),
    Microfacet(MicrofacetParams),
}

#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub albedo: Color,
    pub texture: Option<Arc<Texture>>,
    /// 1.0 is fully opaque
    pub opacity: f32,
    pub refractive_index: f32,
    pub model: ShadingModel,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            albedo: Color::splat(0.8),
            texture: None,
            opacity: 1.0,
            refractive_index: 1.5,
            model: ShadingModel::Lambert,
        }
    }

    pub fn lambert(name: impl Into<String>, albedo: Color) -> Self {
        Self::new(name).with_albedo(albedo)
    }

    pub fn phong(name: impl Into<String>, albedo: Color, params: PhongParams) -> Self {
        Self::new(name)
            .with_albedo(albedo)
            .with_model(ShadingModel::Phong(params))
    }

    pub fn microfacet(name: impl Into<String>, albedo: Color, params: MicrofacetParams) -> Self {
        Self::new(name)
            .with_albedo(albedo)
            .with_model(ShadingModel::Microfacet(params))
    }

    pub fn with_albedo(mut self, albedo: Color) -> Self {
        self.albedo = albedo;
        self
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_opacity(mut self, opacity: f32, refractive_index: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.refractive_index = refractive_index;
        self
    }

    pub fn with_model(mut self, model: ShadingModel) -> Self {
        self.model = model;
        self
    }

    /// Albedo modulated by the texture, if any.
    pub fn albedo_at(&self, uv: Vec2) -> Color {
        match &self.texture {
            Some(texture) => self.albedo * texture.sample(uv),
            None => self.albedo,
        }
    }

    pub fn is_translucent(&self) -> bool {
        self.opacity < 1.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default")
    }
}
