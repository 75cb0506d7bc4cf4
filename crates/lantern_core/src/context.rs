//! Everything a renderer reads while shading a frame.

use crate::camera::Camera;
use crate::error::{SceneError, SceneResult};
use crate::light::Light;
use crate::material::Material;
use crate::scene::{SceneObject, SceneTree};
use crate::skybox::Skybox;
use lantern_math::{Color, Vec3};

/// Read-only scene data shared by all render workers.
pub struct RenderContext {
    pub camera: Camera,
    pub lights: Vec<Light>,
    pub skybox: Option<Skybox>,
    pub scene: SceneTree,
    pub materials: Vec<Material>,
}

impl RenderContext {
    /// Validate material references and build the scene index if needed.
    pub fn new(camera: Camera, mut scene: SceneTree, materials: Vec<Material>) -> SceneResult<Self> {
        if camera.image_width == 0 || camera.image_height == 0 {
            return Err(SceneError::InvalidResolution {
                width: camera.image_width,
                height: camera.image_height,
            });
        }

        if let Some(object) = scene.objects().iter().find(|o| o.material >= materials.len()) {
            return Err(SceneError::MissingMaterial {
                object: object.name.clone(),
                material: object.material,
            });
        }

        if scene.is_dirty() {
            scene.optimize();
        }

        Ok(Self {
            camera,
            lights: Vec::new(),
            skybox: None,
            scene,
            materials,
        })
    }

    pub fn with_lights(mut self, lights: Vec<Light>) -> Self {
        self.lights = lights;
        self
    }

    pub fn with_skybox(mut self, skybox: Skybox) -> Self {
        self.skybox = Some(skybox);
        self
    }

    /// Background seen along `direction`; black without a skybox.
    pub fn background(&self, direction: Vec3) -> Color {
        self.skybox
            .map(|sky| sky.sample(direction))
            .unwrap_or(Color::ZERO)
    }

    pub fn object(&self, index: usize) -> Option<&SceneObject> {
        self.scene.object(index)
    }

    /// Material of the object at `index`. Validated at construction.
    pub fn material_of(&self, index: usize) -> Option<&Material> {
        self.scene
            .object(index)
            .and_then(|o| self.materials.get(o.material))
    }

    pub fn enabled_lights(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter().filter(|l| l.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Sphere;

    fn scene_with_material(material: usize) -> SceneTree {
        let mut scene = SceneTree::default();
        scene
            .add(SceneObject::new("ball", Sphere::new(Vec3::ZERO, 1.0), material))
            .unwrap();
        scene
    }

    #[test]
    fn test_missing_material_is_reported() {
        let result = RenderContext::new(Camera::new(), scene_with_material(2), vec![Material::default()]);

        match result {
            Err(SceneError::MissingMaterial { object, material }) => {
                assert_eq!(object, "ball");
                assert_eq!(material, 2);
            }
            _ => panic!("expected MissingMaterial"),
        }
    }

    #[test]
    fn test_new_optimizes_dirty_scene() {
        let context =
            RenderContext::new(Camera::new(), scene_with_material(0), vec![Material::default()]).unwrap();

        assert!(!context.scene.is_dirty());
        assert_eq!(context.material_of(0).unwrap().name, "default");
    }

    #[test]
    fn test_background_without_skybox_is_black() {
        let context = RenderContext::new(Camera::new(), SceneTree::default(), Vec::new()).unwrap();
        assert_eq!(context.background(Vec3::Y), Color::ZERO);

        let context = context.with_skybox(Skybox::Solid(Color::ONE));
        assert_eq!(context.background(Vec3::Y), Color::ONE);
    }
}
