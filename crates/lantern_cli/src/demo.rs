//! Built-in demo scene.

use anyhow::Result;
use lantern_core::{
    Camera, InfinitePlane, KdTreeConfig, Light, Material, MicrofacetParams, PhongParams, Quad, RenderContext,
    SceneObject, SceneTree, Skybox, Sphere, Texture, Triangle,
};
use lantern_math::{Color, Mat4, Vec2, Vec3};
use std::sync::Arc;

const GROUND: usize = 0;
const CLAY: usize = 1;
const GOLD: usize = 2;
const PLASTIC: usize = 3;
const GLASS: usize = 4;
const WALL: usize = 5;

fn materials() -> Vec<Material> {
    let checker = Arc::new(Texture::checker(256, 16, Color::splat(0.9), Color::splat(0.35)));

    vec![
        Material::lambert("ground", Color::ONE).with_texture(checker),
        Material::lambert("clay", Color::new(0.8, 0.3, 0.3)),
        Material::microfacet(
            "gold",
            Color::new(1.0, 0.78, 0.34),
            MicrofacetParams {
                roughness: 0.3,
                metallic: 1.0,
                reflectance: 0.04,
            },
        ),
        Material::phong(
            "plastic",
            Color::new(0.2, 0.35, 0.8),
            PhongParams {
                specular: Color::splat(0.3),
                shininess: 64.0,
            },
        ),
        Material::lambert("glass", Color::new(0.85, 0.95, 0.9)).with_opacity(0.35, 1.5),
        Material::lambert("wall", Color::splat(0.6)),
    ]
}

/// Spheres on a checkered floor with a triangle pyramid, lit by a sun, a
/// point light and a spot light.
pub fn build(width: u32, height: u32, kd_tree: KdTreeConfig) -> Result<RenderContext> {
    let camera = Camera::new()
        .with_resolution(width, height)
        .with_position(Vec3::new(0.0, 2.0, 7.0), Vec3::new(0.0, 0.6, 0.0), Vec3::Y)
        .with_fov(40.0);

    let mut scene = SceneTree::new(kd_tree);

    scene.add(SceneObject::new(
        "floor",
        Quad::axis_aligned(1, 0.0, Vec2::splat(-6.0), Vec2::splat(6.0)),
        GROUND,
    ))?;
    scene.add(SceneObject::new(
        "back wall",
        InfinitePlane::new(Vec3::new(0.0, 0.0, -6.0), Vec3::Z),
        WALL,
    ))?;

    scene.add(SceneObject::new("clay ball", Sphere::new(Vec3::new(-1.6, 0.7, 0.0), 0.7), CLAY))?;
    scene.add(SceneObject::new("gold ball", Sphere::new(Vec3::new(0.0, 1.0, -0.6), 1.0), GOLD))?;
    scene.add(SceneObject::new(
        "glass ball",
        Sphere::new(Vec3::new(1.1, 0.45, 1.2), 0.45),
        GLASS,
    ))?;

    // Small ring of plastic marbles, placed through transforms
    for i in 0..8 {
        let angle = i as f32 / 8.0 * std::f32::consts::TAU;
        let placement = Mat4::from_translation(Vec3::new(2.6 * angle.cos(), 0.2, 2.6 * angle.sin() - 0.5));
        scene.add(
            SceneObject::new(format!("marble {i}"), Sphere::new(Vec3::ZERO, 0.2), PLASTIC)
                .with_transform(placement),
        )?;
    }

    let apex = Vec3::new(2.2, 1.4, -1.2);
    let base = [
        Vec3::new(1.6, 0.0, -0.6),
        Vec3::new(2.8, 0.0, -0.6),
        Vec3::new(2.8, 0.0, -1.8),
        Vec3::new(1.6, 0.0, -1.8),
    ];
    for i in 0..4 {
        scene.add(SceneObject::new(
            format!("pyramid face {i}"),
            Triangle::new(base[i], base[(i + 1) % 4], apex),
            PLASTIC,
        ))?;
    }

    let lights = vec![
        Light::directional(Vec3::new(-0.4, -1.0, -0.6), Color::new(1.0, 0.95, 0.85), 1.6),
        Light::point(Vec3::new(-2.5, 3.0, 2.5), Color::new(1.0, 0.8, 0.6), 12.0),
        Light::spot(Vec3::new(3.0, 4.0, 2.0), Vec3::new(-0.5, -1.0, -0.4), 15.0, 25.0)
            .with_color(Color::new(0.6, 0.7, 1.0), 20.0),
    ];

    let context = RenderContext::new(camera, scene, materials())?
        .with_lights(lights)
        .with_skybox(Skybox::default());

    Ok(context)
}
