//! Lantern Core - scene-side data and the spatial index.
//!
//! This crate provides:
//!
//! - **Primitives**: `Sphere`, `InfinitePlane`, `Triangle`, `Quad` behind the `Primitive` enum
//! - **Spatial index**: a generic `KdTree` with midpoint, SAH and median split strategies
//! - **Scene**: `SceneTree`, `Camera`, `Light`, `Skybox`, `Material`, `Texture`
//! - **Output**: a thread-shareable `FrameBuffer`
//!
//! Everything a renderer needs for one frame is bundled in a `RenderContext`.

pub mod buffer;
pub mod camera;
pub mod context;
pub mod error;
pub mod hit;
pub mod kd_tree;
pub mod light;
pub mod material;
pub mod primitive;
pub mod scene;
pub mod skybox;
pub mod texture;

pub use buffer::FrameBuffer;
pub use camera::Camera;
pub use context::RenderContext;
pub use error::{SceneError, SceneResult};
pub use hit::{RaycastHit, Spatial, RAY_EPSILON};
pub use kd_tree::{KdNode, KdStats, KdTree, KdTreeConfig, LeafInfo, LeafReason, SplitStrategy};
pub use light::{Attenuation, Light, LightKind, LightSample};
pub use material::{Material, MicrofacetParams, PhongParams, ShadingModel};
pub use primitive::{InfinitePlane, Primitive, Quad, Sphere, Triangle};
pub use scene::{SceneObject, SceneTree};
pub use skybox::Skybox;
pub use texture::Texture;

/// Re-export common math types from lantern_math
pub use lantern_math::{Aabb, Color, Interval, Ray, Vec3};
