//! Errors raised while assembling a scene.

use thiserror::Error;

/// Errors that can occur while building a scene or render context.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Object '{object}' references missing material {material}")]
    MissingMaterial { object: String, material: usize },

    #[error("Object {index} is degenerate (zero area or radius)")]
    DegeneratePrimitive { index: usize },

    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },
}

pub type SceneResult<T> = Result<T, SceneError>;
