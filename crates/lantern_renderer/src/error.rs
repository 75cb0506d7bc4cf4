//! Error types for the job layer and the ray tracer.

use crate::job::JobState;
use lantern_core::SceneError;
use thiserror::Error;

/// Errors raised by the job infrastructure.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Job is not idle (state: {0:?})")]
    NotIdle(JobState),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type JobResult<T> = Result<T, JobError>;

/// Errors raised by the ray tracer.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("A render context is already bound")]
    ContextAlreadyBound,

    #[error("No render context is bound")]
    NoContext,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Job error: {0}")]
    Job(#[from] JobError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

pub type RenderResult<T> = Result<T, RenderError>;
