//! Lantern Renderer - progressive CPU ray tracing
//!
//! The frame is split into shuffled tiles, each rendered by a job on a fixed
//! worker pool. Frames accumulate into a running per-pixel average until a
//! setting changes.
//!
//! - **Jobs**: `WorkerJob` state machine, FIFO `JobGroup`, `WorkerThread`s
//! - **Shading**: `Bsdf` lobes (Lambert, Blinn-Phong, Cook-Torrance) and
//!   surface integrators (debug, Whitted, Monte Carlo)
//! - **Driver**: `RayTracer`, advanced one step per `render` call

pub mod bsdf;
pub mod config;
pub mod error;
pub mod integrator;
pub mod job;
pub mod ray_tracer;
pub mod render_job;
pub mod sampling;
pub mod shading;
pub mod sync;
pub mod tile;

pub use bsdf::{Bsdf, BsdfSet, Bxdf, BxdfType, DistributionKind, GeometryTerm, SurfaceParams};
pub use config::RayTracerConfig;
pub use error::{JobError, JobResult, RenderError, RenderResult};
pub use integrator::{IntegratorKind, MonteCarloParams, SurfaceIntegrator};
pub use job::{Job, JobGroup, JobState, Scheduler, WorkerJob, WorkerThread};
pub use ray_tracer::{FrameStatus, RayTracer};
pub use render_job::{Region, RenderJob};
pub use shading::{Shading, ShadingContext};
pub use sync::{Counter, Guarded, Semaphore};
pub use tile::{generate_tiles, shuffle_tiles, Tile, DEFAULT_TILE_SIZE};
