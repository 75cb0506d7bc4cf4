//! Ray tracer configuration.

use crate::bsdf::{DistributionKind, GeometryTerm};
use crate::error::{RenderError, RenderResult};
use crate::integrator::IntegratorKind;
use crate::job::default_thread_count;
use crate::tile::DEFAULT_TILE_SIZE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for a [`RayTracer`](crate::RayTracer). Missing JSON fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RayTracerConfig {
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// How long `render` blocks waiting for the frame to finish
    pub max_frame_time_ms: u64,
    pub samples_per_pixel: u32,
    /// Maximum secondary bounce depth
    pub max_depth: u32,
    pub integrator: IntegratorKind,
    /// Worker thread count; `None` uses all cores but one
    pub thread_count: Option<usize>,
    pub seed: u64,
    pub distribution: DistributionKind,
    pub geometry: GeometryTerm,
}

impl Default for RayTracerConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            max_frame_time_ms: 33,
            samples_per_pixel: 1,
            max_depth: 3,
            integrator: IntegratorKind::default(),
            thread_count: None,
            seed: 0x5eed,
            distribution: DistributionKind::default(),
            geometry: GeometryTerm::default(),
        }
    }
}

impl RayTracerConfig {
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_samples_per_pixel(mut self, samples: u32) -> Self {
        self.samples_per_pixel = samples;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_thread_count(mut self, threads: usize) -> Self {
        self.thread_count = Some(threads);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_frame_time(mut self, time: Duration) -> Self {
        self.max_frame_time_ms = time.as_millis() as u64;
        self
    }

    pub fn max_frame_time(&self) -> Duration {
        Duration::from_millis(self.max_frame_time_ms)
    }

    pub fn resolved_thread_count(&self) -> usize {
        self.thread_count.unwrap_or_else(default_thread_count).max(1)
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.tile_size == 0 {
            return Err(RenderError::InvalidConfig("tile_size must be positive".into()));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be positive".into(),
            ));
        }
        if self.thread_count == Some(0) {
            return Err(RenderError::InvalidConfig("thread_count must be positive".into()));
        }
        Ok(())
    }
}
