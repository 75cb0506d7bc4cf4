//! A render job shades one region of the frame.

use crate::job::{Job, WorkerJob};
use crate::ray_tracer::TracerState;
use crate::sync::Counter;
use crate::tile::Tile;
use rand_pcg::Pcg32;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const FRAME_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Pixels covered by a job.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    Tile(Tile),
    Pixels(Vec<(u32, u32)>),
}

impl Region {
    pub fn pixel_count(&self) -> usize {
        match self {
            Region::Tile(tile) => tile.pixel_count() as usize,
            Region::Pixels(pixels) => pixels.len(),
        }
    }

    pub fn pixel(&self, i: usize) -> (u32, u32) {
        match self {
            Region::Tile(tile) => tile.pixel(i as u32),
            Region::Pixels(pixels) => pixels[i],
        }
    }
}

pub struct RenderJob {
    job: WorkerJob,
    region: Region,
    /// Random stream selector, unique per job
    stream: u64,
    /// Pixels finished in the current run
    cursor: AtomicUsize,
    tracer: Arc<TracerState>,
    frame_latch: Arc<Counter>,
}

impl RenderJob {
    pub(crate) fn new(region: Region, stream: u64, tracer: Arc<TracerState>, frame_latch: Arc<Counter>) -> Self {
        Self {
            job: WorkerJob::new(),
            region,
            stream,
            cursor: AtomicUsize::new(0),
            tracer,
            frame_latch,
        }
    }

    pub(crate) fn for_tile(tile: Tile, tracer: Arc<TracerState>, frame_latch: Arc<Counter>) -> Self {
        Self::new(Region::Tile(tile), tile.index as u64, tracer, frame_latch)
    }

    pub(crate) fn for_pixels(
        pixels: Vec<(u32, u32)>,
        stream: u64,
        tracer: Arc<TracerState>,
        frame_latch: Arc<Counter>,
    ) -> Self {
        Self::new(Region::Pixels(pixels), stream, tracer, frame_latch)
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Fraction of the region shaded so far.
    pub fn progress(&self) -> f32 {
        let total = self.region.pixel_count();
        if total == 0 {
            return 1.0;
        }
        self.cursor.load(Ordering::Relaxed) as f32 / total as f32
    }
}

impl Job for RenderJob {
    fn worker_job(&self) -> &WorkerJob {
        &self.job
    }

    fn work(&self) {
        let settings = self.tracer.settings();
        let mut rng = Pcg32::new(
            settings.seed ^ settings.frame_index.wrapping_mul(FRAME_MIX),
            self.stream,
        );

        self.cursor.store(0, Ordering::Relaxed);
        for i in 0..self.region.pixel_count() {
            if self.job.is_interrupted() {
                log::trace!("Render job {} interrupted at pixel {}", self.stream, i);
                return;
            }
            let (x, y) = self.region.pixel(i);
            self.tracer.render_pixel(x, y, &settings, &mut rng);
            self.cursor.store(i + 1, Ordering::Relaxed);
        }

        self.frame_latch.decrement();
    }
}
