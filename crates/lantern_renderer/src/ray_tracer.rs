//! Progressive tile-parallel ray tracer.
//!
//! Each call to [`RayTracer::render`] advances the current frame: the first
//! call queues one job per tile, later calls wait up to the configured frame
//! time and report progress. When every tile is done the frame is closed and
//! its samples are folded into the running per-pixel average, so the image
//! refines while the scene and settings stay unchanged.
//!
//! Changing a runtime setting resets the accumulation through
//! [`RayTracer::reset_frame`].

use crate::bsdf::BsdfSet;
use crate::config::RayTracerConfig;
use crate::error::{RenderError, RenderResult};
use crate::integrator::{IntegratorKind, SurfaceIntegrator};
use crate::job::{Job, JobState, Scheduler};
use crate::render_job::RenderJob;
use crate::sampling::sample_square;
use crate::shading::ShadingContext;
use crate::sync::{Counter, Guarded};
use crate::tile::{generate_tiles, shuffle_tiles};
use lantern_core::{FrameBuffer, RenderContext};
use lantern_math::{Color, Vec4};
use rand::RngCore;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of one [`RayTracer::render`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameStatus {
    /// A new frame was queued
    Started,
    /// The frame is still rendering
    InProgress { progress: f32 },
    /// The frame finished and was accumulated
    Completed {
        rendered_samples: u32,
        frame_time: Duration,
    },
}

/// Per-frame settings snapshot read by render jobs.
#[derive(Clone)]
pub(crate) struct FrameSettings {
    pub rendered_samples: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub integrator: Arc<dyn SurfaceIntegrator>,
    pub frame_index: u64,
    pub seed: u64,
}

impl FrameSettings {
    fn from_config(config: &RayTracerConfig) -> Self {
        Self {
            rendered_samples: 0,
            samples_per_pixel: config.samples_per_pixel,
            max_depth: config.max_depth,
            integrator: config.integrator.instantiate(),
            frame_index: 0,
            seed: config.seed,
        }
    }
}

/// State shared between the tracer and its render jobs.
pub(crate) struct TracerState {
    context: Arc<RenderContext>,
    buffer: Arc<FrameBuffer>,
    bsdfs: BsdfSet,
    settings: Guarded<FrameSettings>,
}

impl TracerState {
    pub fn settings(&self) -> FrameSettings {
        self.settings.get()
    }

    fn check_pixel(&self, x: u32, y: u32) -> RenderResult<()> {
        let (width, height) = (self.buffer.width(), self.buffer.height());
        if x >= width || y >= height {
            return Err(RenderError::InvalidConfig(format!(
                "pixel ({}, {}) is outside the {}x{} buffer",
                x, y, width, height
            )));
        }
        Ok(())
    }

    /// Shade `samples_per_pixel` jittered rays through pixel (x, y) and fold
    /// them into the running average.
    pub fn render_pixel(&self, x: u32, y: u32, settings: &FrameSettings, rng: &mut dyn RngCore) {
        let ctx = ShadingContext::new(
            &self.context,
            &self.bsdfs,
            settings.integrator.as_ref(),
            settings.max_depth,
        );
        let camera = &self.context.camera;
        let rendered = settings.rendered_samples;

        let previous = self.buffer.get_pixel(x, y).truncate();
        let mut sum = previous * rendered as f32;

        for sample in 0..settings.samples_per_pixel {
            let jitter = sample_square(rng);
            let ray = camera.viewport_to_ray(x as f32 + 0.5 + jitter.x, y as f32 + 0.5 + jitter.y);
            let shading = ctx.calculate_shading(&ray, 0, rng);

            if rendered == 0 && sample == 0 {
                self.buffer.set_depth(x, y, shading.distance());
            }
            sum += shading.radiance();
        }

        let total = (rendered + settings.samples_per_pixel) as f32;
        let average: Color = sum / total;
        self.buffer.set_pixel(x, y, average.extend(1.0));
    }
}

pub struct RayTracer {
    config: RayTracerConfig,
    scheduler: Scheduler,
    state: Option<Arc<TracerState>>,
    jobs: Vec<Arc<RenderJob>>,
    frame_latch: Arc<Counter>,
    rendering_frame: bool,
    frame_started: Option<Instant>,
}

impl RayTracer {
    pub fn new(config: RayTracerConfig) -> RenderResult<Self> {
        config.validate()?;
        let scheduler = Scheduler::new(config.resolved_thread_count())?;

        Ok(Self {
            config,
            scheduler,
            state: None,
            jobs: Vec::new(),
            frame_latch: Arc::new(Counter::new(0)),
            rendering_frame: false,
            frame_started: None,
        })
    }

    pub fn config(&self) -> &RayTracerConfig {
        &self.config
    }

    pub fn thread_count(&self) -> usize {
        self.scheduler.thread_count()
    }

    pub fn is_bound(&self) -> bool {
        self.state.is_some()
    }

    pub fn is_rendering(&self) -> bool {
        self.rendering_frame
    }

    /// Samples per pixel accumulated in completed frames.
    pub fn rendered_samples(&self) -> u32 {
        self.state
            .as_ref()
            .map_or(0, |state| state.settings.with(|s| s.rendered_samples))
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn job_states(&self) -> Vec<JobState> {
        self.jobs.iter().map(|job| job.worker_job().state()).collect()
    }

    /// Mean progress of the current frame's jobs.
    pub fn progress(&self) -> f32 {
        if self.jobs.is_empty() {
            return 0.0;
        }
        self.jobs.iter().map(|job| job.progress()).sum::<f32>() / self.jobs.len() as f32
    }

    /// Attach a scene and an output buffer matching the camera resolution.
    pub fn bind_context(&mut self, context: Arc<RenderContext>, buffer: Arc<FrameBuffer>) -> RenderResult<()> {
        if self.state.is_some() {
            return Err(RenderError::ContextAlreadyBound);
        }

        let (width, height) = (context.camera.image_width, context.camera.image_height);
        if buffer.width() != width || buffer.height() != height {
            return Err(RenderError::InvalidConfig(format!(
                "buffer is {}x{} but camera is {}x{}",
                buffer.width(),
                buffer.height(),
                width,
                height
            )));
        }

        let state = Arc::new(TracerState {
            context,
            buffer,
            bsdfs: BsdfSet::new(self.config.distribution, self.config.geometry),
            settings: Guarded::new(FrameSettings::from_config(&self.config)),
        });

        let mut tiles = generate_tiles(width, height, self.config.tile_size);
        shuffle_tiles(&mut tiles, self.config.seed);

        self.jobs = tiles
            .into_iter()
            .map(|tile| Arc::new(RenderJob::for_tile(tile, Arc::clone(&state), Arc::clone(&self.frame_latch))))
            .collect();

        state.buffer.clear(Vec4::ZERO);
        self.state = Some(state);

        log::info!(
            "Bound render context: {}x{}, {} tiles, {} threads",
            width,
            height,
            self.jobs.len(),
            self.scheduler.thread_count()
        );
        Ok(())
    }

    /// Stop rendering and release the scene and buffer.
    pub fn unbind_context(&mut self) {
        self.post_render();
        self.jobs.clear();
        self.state = None;
    }

    /// Advance the progressive render by one step.
    pub fn render(&mut self) -> RenderResult<FrameStatus> {
        if self.state.is_none() {
            return Err(RenderError::NoContext);
        }

        if !self.rendering_frame {
            self.pre_render()?;
            return Ok(FrameStatus::Started);
        }

        if !self.frame_latch.wait_zero_timeout(self.config.max_frame_time()) {
            return Ok(FrameStatus::InProgress {
                progress: self.progress(),
            });
        }

        // The latch drops before the last job records completion
        for job in &self.jobs {
            job.worker_job().wait_for_completion();
        }

        let frame_time = self.frame_started.map_or(Duration::ZERO, |t| t.elapsed());
        self.post_render();

        let rendered_samples = self.rendered_samples();
        log::debug!("Frame completed in {:?}, {} samples", frame_time, rendered_samples);

        Ok(FrameStatus::Completed {
            rendered_samples,
            frame_time,
        })
    }

    /// Render until the current (or a new) frame completes.
    pub fn render_frame(&mut self) -> RenderResult<Duration> {
        loop {
            if let FrameStatus::Completed { frame_time, .. } = self.render()? {
                return Ok(frame_time);
            }
        }
    }

    /// Queue every tile job for a new frame.
    pub fn pre_render(&mut self) -> RenderResult<()> {
        let state = self.state.as_ref().ok_or(RenderError::NoContext)?;
        if self.rendering_frame {
            return Ok(());
        }

        state.settings.with(|s| s.frame_index += 1);
        self.frame_latch.reset(self.jobs.len());
        self.frame_started = Some(Instant::now());

        for job in &self.jobs {
            self.scheduler.enqueue(Arc::clone(job) as Arc<dyn Job>)?;
        }
        self.rendering_frame = true;
        Ok(())
    }

    /// Stop the current frame and return every job to `Idle`.
    ///
    /// The frame's samples are accumulated only if every job completed.
    pub fn post_render(&mut self) {
        self.scheduler.group().clear_queue();

        let completed = self.jobs.iter().all(|job| job.worker_job().is_completed());
        for job in &self.jobs {
            job.worker_job().interrupt();
        }
        for job in &self.jobs {
            job.worker_job().reset();
        }

        if self.rendering_frame && completed {
            if let Some(state) = &self.state {
                state
                    .settings
                    .with(|s| s.rendered_samples += s.samples_per_pixel);
            }
        }
        self.rendering_frame = false;
    }

    /// Discard accumulated samples, optionally starting a new frame.
    pub fn reset_frame(&mut self, start_new: bool) -> RenderResult<()> {
        self.post_render();
        if let Some(state) = &self.state {
            state.settings.with(|s| s.rendered_samples = 0);
            state.buffer.clear(Vec4::ZERO);
        }
        if start_new {
            self.pre_render()?;
        }
        Ok(())
    }

    pub fn set_integrator(&mut self, integrator: IntegratorKind) -> RenderResult<()> {
        log::info!("Switching integrator to {}", integrator);
        self.reconfigure(|config| config.integrator = integrator)
    }

    pub fn set_max_depth(&mut self, max_depth: u32) -> RenderResult<()> {
        self.reconfigure(|config| config.max_depth = max_depth)
    }

    pub fn set_samples_per_pixel(&mut self, samples: u32) -> RenderResult<()> {
        self.reconfigure(|config| config.samples_per_pixel = samples)
    }

    fn reconfigure(&mut self, apply: impl FnOnce(&mut RayTracerConfig)) -> RenderResult<()> {
        let mut config = self.config.clone();
        apply(&mut config);
        config.validate()?;

        // Jobs snapshot settings when they start, so stop them first
        self.post_render();
        self.config = config;
        if let Some(state) = &self.state {
            let fresh = FrameSettings::from_config(&self.config);
            state.settings.with(|s| {
                s.samples_per_pixel = fresh.samples_per_pixel;
                s.max_depth = fresh.max_depth;
                s.integrator = fresh.integrator;
            });
        }
        self.reset_frame(false)
    }

    /// Shade one pixel on the calling thread with the current settings.
    pub fn render_pixel(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> RenderResult<()> {
        let state = self.state.as_ref().ok_or(RenderError::NoContext)?;
        state.check_pixel(x, y)?;
        let settings = state.settings();
        state.render_pixel(x, y, &settings, rng);
        Ok(())
    }

    /// A job covering an explicit pixel list, sharing this tracer's state.
    pub fn pixel_job(&self, pixels: Vec<(u32, u32)>) -> RenderResult<RenderJob> {
        let state = self.state.as_ref().ok_or(RenderError::NoContext)?;
        for &(x, y) in &pixels {
            state.check_pixel(x, y)?;
        }
        Ok(RenderJob::for_pixels(
            pixels,
            self.jobs.len() as u64,
            Arc::clone(state),
            Arc::new(Counter::new(1)),
        ))
    }
}

impl Drop for RayTracer {
    fn drop(&mut self) {
        self.post_render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrator::MonteCarloParams;
    use lantern_core::{
        Camera, KdTreeConfig, Light, Material, SceneObject, SceneTree, Skybox, Sphere,
    };
    use lantern_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const WIDTH: u32 = 40;
    const HEIGHT: u32 = 24;

    fn context() -> Arc<RenderContext> {
        let camera = Camera::new()
            .with_resolution(WIDTH, HEIGHT)
            .with_position(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, Vec3::Y);
        let mut scene = SceneTree::new(KdTreeConfig::default());
        scene
            .add(SceneObject::new("ball", Sphere::new(Vec3::ZERO, 1.0), 0))
            .unwrap();
        scene
            .add(SceneObject::new("ground", Sphere::new(Vec3::new(0.0, -101.0, 0.0), 100.0), 1))
            .unwrap();

        let materials = vec![
            Material::lambert("ball", Color::new(0.8, 0.3, 0.3)),
            Material::lambert("ground", Color::splat(0.5)),
        ];
        Arc::new(
            RenderContext::new(camera, scene, materials)
                .unwrap()
                .with_lights(vec![Light::directional(Vec3::new(-1.0, -1.0, -0.5), Color::ONE, 1.0)])
                .with_skybox(Skybox::default()),
        )
    }

    fn buffer() -> Arc<FrameBuffer> {
        Arc::new(FrameBuffer::new(WIDTH, HEIGHT).unwrap())
    }

    fn tracer(config: RayTracerConfig) -> RayTracer {
        let mut tracer = RayTracer::new(config).unwrap();
        tracer.bind_context(context(), buffer()).unwrap();
        tracer
    }

    fn drive(tracer: &mut RayTracer) -> FrameStatus {
        for _ in 0..10_000 {
            let status = tracer.render().unwrap();
            if matches!(status, FrameStatus::Completed { .. }) {
                return status;
            }
        }
        panic!("frame did not complete");
    }

    #[test]
    fn test_render_requires_context() {
        let mut tracer = RayTracer::new(RayTracerConfig::default().with_thread_count(1)).unwrap();
        assert!(matches!(tracer.render(), Err(RenderError::NoContext)));
    }

    #[test]
    fn test_bind_twice_fails() {
        let mut tracer = tracer(RayTracerConfig::default().with_thread_count(1));
        assert!(matches!(
            tracer.bind_context(context(), buffer()),
            Err(RenderError::ContextAlreadyBound)
        ));

        tracer.unbind_context();
        assert!(tracer.bind_context(context(), buffer()).is_ok());
    }

    #[test]
    fn test_buffer_size_must_match_camera() {
        let mut tracer = RayTracer::new(RayTracerConfig::default().with_thread_count(1)).unwrap();
        let small = Arc::new(FrameBuffer::new(8, 8).unwrap());
        assert!(matches!(
            tracer.bind_context(context(), small),
            Err(RenderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_progressive_frames_accumulate() {
        let mut tracer = tracer(RayTracerConfig::default().with_thread_count(2));
        assert_eq!(tracer.job_count(), 3 * 2);

        for frame in 1..=3 {
            let status = drive(&mut tracer);
            assert!(matches!(
                status,
                FrameStatus::Completed { rendered_samples, .. } if rendered_samples == frame
            ));
        }
        assert_eq!(tracer.rendered_samples(), 3);
        assert!(tracer.job_states().iter().all(|&s| s == JobState::Idle));

        let state = tracer.state.as_ref().unwrap();
        let center = state.buffer.get_pixel(WIDTH / 2, HEIGHT / 2);
        assert!(center.x > 0.0 && center.w == 1.0);
        assert!((state.buffer.get_depth(WIDTH / 2, HEIGHT / 2) - 3.0).abs() < 0.05);
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                assert!(state.buffer.get_pixel(x, y).is_finite());
            }
        }
    }

    #[test]
    fn test_accumulation_matches_batched_samples() {
        let kind = IntegratorKind::MonteCarlo(MonteCarloParams { sample_count: 2 });
        let single = tracer(
            RayTracerConfig::default()
                .with_thread_count(1)
                .with_integrator(kind)
                .with_samples_per_pixel(1),
        );
        let batched = tracer(
            RayTracerConfig::default()
                .with_thread_count(1)
                .with_integrator(kind)
                .with_samples_per_pixel(4),
        );

        for &(x, y) in &[(20, 12), (3, 20), (35, 2)] {
            let mut rng_single = StdRng::seed_from_u64(5);
            let state = single.state.as_ref().unwrap();
            for _ in 0..4 {
                single.render_pixel(x, y, &mut rng_single).unwrap();
                state.settings.with(|s| s.rendered_samples += 1);
            }
            state.settings.with(|s| s.rendered_samples = 0);

            let mut rng_batched = StdRng::seed_from_u64(5);
            batched.render_pixel(x, y, &mut rng_batched).unwrap();

            let a = state.buffer.get_pixel(x, y);
            let b = batched.state.as_ref().unwrap().buffer.get_pixel(x, y);
            assert!((a - b).abs().max_element() < 1e-4, "{a} vs {b} at ({x}, {y})");
        }
    }

    #[test]
    fn test_reset_frame_under_load() {
        let mut tracer = tracer(RayTracerConfig::default().with_thread_count(3));

        for i in 0..20 {
            tracer.render().unwrap();
            if i % 2 == 0 {
                std::thread::sleep(Duration::from_millis(1));
            }
            tracer.reset_frame(true).unwrap();
            assert!(tracer.is_rendering());
            assert_eq!(tracer.rendered_samples(), 0);
        }

        tracer.reset_frame(false).unwrap();
        assert!(!tracer.is_rendering());
        assert_eq!(tracer.rendered_samples(), 0);
        assert!(tracer.job_states().iter().all(|&s| s == JobState::Idle));

        drive(&mut tracer);
        assert_eq!(tracer.rendered_samples(), 1);
    }

    #[test]
    fn test_runtime_settings_reset_accumulation() {
        let mut tracer = tracer(RayTracerConfig::default().with_thread_count(2));
        drive(&mut tracer);
        assert_eq!(tracer.rendered_samples(), 1);

        tracer.set_integrator(IntegratorKind::Debug).unwrap();
        assert_eq!(tracer.rendered_samples(), 0);
        assert_eq!(tracer.config().integrator, IntegratorKind::Debug);

        assert!(tracer.set_samples_per_pixel(0).is_err());
        tracer.set_samples_per_pixel(2).unwrap();
        drive(&mut tracer);
        assert_eq!(tracer.rendered_samples(), 2);

        // Debug output is the flat albedo of the ball
        let state = tracer.state.as_ref().unwrap();
        let center = state.buffer.get_pixel(WIDTH / 2, HEIGHT / 2).truncate();
        assert!((center - Color::new(0.8, 0.3, 0.3)).length() < 1e-4);
    }

    #[test]
    fn test_pixel_job_writes_only_its_pixels() {
        let tracer = tracer(RayTracerConfig::default().with_thread_count(1));
        let job = tracer.pixel_job(vec![(0, 0), (20, 12)]).unwrap();

        job.execute().unwrap();
        assert!(job.worker_job().is_completed());
        assert_eq!(job.progress(), 1.0);

        let state = tracer.state.as_ref().unwrap();
        assert_eq!(state.buffer.get_pixel(0, 0).w, 1.0);
        assert_eq!(state.buffer.get_pixel(20, 12).w, 1.0);
        assert_eq!(state.buffer.get_pixel(1, 0), Vec4::ZERO);
    }

    #[test]
    fn test_out_of_range_pixels_rejected() {
        let tracer = tracer(RayTracerConfig::default().with_thread_count(1));

        assert!(matches!(
            tracer.pixel_job(vec![(0, 0), (WIDTH + 5, 0)]),
            Err(RenderError::InvalidConfig(_))
        ));
        assert!(matches!(
            tracer.pixel_job(vec![(0, HEIGHT)]),
            Err(RenderError::InvalidConfig(_))
        ));

        let mut rng = StdRng::seed_from_u64(1);
        assert!(tracer.render_pixel(WIDTH, 0, &mut rng).is_err());
        assert!(tracer.pixel_job(vec![(WIDTH - 1, HEIGHT - 1)]).is_ok());
    }
}
