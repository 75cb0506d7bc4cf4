//! Lantern - headless progressive renderer
//!
//! Renders the built-in demo scene for a number of progressive frames and
//! writes the accumulated image as a PNG.

mod demo;

use anyhow::{Context, Result};
use clap::{App, Arg};
use lantern_core::{FrameBuffer, KdTreeConfig};
use lantern_renderer::{IntegratorKind, RayTracer, RayTracerConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

/// Settings read from the optional JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct CliConfig {
    width: u32,
    height: u32,
    /// Progressive frames to accumulate
    frames: u32,
    output: PathBuf,
    tracer: RayTracerConfig,
    kd_tree: KdTreeConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            frames: 16,
            output: PathBuf::from("output.png"),
            tracer: RayTracerConfig::default(),
            kd_tree: KdTreeConfig::default(),
        }
    }
}

fn parse_integrator(name: &str) -> Result<IntegratorKind> {
    IntegratorKind::from_str(name).with_context(|| format!("Unknown integrator '{}'", name))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let matches = App::new("lantern")
        .about("Progressive CPU ray tracer")
        .arg(
            Arg::with_name("config")
                .long("config")
                .short("c")
                .takes_value(true)
                .help("JSON settings file"),
        )
        .arg(
            Arg::with_name("integrator")
                .long("integrator")
                .takes_value(true)
                .possible_values(&["debug", "whitted", "monte_carlo"])
                .help("Surface integrator, overrides the settings file"),
        )
        .arg(
            Arg::with_name("switch-to")
                .long("switch-to")
                .takes_value(true)
                .possible_values(&["debug", "whitted", "monte_carlo"])
                .help("Switch integrator halfway through, restarting accumulation"),
        )
        .arg(
            Arg::with_name("frames")
                .long("frames")
                .short("f")
                .takes_value(true)
                .help("Number of progressive frames"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .takes_value(true)
                .help("Output PNG path"),
        )
        .get_matches();

    let mut config = match matches.value_of("config") {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
            serde_json::from_str::<CliConfig>(&text).with_context(|| format!("Failed to parse {}", path))?
        }
        None => CliConfig::default(),
    };
    if let Some(name) = matches.value_of("integrator") {
        config.tracer.integrator = parse_integrator(name)?;
    }
    if let Some(frames) = matches.value_of("frames") {
        config.frames = frames.parse().context("--frames expects a positive integer")?;
    }
    if let Some(output) = matches.value_of("output") {
        config.output = PathBuf::from(output);
    }
    let switch_to = matches.value_of("switch-to").map(parse_integrator).transpose()?;

    log::info!("Starting Lantern ({}x{}, {} frames)", config.width, config.height, config.frames);

    let context = demo::build(config.width, config.height, config.kd_tree.clone())?;
    let stats = context.scene.stats();
    log::info!(
        "Scene: {} objects, {} kd-tree nodes, {} leaves, depth {}",
        context.scene.len(),
        stats.node_count,
        stats.leaf_count,
        stats.max_depth
    );

    let buffer = Arc::new(FrameBuffer::new(config.width, config.height)?);
    let mut tracer = RayTracer::new(config.tracer.clone())?;
    tracer.bind_context(Arc::new(context), Arc::clone(&buffer))?;

    let start = Instant::now();
    let switch_frame = config.frames / 2;
    for frame in 0..config.frames {
        if frame == switch_frame {
            if let Some(kind) = switch_to {
                tracer.set_integrator(kind)?;
            }
        }
        let frame_time = tracer.render_frame()?;
        log::info!(
            "Frame {}/{}: {:.1} ms, {} samples per pixel",
            frame + 1,
            config.frames,
            frame_time.as_secs_f64() * 1000.0,
            tracer.rendered_samples()
        );
    }
    log::info!("Rendered in {:.2}s", start.elapsed().as_secs_f64());

    tracer.unbind_context();

    let image = image::RgbaImage::from_raw(config.width, config.height, buffer.to_rgba8())
        .context("Frame buffer size does not match the image")?;
    image
        .save(&config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    log::info!("Saved {}", config.output.display());

    Ok(())
}
