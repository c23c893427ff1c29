//! Relax Balls entry point
//!
//! Headless runner: builds a simulation from settings and CLI overrides, runs
//! a number of frames into an in-memory surface and optionally writes the
//! last frame as a PPM image.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use relax_balls::renderer::HostSurface;
use relax_balls::sim::{DebugCommand, SimulationState};
use relax_balls::{ColorMode, Settings};

#[derive(Parser, Debug)]
#[command(version, about = "Jacobi relaxation of colliding disks")]
struct Args {
    /// JSON settings file; CLI flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frames to simulate
    #[arg(short, long, default_value_t = 60)]
    frames: u64,

    #[arg(long)]
    balls: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// "diagnostic" or "ball_color"
    #[arg(long)]
    color_mode: Option<String>,

    /// Compress multiplier applied after every frame
    #[arg(long)]
    settle: Option<f32>,

    /// Queue one debug compress before the first frame (default multiplier 5)
    #[arg(long, num_args = 0..=1, default_missing_value = "5.0", value_parser = positive_multiplier)]
    compress: Option<f32>,

    /// Write the last frame here as binary PPM
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn positive_multiplier(value: &str) -> Result<f32, String> {
    let multiplier: f32 = value.parse().map_err(|err| format!("{err}"))?;
    if multiplier.is_finite() && multiplier > 0.0 {
        Ok(multiplier)
    } else {
        Err(format!("multiplier must be positive, got {multiplier}"))
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    if let Some(balls) = args.balls {
        settings.ball_count = balls;
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(height) = args.height {
        settings.height = height;
    }
    if let Some(mode) = &args.color_mode {
        settings.color_mode =
            ColorMode::from_str(mode).ok_or_else(|| anyhow!("unknown color mode: {mode}"))?;
    }
    if let Some(settle) = args.settle {
        settings.settle_multiplier = settle;
    }

    settings.validate().context("invalid settings")?;
    Ok(settings)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let settings = load_settings(&args)?;
    log::info!("Relax Balls starting ({} frames)", args.frames);

    let mut state = SimulationState::new(&settings)?;
    if let Some(multiplier) = args.compress {
        state.enqueue(DebugCommand::Compress { multiplier });
    }

    let mut surface = HostSurface::new(settings.width, settings.height);
    let mut last = None;
    for _ in 0..args.frames {
        match state.step_frame(&mut surface) {
            Ok(report) => last = Some(report),
            Err(err) => log::warn!("{err}"),
        }
    }

    if let Some(report) = last {
        log::info!(
            "Frame {}: {} balls touching, {} at walls, max penetration {:.6}",
            report.frame,
            report.clipping_balls,
            report.clipping_walls,
            report.max_penetration
        );
    }

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        surface.write_ppm(BufWriter::new(file))?;
        log::info!("Wrote {}", path.display());
    }

    Ok(())
}
