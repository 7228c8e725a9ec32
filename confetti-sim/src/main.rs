//! Confetti - Headless Simulator
//!
//! Runs bursts against an in-memory surface, one frame per loop iteration,
//! and reports how the animation evolved. Useful for checking option sets
//! and burst coalescing without a browser.

use anyhow::Context;
use clap::Parser;
use confetti_common::core::{ConfettiOptions, OriginOptions};
use confetti_common::paint::RecordingProvider;
use confetti_common::scheduler::QueuedScheduler;
use confetti_common::Launcher;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::PathBuf;

// ── CLI Arguments ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug, Clone)]
#[command(name = "confetti-sim", about = "Headless confetti simulator")]
pub struct Args {
    /// Debug logging
    #[arg(long)]
    pub debug: bool,

    /// JSON file with burst options; flags below override it
    #[arg(long)]
    pub options: Option<PathBuf>,

    #[arg(long)]
    pub particle_count: Option<f64>,

    /// Launch angle in degrees
    #[arg(long)]
    pub angle: Option<f64>,

    /// Spread in degrees
    #[arg(long)]
    pub spread: Option<f64>,

    #[arg(long)]
    pub start_velocity: Option<f64>,

    #[arg(long)]
    pub decay: Option<f64>,

    #[arg(long)]
    pub ticks: Option<f64>,

    /// Horizontal origin as a fraction of the width
    #[arg(long)]
    pub origin_x: Option<f64>,

    /// Vertical origin as a fraction of the height
    #[arg(long)]
    pub origin_y: Option<f64>,

    #[arg(long)]
    pub z_index: Option<f64>,

    /// Comma separated hex colors
    #[arg(long, value_delimiter = ',')]
    pub colors: Option<Vec<String>>,

    /// Number of bursts to fire
    #[arg(long, default_value_t = 1)]
    pub bursts: usize,

    /// Frames between consecutive bursts
    #[arg(long, default_value_t = 10)]
    pub burst_interval: usize,

    /// Surface width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Surface height in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Random seed
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Give up after this many frames
    #[arg(long, default_value_t = 100_000)]
    pub max_frames: usize,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Options file (if any) overlaid with the explicit flags.
    fn burst_options(&self) -> anyhow::Result<ConfettiOptions> {
        let mut options = match &self.options {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {:?}", path))?;
                let value: serde_json::Value = serde_json::from_str(&text)
                    .with_context(|| format!("failed to parse {:?}", path))?;
                ConfettiOptions::deserialize_lenient(value)?
            }
            None => ConfettiOptions::default(),
        };

        let origin = (self.origin_x.is_some() || self.origin_y.is_some()).then_some(
            OriginOptions {
                x: self.origin_x,
                y: self.origin_y,
            },
        );
        options.merge(ConfettiOptions {
            particle_count: self.particle_count,
            angle: self.angle,
            spread: self.spread,
            start_velocity: self.start_velocity,
            decay: self.decay,
            ticks: self.ticks,
            origin,
            z_index: self.z_index,
            colors: self.colors.clone(),
        });
        Ok(options)
    }
}

// ── Report ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Report {
    bursts: usize,
    frames: usize,
    surfaces_created: usize,
    surfaces_released: usize,
    quads_painted: usize,
    peak_live: usize,
    /// Live particles after each frame
    live_per_frame: Vec<usize>,
}

fn simulate(args: &Args) -> anyhow::Result<Report> {
    let options = args.burst_options()?;
    let provider = RecordingProvider::new(args.width, args.height).counting_only();
    let scheduler = QueuedScheduler::new();
    let launcher = Launcher::new(
        provider.clone(),
        scheduler.clone(),
        StdRng::seed_from_u64(args.seed),
    );

    let mut live_per_frame = Vec::new();
    let mut launched = 0;
    while live_per_frame.len() < args.max_frames {
        let frame = live_per_frame.len();
        let due = !launcher.is_running() || frame >= launched * args.burst_interval;
        if launched < args.bursts && due {
            launcher.launch(&options)?;
            launched += 1;
            log::debug!("frame {}: burst {} fired", frame, launched);
        }

        if scheduler.run_pending() == 0 {
            break;
        }
        live_per_frame.push(launcher.live_particles());
    }

    if launcher.is_running() {
        log::warn!(
            "stopped after {} frames with {} particles still alive",
            live_per_frame.len(),
            launcher.live_particles()
        );
    }

    let paint_log = provider.log();
    Ok(Report {
        bursts: launched,
        frames: live_per_frame.len(),
        surfaces_created: paint_log.created,
        surfaces_released: paint_log.released,
        quads_painted: paint_log.fills,
        peak_live: live_per_frame.iter().copied().max().unwrap_or(0),
        live_per_frame,
    })
}

// ── Main ───────────────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    log::info!("Confetti simulator: {}x{} surface, seed {}", args.width, args.height, args.seed);
    let report = simulate(&args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        log::info!(
            "{} bursts, {} frames, {} quads painted, peak {} live",
            report.bursts,
            report.frames,
            report.quads_painted,
            report.peak_live
        );
        log::info!(
            "surfaces created: {}, released: {}",
            report.surfaces_created,
            report.surfaces_released
        );
    }
    Ok(())
}
