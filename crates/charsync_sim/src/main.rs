//! # charsync-sim
//!
//! Runs a predicting client against an authoritative server over a simulated
//! link and logs how far prediction and remote rendering drift from the
//! truth.
//!
//! Prediction tunables come from the `CHARSYNC_*` environment variables; link
//! characteristics from the command line. `RUST_LOG` adjusts verbosity.

mod link;
mod mover;
mod server;
mod sim;
mod world;

use anyhow::Result;
use charsync_client::{CorrectionMode, PredictionConfig};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use link::LinkConfig;
use server::ServerConfig;
use sim::{SimConfig, Simulation};

#[derive(Parser, Debug)]
#[command(
    name = "charsync-sim",
    about = "Simulate client-side prediction against a delayed, lossy authority"
)]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// One-way link latency in milliseconds
    #[arg(long, default_value_t = 80)]
    latency_ms: u64,

    /// Additional random one-way delay, up to this many milliseconds
    #[arg(long, default_value_t = 10)]
    jitter_ms: u64,

    /// Drop every n-th message in each direction (0 keeps everything)
    #[arg(long, default_value_t = 0)]
    loss_every: u64,

    /// Blend corrections over this many milliseconds instead of snapping
    #[arg(long)]
    smooth_ms: Option<u64>,

    /// Seed for link jitter
    #[arg(long, default_value_t = 1)]
    seed: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("charsync=info".parse()?))
        .init();

    let args = Args::parse();

    let mut prediction = PredictionConfig::from_env()?;
    if let Some(blend_ms) = args.smooth_ms {
        prediction = prediction.with_correction(CorrectionMode::Smooth { blend_ms });
    }

    let uplink = LinkConfig {
        latency_ms: args.latency_ms,
        jitter_ms: args.jitter_ms,
        loss_every: args.loss_every,
        seed: args.seed,
    };
    let config = SimConfig {
        uplink,
        downlink: LinkConfig {
            seed: args.seed.wrapping_add(1),
            ..uplink
        },
        server: ServerConfig::default(),
        prediction,
    };

    info!(
        ticks = args.ticks,
        latency_ms = args.latency_ms,
        jitter_ms = args.jitter_ms,
        loss_every = args.loss_every,
        correction = ?config.prediction.correction,
        "simulation starting"
    );

    let mut simulation = Simulation::new(&config)?;
    let report = simulation.run(args.ticks);
    sim::log_report(simulation.session().id(), &report);

    let leaked = simulation.shutdown();
    if leaked > 0 {
        anyhow::bail!("{leaked} colliders still live after shutdown");
    }

    Ok(())
}
