//! # Ricochet Sim
//!
//! Headless scenario runner for the Ricochet collision core.
//!
//! Loads a TOML scenario (params, obstacles, bodies), steps it at a fixed
//! time step, logs the trajectory with `tracing` and prints a JSON summary
//! of every body's final state to stdout.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod scenario;
mod sim;

use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::scenario::Scenario;
use crate::sim::Simulation;

/// Replays a collision scenario and prints where everything ended up
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (TOML)
    scenario: PathBuf,

    /// Frames to simulate (overrides the scenario)
    #[arg(short, long)]
    frames: Option<u32>,

    /// Seconds per frame (overrides the scenario)
    #[arg(long)]
    dt: Option<f32>,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(json: bool, verbose: bool) -> Result<()> {
    let directive = if verbose { "ricochet=debug" } else { "ricochet=info" };
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
    Ok(())
}

/// Main entry point.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.json, args.verbose)?;

    info!("Ricochet sim {}", env!("CARGO_PKG_VERSION"));

    let scenario = Scenario::load(&args.scenario)?;
    let frames = args.frames.unwrap_or(scenario.frames);
    let dt = args.dt.unwrap_or(scenario.dt);
    ensure!(dt.is_finite() && dt > 0.0, "--dt must be positive, got {dt}");

    let mut sim = Simulation::new(&scenario);
    info!("World has {} static obstacles", sim.world().len());
    let summary = sim.run(frames, dt);

    for body in sim.bodies() {
        debug!("{} finished {:?} after {} contacts", body.name, body.state, body.contacts);
    }
    let anomalies: u32 = summary.bodies.iter().map(|b| b.anomalies).sum();
    info!("Finished {} frames with {} unresolved moves", sim.frame(), anomalies);

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
