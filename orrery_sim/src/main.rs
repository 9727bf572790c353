//! Orrery simulation
//!
//! Drives a small solar system through the orrery ECS at a fixed tick rate
//! and logs body positions. Stops after `--ticks` ticks or on Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::time::{self, MissedTickBehavior};

mod components;
mod config;
mod simulation;
mod systems;

use config::SimConfig;
use simulation::Simulation;

#[tokio::main]
async fn main() -> Result<()> {
    let config = SimConfig::parse();

    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .init();

    let mut sim = Simulation::new(&config)?;
    log::info!(
        "orrery running at {} Hz with {} bodies",
        config.tick_rate,
        sim.bodies().len()
    );

    let mut interval = time::interval(config.tick_interval()?);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            result = &mut shutdown => {
                result.context("failed to listen for Ctrl-C")?;
                log::info!("interrupted");
                break;
            }
        }

        sim.step()?;
        if config.is_finished(sim.world().tick_count()) {
            break;
        }
    }

    log::info!("stopped after {} ticks", sim.world().tick_count());
    Ok(())
}
