use std::time::Duration;

use anyhow::{ensure, Result};
use clap::Parser;
use log::LevelFilter;
use orrery_ecs::WorldConfig;

/// Command line options of the simulation.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "orrery_sim")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Headless orrery driven by the orrery ECS", long_about = None)]
pub struct SimConfig {
    /// Ticks per second
    #[arg(long, default_value_t = 10)]
    pub tick_rate: u32,

    /// Number of ticks to run (0 runs until Ctrl-C)
    #[arg(long, default_value_t = 50)]
    pub ticks: u64,

    /// Tick after which canvas labels are torn down
    #[arg(long, default_value_t = 20)]
    pub labels_until: u64,

    /// Split groups into chunks of this many entities
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl SimConfig {
    /// Wall-clock time between two ticks.
    pub fn tick_interval(&self) -> Result<Duration> {
        ensure!(self.tick_rate > 0, "tick rate must be at least 1 Hz");
        Ok(Duration::from_secs_f64(1.0 / f64::from(self.tick_rate)))
    }

    pub fn world_config(&self) -> WorldConfig {
        match self.chunk_size {
            Some(size) => WorldConfig::new().chunk_size(size),
            None => WorldConfig::new(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// Whether the run loop should stop after `tick_count` ticks.
    pub fn is_finished(&self, tick_count: u64) -> bool {
        self.ticks != 0 && tick_count >= self.ticks
    }
}
