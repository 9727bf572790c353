use anyhow::{Context, Result};
use orrery_ecs::{Entity, SystemId, World};

use crate::components::spawn_solar_system;
use crate::config::SimConfig;
use crate::systems::{CanvasLabelAdder, CanvasLabelRemover, OrbitPositionUpdater, PositionReporter};

/// A populated world plus the schedule changes the run loop applies.
pub struct Simulation {
    world: World,
    bodies: Vec<Entity>,
    label_adder: Option<SystemId>,
    labels_until: u64,
}

impl Simulation {
    pub fn new(config: &SimConfig) -> Result<Self> {
        let mut world = World::with_config(config.world_config());
        let bodies = spawn_solar_system(&mut world).context("failed to spawn the solar system")?;

        let label_adder = world.add_system(CanvasLabelAdder);
        world.add_system(OrbitPositionUpdater::new(
            config.tick_interval()?.as_secs_f64(),
        ));
        world.add_system(PositionReporter::new(u64::from(config.tick_rate)));

        Ok(Self {
            world,
            bodies,
            label_adder: Some(label_adder),
            labels_until: config.labels_until,
        })
    }

    /// Runs one tick. Once `labels_until` ticks have passed, the label adder
    /// is swapped for the label remover.
    pub fn step(&mut self) -> Result<()> {
        let tick = self.world.tick_count();
        self.world
            .tick()
            .with_context(|| format!("tick {tick} failed"))?;

        if self.world.tick_count() >= self.labels_until {
            if let Some(adder) = self.label_adder.take() {
                self.world.remove_system(adder)?;
                self.world.add_system(CanvasLabelRemover);
                log::info!("tick {}: tearing down canvas labels", self.world.tick_count());
            }
        }
        Ok(())
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn bodies(&self) -> &[Entity] {
        &self.bodies
    }
}
