use orrery_ecs::{EcsError, EntityGroup, Query, System, SystemId, World};

use crate::components::{CanvasLabel, LocalPosition, Name, Orbit};

/// Gives every named body a canvas label, once.
pub struct CanvasLabelAdder;

impl System for CanvasLabelAdder {
    fn queries(&self) -> Vec<Query> {
        vec![Query::new().all::<Name>().none::<CanvasLabel>()]
    }

    fn run(&mut self, groups: &[EntityGroup], world: &mut World) -> Result<(), EcsError> {
        let added = groups[0]
            .with::<(Name,)>()
            .add(world, |_, (name,)| CanvasLabel {
                text: name.0.clone(),
            })?;
        if added > 0 {
            log::debug!("labeled {} bodies", added);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "CanvasLabelAdder"
    }
}

/// Moves orbiting bodies along their orbit in the x/y plane.
pub struct OrbitPositionUpdater {
    elapsed: f64,
    step: f64,
}

impl OrbitPositionUpdater {
    /// `step` is the simulated time that passes per tick, in seconds.
    pub fn new(step: f64) -> Self {
        Self { elapsed: 0.0, step }
    }
}

impl System for OrbitPositionUpdater {
    fn queries(&self) -> Vec<Query> {
        vec![Query::new().all::<Orbit>().all::<LocalPosition>()]
    }

    fn run(&mut self, groups: &[EntityGroup], world: &mut World) -> Result<(), EcsError> {
        let elapsed = self.elapsed + self.step;
        groups[0]
            .with::<(Orbit,)>()
            .update(world, |position: &mut LocalPosition, _, (orbit,)| {
                let angle = orbit.angle_at(elapsed);
                position.x = orbit.radius * angle.cos();
                position.y = orbit.radius * angle.sin();
            })
    }

    // chunked runs share one time step
    fn after_all(&mut self, _world: &mut World, _id: SystemId) -> Result<(), EcsError> {
        self.elapsed += self.step;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "OrbitPositionUpdater"
    }
}

/// Strips every canvas label, then unregisters itself.
pub struct CanvasLabelRemover;

impl System for CanvasLabelRemover {
    fn queries(&self) -> Vec<Query> {
        vec![Query::new().all::<CanvasLabel>()]
    }

    fn run(&mut self, groups: &[EntityGroup], world: &mut World) -> Result<(), EcsError> {
        let removed = groups[0].remove::<CanvasLabel>(world);
        log::debug!("removed {} canvas labels", removed);
        Ok(())
    }

    fn after_all(&mut self, world: &mut World, id: SystemId) -> Result<(), EcsError> {
        log::info!("canvas labels torn down");
        world.remove_system(id)
    }

    fn name(&self) -> &'static str {
        "CanvasLabelRemover"
    }
}

/// Logs the position of every named body every `every` ticks.
pub struct PositionReporter {
    every: u64,
    ticks: u64,
}

impl PositionReporter {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            ticks: 0,
        }
    }
}

impl System for PositionReporter {
    fn queries(&self) -> Vec<Query> {
        vec![Query::new().all::<Name>().all::<LocalPosition>()]
    }

    fn run(&mut self, groups: &[EntityGroup], world: &mut World) -> Result<(), EcsError> {
        if self.ticks % self.every != 0 {
            return Ok(());
        }
        for entity in groups[0].iter() {
            if let (Some(name), Some(position)) =
                (world.get::<Name>(entity), world.get::<LocalPosition>(entity))
            {
                let label = world
                    .get::<CanvasLabel>(entity)
                    .map_or("-", |label| label.text.as_str());
                log::info!(
                    "{:<8} ({:>6.3}, {:>6.3}) label: {}",
                    name.0,
                    position.x,
                    position.y,
                    label
                );
            }
        }
        Ok(())
    }

    fn after_all(&mut self, _world: &mut World, _id: SystemId) -> Result<(), EcsError> {
        self.ticks += 1;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "PositionReporter"
    }
}
