use crate::{EcsError, EntityGroup, System, SystemId};

use super::World;

struct SystemEntry {
    id: SystemId,
    system: Box<dyn System>,
}

/// The active system list plus the changes queued while a tick is running.
pub(super) struct Schedule {
    systems: Vec<SystemEntry>,
    next_id: u64,
    tick_count: u64,
    // ids taking part in the pass in progress; empty outside a tick
    running: Option<Vec<SystemId>>,
    pending_add: Vec<SystemEntry>,
    pending_remove: Vec<SystemId>,
}

impl Schedule {
    pub(super) fn new() -> Self {
        Self {
            systems: Vec::new(),
            next_id: 0,
            tick_count: 0,
            running: None,
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
        }
    }
}

impl World {
    /// Registers a system and returns its id.
    ///
    /// Systems run in registration order. A system added while a tick is in
    /// progress joins the list once that tick's pass is over, so its first
    /// run happens on the next tick.
    pub fn add_system<S: System>(&mut self, system: S) -> SystemId {
        let id = SystemId(self.schedule.next_id);
        self.schedule.next_id += 1;

        log::debug!("adding system {} ({})", id, system.name());
        let entry = SystemEntry {
            id,
            system: Box::new(system),
        };
        if self.schedule.running.is_some() {
            self.schedule.pending_add.push(entry);
        } else {
            self.schedule.systems.push(entry);
        }
        id
    }

    /// Unregisters a system.
    ///
    /// Called during a tick, the removal takes effect once every system of
    /// the pass has run and every `after_all` has been called; the removed
    /// system is not interrupted.
    ///
    /// # Errors
    /// [`EcsError::SystemNotFound`] if no system with this id is registered.
    pub fn remove_system(&mut self, id: SystemId) -> Result<(), EcsError> {
        let schedule = &mut self.schedule;

        let is_running = match &schedule.running {
            Some(running) => running.contains(&id),
            None => {
                let position = schedule
                    .systems
                    .iter()
                    .position(|entry| entry.id == id)
                    .ok_or(EcsError::SystemNotFound(id))?;
                let entry = schedule.systems.remove(position);
                log::debug!("removed system {} ({})", id, entry.system.name());
                return Ok(());
            }
        };

        if let Some(position) = schedule.pending_add.iter().position(|entry| entry.id == id) {
            schedule.pending_add.remove(position);
            log::debug!("cancelled pending system {}", id);
            return Ok(());
        }

        if !is_running {
            return Err(EcsError::SystemNotFound(id));
        }
        if !schedule.pending_remove.contains(&id) {
            schedule.pending_remove.push(id);
        }
        Ok(())
    }

    /// Returns `true` if the system is registered and not queued for removal.
    pub fn has_system(&self, id: SystemId) -> bool {
        let schedule = &self.schedule;
        match &schedule.running {
            Some(running) => {
                (running.contains(&id) && !schedule.pending_remove.contains(&id))
                    || schedule.pending_add.iter().any(|entry| entry.id == id)
            }
            None => schedule.systems.iter().any(|entry| entry.id == id),
        }
    }

    /// Number of registered systems, counting queued changes.
    pub fn system_count(&self) -> usize {
        let schedule = &self.schedule;
        match &schedule.running {
            Some(running) => {
                running.len() + schedule.pending_add.len() - schedule.pending_remove.len()
            }
            None => schedule.systems.len(),
        }
    }

    /// Number of ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.schedule.tick_count
    }

    /// Runs one pass of every active system.
    ///
    /// For each system, in registration order, the world evaluates its
    /// queries and calls [`System::run`] with the resulting groups. Once every
    /// system has run, [`System::after_all`] is called on each of them, in the
    /// same order. Systems added or removed during the pass are applied at
    /// the end of it.
    ///
    /// # Errors
    /// [`EcsError::TickInProgress`] if called from a system while a tick is
    /// running; the running tick is left untouched.
    ///
    /// The first error returned by a system aborts the pass. Queued system
    /// changes are still applied before the error is returned.
    ///
    /// # Example
    /// ```
    /// use orrery_ecs::{EcsError, EntityGroup, Query, System, SystemId, World};
    ///
    /// struct OneShot;
    ///
    /// impl System for OneShot {
    ///     fn queries(&self) -> Vec<Query> {
    ///         vec![Query::new()]
    ///     }
    ///
    ///     fn run(&mut self, _groups: &[EntityGroup], _world: &mut World) -> Result<(), EcsError> {
    ///         Ok(())
    ///     }
    ///
    ///     fn after_all(&mut self, world: &mut World, id: SystemId) -> Result<(), EcsError> {
    ///         world.remove_system(id)
    ///     }
    /// }
    ///
    /// let mut world = World::new();
    /// let id = world.add_system(OneShot);
    ///
    /// world.tick().unwrap();
    /// assert!(!world.has_system(id));
    /// assert_eq!(world.tick_count(), 1);
    /// ```
    pub fn tick(&mut self) -> Result<(), EcsError> {
        if self.schedule.running.is_some() {
            return Err(EcsError::TickInProgress);
        }

        let mut systems = std::mem::take(&mut self.schedule.systems);
        self.schedule.running = Some(systems.iter().map(|entry| entry.id).collect());
        log::trace!(
            "tick {} with {} systems",
            self.schedule.tick_count,
            systems.len()
        );

        let result = self.run_pass(&mut systems);

        self.schedule.running = None;
        let removed = std::mem::take(&mut self.schedule.pending_remove);
        systems.retain(|entry| {
            let keep = !removed.contains(&entry.id);
            if !keep {
                log::debug!("removed system {} ({})", entry.id, entry.system.name());
            }
            keep
        });
        systems.append(&mut self.schedule.pending_add);
        self.schedule.systems = systems;
        self.schedule.tick_count += 1;

        if let Err(err) = &result {
            log::warn!("tick {} aborted: {}", self.schedule.tick_count - 1, err);
        }
        result
    }

    fn run_pass(&mut self, systems: &mut [SystemEntry]) -> Result<(), EcsError> {
        for entry in systems.iter_mut() {
            let groups: Vec<EntityGroup> = entry
                .system
                .queries()
                .iter()
                .map(|query| self.query(query))
                .collect();
            self.run_chunked(entry, &groups)?;
        }

        for entry in systems.iter_mut() {
            entry.system.after_all(self, entry.id)?;
        }
        Ok(())
    }

    /// Calls `run` once per chunk index, chunk `i` of every group together.
    fn run_chunked(&mut self, entry: &mut SystemEntry, groups: &[EntityGroup]) -> Result<(), EcsError> {
        let chunk_size = self.config.chunk_size;
        let chunked: Vec<Vec<EntityGroup>> = groups.iter().map(|group| group.chunks(chunk_size)).collect();
        let passes = chunked.iter().map(Vec::len).max().unwrap_or(1);

        for index in 0..passes {
            let slice: Vec<EntityGroup> = chunked
                .iter()
                .map(|chunks| chunks.get(index).cloned().unwrap_or_default())
                .collect();
            log::trace!(
                "running {} ({}/{}) on {} entities",
                entry.system.name(),
                index + 1,
                passes,
                slice.iter().map(EntityGroup::len).sum::<usize>()
            );
            entry.system.run(&slice, self)?;
        }
        Ok(())
    }
}
