use std::fmt;

/// A unique identifier for entities in the ECS system.
///
/// Entities represent simulation objects like stars, planets, moons or
/// labels. An entity is only a handle: the [`World`](crate::World) maps it to
/// its components.
///
/// Identifiers are generational. The slot index of a destroyed entity is
/// recycled, but its generation is bumped, so a stale handle never refers to
/// a newer entity.
///
/// # Examples
///
/// ```
/// use orrery_ecs::World;
///
/// let mut world = World::new();
/// let sun = world.create_entity();
/// let earth = world.create_entity();
///
/// assert_ne!(sun, earth);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Returns the slot index of this entity.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation of this entity's slot.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Hands out entity identifiers and recycles the slots of destroyed ones.
pub(crate) struct EntityAllocator {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free_list: Vec<u32>,
    live: usize,
}

impl EntityAllocator {
    pub(crate) fn new() -> Self {
        Self {
            generations: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    pub(crate) fn allocate(&mut self) -> Entity {
        self.live += 1;

        if let Some(index) = self.free_list.pop() {
            // generation was bumped when the slot was freed
            self.alive[index as usize] = true;
            return Entity {
                index,
                generation: self.generations[index as usize],
            };
        }

        let index = self.generations.len() as u32;
        self.generations.push(0);
        self.alive.push(true);
        Entity {
            index,
            generation: 0,
        }
    }

    /// Frees the slot of `entity`. Returns `false` if the handle was stale.
    pub(crate) fn deallocate(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        let slot = entity.index as usize;
        self.alive[slot] = false;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free_list.push(entity.index);
        self.live -= 1;
        true
    }

    pub(crate) fn is_alive(&self, entity: Entity) -> bool {
        let slot = entity.index as usize;
        slot < self.generations.len()
            && self.alive[slot]
            && self.generations[slot] == entity.generation
    }

    /// Returns the live entity occupying slot `index`, if any.
    pub(crate) fn entity_at(&self, index: u32) -> Option<Entity> {
        let slot = index as usize;
        (slot < self.alive.len() && self.alive[slot]).then(|| Entity {
            index,
            generation: self.generations[slot],
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }

    /// Iterates live entities in ascending slot order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(slot, _)| Entity {
                index: slot as u32,
                generation: self.generations[slot],
            })
    }
}
