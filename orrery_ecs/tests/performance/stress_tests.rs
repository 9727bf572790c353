//! Stress Integration Tests
//!
//! Tests that push the world with many entities, heavy churn and many
//! ticks, checking that bookkeeping stays consistent under load.

use orrery_ecs::{Component, EcsError, Entity, EntityGroup, Query, System, World, WorldConfig};
use std::time::Instant;

#[derive(Clone, Debug, PartialEq)]
struct LocalPosition {
    x: f64,
    y: f64,
}
impl Component for LocalPosition {}

#[derive(Clone, Debug, PartialEq)]
struct Velocity {
    dx: f64,
    dy: f64,
}
impl Component for Velocity {}

#[derive(Clone, Debug, PartialEq)]
struct Lifetime {
    ticks: u32,
}
impl Component for Lifetime {}

#[derive(Clone, Debug, PartialEq)]
struct Debris;
impl Component for Debris {}

struct Movement;

impl System for Movement {
    fn queries(&self) -> Vec<Query> {
        vec![Query::new().all::<LocalPosition>().all::<Velocity>()]
    }

    fn run(&mut self, groups: &[EntityGroup], world: &mut World) -> Result<(), EcsError> {
        groups[0]
            .with::<(Velocity,)>()
            .update(world, |position: &mut LocalPosition, _, (velocity,)| {
                position.x += velocity.dx;
                position.y += velocity.dy;
            })
    }
}

/// Ages debris and destroys it when its lifetime runs out.
struct Decay;

impl System for Decay {
    fn queries(&self) -> Vec<Query> {
        vec![Query::new().all::<Debris>().all::<Lifetime>()]
    }

    fn run(&mut self, groups: &[EntityGroup], world: &mut World) -> Result<(), EcsError> {
        groups[0].update(world, |lifetime: &mut Lifetime, _| {
            lifetime.ticks = lifetime.ticks.saturating_sub(1)
        })?;

        let expired: Vec<Entity> = groups[0]
            .iter()
            .filter(|&entity| world.get::<Lifetime>(entity).is_some_and(|l| l.ticks == 0))
            .collect();
        for entity in expired {
            world.destroy_entity(entity)?;
        }
        Ok(())
    }
}

/// Spawns a fixed amount of debris every tick.
struct Spawner {
    per_tick: usize,
    lifetime: u32,
}

impl System for Spawner {
    fn queries(&self) -> Vec<Query> {
        Vec::new()
    }

    fn run(&mut self, _groups: &[EntityGroup], world: &mut World) -> Result<(), EcsError> {
        for _ in 0..self.per_tick {
            let entity = world.create_entity();
            world.attach(entity, Debris)?;
            world.attach(
                entity,
                Lifetime {
                    ticks: self.lifetime,
                },
            )?;
        }
        Ok(())
    }
}

fn moving_world(count: usize, config: WorldConfig) -> (World, Vec<Entity>) {
    let mut world = World::with_config(config);
    let entities = (0..count)
        .map(|i| {
            let entity = world.create_entity();
            world
                .attach(entity, LocalPosition { x: 0.0, y: 0.0 })
                .unwrap();
            world
                .attach(
                    entity,
                    Velocity {
                        dx: i as f64,
                        dy: 1.0,
                    },
                )
                .unwrap();
            entity
        })
        .collect();
    (world, entities)
}

#[test]
fn test_large_entity_count_stress() {
    let start = Instant::now();
    let (mut world, entities) = moving_world(10_000, WorldConfig::default());
    world.add_system(Movement);

    for _ in 0..10 {
        world.tick().unwrap();
    }

    assert_eq!(world.entity_count(), 10_000);
    for (i, &entity) in entities.iter().enumerate().step_by(997) {
        let position = world.get::<LocalPosition>(entity).unwrap();
        assert_eq!(position.x, i as f64 * 10.0);
        assert_eq!(position.y, 10.0);
    }
    println!("10k entities x 10 ticks: {:?}", start.elapsed());
}

#[test]
fn test_chunked_and_whole_runs_agree() {
    let (mut whole, whole_entities) = moving_world(1_000, WorldConfig::default());
    let (mut chunked, chunked_entities) = moving_world(1_000, WorldConfig::new().chunk_size(64));
    whole.add_system(Movement);
    chunked.add_system(Movement);

    for _ in 0..5 {
        whole.tick().unwrap();
        chunked.tick().unwrap();
    }

    for (a, b) in whole_entities.iter().zip(&chunked_entities) {
        assert_eq!(whole.get::<LocalPosition>(*a), chunked.get::<LocalPosition>(*b));
    }
}

#[test]
fn test_rapid_creation_deletion_stress() {
    let mut world = World::new();

    for round in 0..100u32 {
        let batch: Vec<Entity> = (0..100).map(|_| world.create_entity()).collect();
        for &entity in &batch {
            world.attach(entity, Lifetime { ticks: round }).unwrap();
        }
        for &entity in &batch {
            world.destroy_entity(entity).unwrap();
        }
    }

    // every round reused the same hundred slots
    assert_eq!(world.entity_count(), 0);
    let entity = world.create_entity();
    assert!(entity.index() < 100);
    assert_eq!(entity.generation(), 100);
    assert!(!world.has::<Lifetime>(entity));
    assert!(world.query(&Query::new().all::<Lifetime>()).is_empty());
}

#[test]
fn test_steady_state_debris_churn() {
    let mut world = World::new();
    world.add_system(Spawner {
        per_tick: 50,
        lifetime: 4,
    });
    world.add_system(Decay);

    for _ in 0..200 {
        world.tick().unwrap();
    }

    // spawned in tick t, destroyed in tick t+3: four cohorts minus the one
    // that expired this tick
    assert_eq!(world.entity_count(), 150);
    let debris = world.query(&Query::new().all::<Debris>());
    assert_eq!(debris.len(), 150);
    assert!(debris
        .iter()
        .all(|entity| world.get::<Lifetime>(entity).unwrap().ticks > 0));

    // slots are recycled, the table never grows past a few cohorts
    let highest = world.entities().map(Entity::index).max().unwrap();
    assert!(highest < 250, "slot {highest} suggests leaked entities");
}

#[test]
fn test_component_churn_stress() {
    let (mut world, entities) = moving_world(2_000, WorldConfig::default());
    let moving = Query::new().all::<LocalPosition>().all::<Velocity>();

    for round in 0..20 {
        for (i, &entity) in entities.iter().enumerate() {
            if (i + round) % 2 == 0 {
                world.detach::<Velocity>(entity).unwrap();
            } else {
                world.attach(entity, Velocity { dx: 1.0, dy: 0.0 }).unwrap();
            }
        }
        assert_eq!(world.query(&moving).len(), 1_000);
    }
}

#[test]
fn test_many_queries_over_shared_world() {
    let mut world = World::new();
    for i in 0..3_000 {
        let entity = world.create_entity();
        if i % 2 == 0 {
            world.attach(entity, LocalPosition { x: 0.0, y: 0.0 }).unwrap();
        }
        if i % 3 == 0 {
            world.attach(entity, Velocity { dx: 0.0, dy: 0.0 }).unwrap();
        }
        if i % 5 == 0 {
            world.attach(entity, Debris).unwrap();
        }
    }

    let both = world.query(&Query::new().all::<LocalPosition>().all::<Velocity>());
    let either = world.query(&Query::new().any::<LocalPosition>().any::<Velocity>());
    let still = world.query(&Query::new().all::<LocalPosition>().none::<Velocity>());
    let clean = world.query(&Query::new().none::<Debris>());

    assert_eq!(both.len(), 500);
    assert_eq!(either.len(), 2_000);
    assert_eq!(still.len(), 1_000);
    assert_eq!(clean.len(), 2_400);
    assert!(both.entities().windows(2).all(|w| w[0] < w[1]));
}
