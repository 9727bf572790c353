//! Space Simulation Scenario Tests
//!
//! A small solar system driven by the three systems of the simulation
//! front end: labels are added once, positions follow orbits every tick and
//! a teardown system strips the labels and unregisters itself.

use orrery_ecs::{Component, EcsError, EntityGroup, Query, System, SystemId, World};
use std::f64::consts::PI;

#[derive(Clone, Debug, PartialEq)]
struct Name(String);
impl Component for Name {}

#[derive(Clone, Debug, PartialEq)]
struct Orbit {
    radius: f64,
    period: f64,
    phase: f64,
}
impl Component for Orbit {}

#[derive(Clone, Debug, PartialEq)]
struct LocalPosition {
    x: f64,
    y: f64,
    z: f64,
}
impl Component for LocalPosition {}

#[derive(Clone, Debug, PartialEq)]
struct CanvasLabel {
    text: String,
}
impl Component for CanvasLabel {}

struct CanvasLabelAdder;

impl System for CanvasLabelAdder {
    fn queries(&self) -> Vec<Query> {
        vec![Query::new().all::<Name>().none::<CanvasLabel>()]
    }

    fn run(&mut self, groups: &[EntityGroup], world: &mut World) -> Result<(), EcsError> {
        groups[0].with::<(Name,)>().add(world, |_, (name,)| CanvasLabel {
            text: name.0.clone(),
        })?;
        Ok(())
    }
}

/// Advances a fixed time step per tick.
struct OrbitPositionUpdater {
    elapsed: f64,
    step: f64,
}

impl System for OrbitPositionUpdater {
    fn queries(&self) -> Vec<Query> {
        vec![Query::new().all::<Orbit>().all::<LocalPosition>()]
    }

    fn run(&mut self, groups: &[EntityGroup], world: &mut World) -> Result<(), EcsError> {
        self.elapsed += self.step;
        let elapsed = self.elapsed;
        groups[0]
            .with::<(Orbit,)>()
            .update(world, |position: &mut LocalPosition, _, (orbit,)| {
                let angle = orbit.phase + 2.0 * PI * elapsed / orbit.period;
                position.x = orbit.radius * angle.cos();
                position.y = orbit.radius * angle.sin();
            })
    }
}

struct CanvasLabelRemover;

impl System for CanvasLabelRemover {
    fn queries(&self) -> Vec<Query> {
        vec![Query::new().all::<CanvasLabel>()]
    }

    fn run(&mut self, groups: &[EntityGroup], world: &mut World) -> Result<(), EcsError> {
        groups[0].remove::<CanvasLabel>(world);
        Ok(())
    }

    fn after_all(&mut self, world: &mut World, id: SystemId) -> Result<(), EcsError> {
        world.remove_system(id)
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_sun_gets_labeled_once() {
    let mut world = World::new();
    let sun = world.create_entity();
    world.attach(sun, Name("Sun".to_string())).unwrap();

    let adder_query = Query::new().all::<Name>().none::<CanvasLabel>();
    assert!(world.query(&adder_query).contains(sun));

    world.add_system(CanvasLabelAdder);
    world.tick().unwrap();

    assert!(world.has::<Name>(sun));
    assert_eq!(
        world.get::<CanvasLabel>(sun),
        Some(&CanvasLabel {
            text: "Sun".to_string()
        })
    );
    assert!(!world.query(&adder_query).contains(sun));

    // relabeling by hand is not overwritten by later ticks
    world.get_mut::<CanvasLabel>(sun).unwrap().text = "Sol".to_string();
    world.tick().unwrap();
    assert_eq!(world.get::<CanvasLabel>(sun).unwrap().text, "Sol");
}

#[test]
fn test_orbit_updater_only_touches_position() {
    let mut world = World::new();
    let earth = world.create_entity();
    let orbit = Orbit {
        radius: 10.0,
        period: 4.0,
        phase: 0.0,
    };
    world.attach(earth, orbit.clone()).unwrap();
    world
        .attach(
            earth,
            LocalPosition {
                x: 0.0,
                y: 0.0,
                z: 7.0,
            },
        )
        .unwrap();

    world.add_system(OrbitPositionUpdater {
        elapsed: 0.0,
        step: 1.0,
    });

    // a quarter period: angle is pi/2
    world.tick().unwrap();
    let position = world.get::<LocalPosition>(earth).unwrap();
    assert!(close(position.x, 0.0));
    assert!(close(position.y, 10.0));
    assert_eq!(position.z, 7.0);
    assert_eq!(world.get::<Orbit>(earth), Some(&orbit));

    // half a period: angle is pi
    world.tick().unwrap();
    let position = world.get::<LocalPosition>(earth).unwrap();
    assert!(close(position.x, -10.0));
    assert!(close(position.y, 0.0));
    assert_eq!(position.z, 7.0);
}

#[test]
fn test_label_remover_tears_down_and_unregisters() {
    let mut world = World::new();
    let bodies: Vec<_> = ["Sun", "Earth", "Moon"]
        .iter()
        .map(|name| {
            let entity = world.create_entity();
            world.attach(entity, Name(name.to_string())).unwrap();
            entity
        })
        .collect();

    let adder = world.add_system(CanvasLabelAdder);
    world.tick().unwrap();
    assert_eq!(world.query(&Query::new().all::<CanvasLabel>()).len(), 3);

    // labels are switched off: swap the adder for the remover
    world.remove_system(adder).unwrap();
    let remover = world.add_system(CanvasLabelRemover);

    world.tick().unwrap();
    for &entity in &bodies {
        assert!(!world.has::<CanvasLabel>(entity));
        assert!(world.has::<Name>(entity));
    }
    assert!(!world.has_system(remover));
    assert_eq!(world.system_count(), 0);

    // labels attached later are left alone
    world
        .attach(
            bodies[0],
            CanvasLabel {
                text: "Sun".to_string(),
            },
        )
        .unwrap();
    world.tick().unwrap();
    assert!(world.has::<CanvasLabel>(bodies[0]));
}

#[test]
fn test_destroyed_body_drops_out_of_every_system() {
    let mut world = World::new();
    let sun = world.create_entity();
    let earth = world.create_entity();
    world.attach(sun, Name("Sun".to_string())).unwrap();
    world.attach(earth, Name("Earth".to_string())).unwrap();
    world
        .attach(
            earth,
            Orbit {
                radius: 1.0,
                period: 8.0,
                phase: 0.0,
            },
        )
        .unwrap();
    world
        .attach(
            earth,
            LocalPosition {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            },
        )
        .unwrap();

    world.add_system(CanvasLabelAdder);
    world.add_system(OrbitPositionUpdater {
        elapsed: 0.0,
        step: 1.0,
    });
    world.tick().unwrap();

    let labeled = Query::new().all::<CanvasLabel>();
    let orbiting = Query::new().all::<Orbit>().all::<LocalPosition>();
    assert_eq!(world.query(&labeled).entities(), &[sun, earth]);

    world.destroy_entity(earth).unwrap();
    world.tick().unwrap();

    assert_eq!(world.query(&labeled).entities(), &[sun]);
    assert!(world.query(&orbiting).is_empty());
    assert!(world.query(&Query::new()).iter().all(|entity| entity == sun));
}

#[test]
fn test_full_session() {
    let mut world = World::new();
    let sun = world.create_entity();
    world.attach(sun, Name("Sun".to_string())).unwrap();
    world
        .attach(
            sun,
            LocalPosition {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
        )
        .unwrap();

    let mars = world.create_entity();
    world.attach(mars, Name("Mars".to_string())).unwrap();
    world
        .attach(
            mars,
            Orbit {
                radius: 2.0,
                period: 10.0,
                phase: PI,
            },
        )
        .unwrap();
    world
        .attach(
            mars,
            LocalPosition {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
        )
        .unwrap();

    let adder = world.add_system(CanvasLabelAdder);
    world.add_system(OrbitPositionUpdater {
        elapsed: 0.0,
        step: 1.0,
    });

    for _ in 0..10 {
        world.tick().unwrap();
    }

    // a full period brings Mars back to its phase
    let position = world.get::<LocalPosition>(mars).unwrap();
    assert!(close(position.x, -2.0));
    assert!(close(position.y, 0.0));
    // the sun has no orbit and stays put
    assert_eq!(
        world.get::<LocalPosition>(sun),
        Some(&LocalPosition {
            x: 0.0,
            y: 0.0,
            z: 0.0
        })
    );

    world.remove_system(adder).unwrap();
    world.add_system(CanvasLabelRemover);
    world.tick().unwrap();

    assert!(world.query(&Query::new().all::<CanvasLabel>()).is_empty());
    assert_eq!(world.system_count(), 1);
    assert_eq!(world.tick_count(), 11);
}
