use std::f64::consts::PI;

use orrery_ecs::{Component, EcsError, Entity, World};

#[derive(Clone, Debug, PartialEq)]
pub struct Name(pub String);
impl Component for Name {}

/// A circular orbit around the local origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Orbit {
    /// Distance from the origin, in astronomical units.
    pub radius: f64,
    /// Simulated seconds per revolution.
    pub period: f64,
    /// Angle at time zero, in radians.
    pub phase: f64,
}
impl Component for Orbit {}

impl Orbit {
    /// Angle on the orbit after `elapsed` simulated seconds.
    pub fn angle_at(&self, elapsed: f64) -> f64 {
        self.phase + 2.0 * PI * elapsed / self.period
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocalPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}
impl Component for LocalPosition {}

/// Text drawn next to a body on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasLabel {
    pub text: String,
}
impl Component for CanvasLabel {}

// name, radius (AU), period (s), phase (rad)
const PLANETS: [(&str, f64, f64, f64); 4] = [
    ("Mercury", 0.39, 2.4, 0.0),
    ("Venus", 0.72, 6.2, PI / 3.0),
    ("Earth", 1.0, 10.0, PI),
    ("Mars", 1.52, 18.8, 3.0 * PI / 2.0),
];

/// Spawns the sun at the origin and the inner planets on their orbits.
///
/// Returns the spawned entities, sun first.
pub fn spawn_solar_system(world: &mut World) -> Result<Vec<Entity>, EcsError> {
    let mut bodies = Vec::with_capacity(PLANETS.len() + 1);

    let sun = world.create_entity();
    world.attach(sun, Name("Sun".to_string()))?;
    world.attach(sun, LocalPosition::default())?;
    bodies.push(sun);

    for (name, radius, period, phase) in PLANETS {
        let orbit = Orbit {
            radius,
            period,
            phase,
        };
        let angle = orbit.angle_at(0.0);

        let planet = world.create_entity();
        world.attach(planet, Name(name.to_string()))?;
        world.attach(
            planet,
            LocalPosition {
                x: radius * angle.cos(),
                y: radius * angle.sin(),
                z: 0.0,
            },
        )?;
        world.attach(planet, orbit)?;
        bodies.push(planet);
    }

    log::debug!("spawned {} bodies", bodies.len());
    Ok(bodies)
}
