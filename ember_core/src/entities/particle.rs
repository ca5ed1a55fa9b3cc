use rand::Rng;
use ultraviolet::Vec2;

use crate::components::{CParticle, CParticleColor, CParticleState, ParticleSettings};
use crate::helpers::uniform_between;

/// Spawn one particle at `origin` with a uniform random velocity per axis
/// between the start velocity bounds (taken in either order), and a uniform
/// random lifespan from the settings range.
pub fn spawn_particle_entity(
    world: &mut hecs::World,
    origin: Vec2,
    settings: ParticleSettings,
    min_start_vel: Vec2,
    max_start_vel: Vec2,
    clock: f64,
    rng: &mut impl Rng,
) -> hecs::Entity {
    let vel = Vec2 {
        x: uniform_between(rng, min_start_vel.x, max_start_vel.x),
        y: uniform_between(rng, min_start_vel.y, max_start_vel.y),
    };
    let lifespan = uniform_between(rng, settings.min_lifespan, settings.max_lifespan);

    world.spawn((
        CParticle {
            spawned_at: clock,
            lifespan,
            settings,
        },
        CParticleState {
            pos: origin,
            vel,
            mass: settings.start_mass,
        },
        CParticleColor {
            color: settings.start_color,
            opacity: settings.start_opacity,
        },
    ))
}
