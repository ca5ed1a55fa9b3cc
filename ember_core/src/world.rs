use std::time::Duration;

use anyhow::Result;
use ember_config::{Effect, EffectConfig};
use rand::{rngs::StdRng, SeedableRng};
use ultraviolet::Vec2;

use crate::{
    components::{CEmitter, CParticle, CParticleColor, CParticleState, ParticleSettings},
    cvars::{CVarValue, CVarsMap, DEFAULT_CVARS},
    entities::{init_emitter_entity, spawn_particle_entity},
    helpers::lerp,
    ChangedSet, Stopwatch,
};

pub struct World {
    pub config: EffectConfig,

    /// Actual simulation state is maintained in the ECS "world".
    pub world: hecs::World,
    pub emitter: hecs::Entity,

    /// User-added forces, in N. The cvar-controlled gravity is applied on
    /// top of these every tick.
    pub forces: Vec<Vec2>,

    /// Hard cap on live particles; `emit` stops silently once it is reached.
    pub max_count: usize,

    /// Simulation clock in seconds. Does not advance while paused.
    pub clock: f64,
    pub paused: bool,

    /// Entities spawned/changed/removed this tick, consumed by the renderer
    /// between `think` and `think_end`.
    pub changed_set: ChangedSet<hecs::Entity>,

    pub cvars: CVarsMap,

    rng: StdRng,
}

impl World {
    pub fn new(effect: Effect, emitter_pos: Vec2) -> Result<Self> {
        let config = EffectConfig::from_effect(effect)?;
        Self::new_with_config(config, emitter_pos)
    }

    pub fn new_with_config(config: EffectConfig, emitter_pos: Vec2) -> Result<Self> {
        let mut world = hecs::World::new();

        // Time how long it takes to set up the world.
        let mut stopwatch = Stopwatch::new();

        let emitter = init_emitter_entity(&mut world, emitter_pos);

        let mut cvars = DEFAULT_CVARS.iter().copied().collect::<CVarsMap>();
        cvars.get_mut("g_gravity_x").unwrap().value = CVarValue::F32(config.gravity[0]);
        cvars.get_mut("g_gravity_y").unwrap().value = CVarValue::F32(config.gravity[1]);

        let setup_time = stopwatch.lap();

        println!("Loaded effect \"{}\".", config.name);
        println!("Setup time: {:?}", setup_time);

        Ok(Self {
            max_count: config.max_count as usize,
            config,

            world,
            emitter,

            forces: Vec::new(),

            clock: 0.0,
            paused: true,

            changed_set: ChangedSet::default(),
            cvars,

            rng: StdRng::from_entropy(),
        })
    }

    pub fn with_emitter<RT, F: FnOnce(&mut CEmitter) -> RT>(&mut self, callback: F) -> Result<RT> {
        let emitter = self.world.query_one_mut::<&mut CEmitter>(self.emitter)?;
        Ok(callback(emitter))
    }

    pub fn particle_count(&self) -> usize {
        self.world.query::<&CParticle>().iter().count()
    }

    /// Create up to `num` particles at `origin`. Spawning stops silently
    /// once the live count reaches `max_count`.
    ///
    /// Returns the new entities; each is also recorded in the changed-set
    /// so the renderer picks it up this tick.
    pub fn emit(
        &mut self,
        origin: Vec2,
        num: usize,
        settings: ParticleSettings,
        min_start_vel: Vec2,
        max_start_vel: Vec2,
    ) -> Vec<hecs::Entity> {
        let mut live = self.particle_count();
        let mut new_particles = Vec::new();

        for _ in 0..num {
            if live == self.max_count {
                break;
            }

            let id = spawn_particle_entity(
                &mut self.world,
                origin,
                settings,
                min_start_vel,
                max_start_vel,
                self.clock,
                &mut self.rng,
            );

            self.changed_set.spawn(id);
            new_particles.push(id);
            live += 1;
        }

        new_particles
    }

    /// Advance the simulation by `delta`. No-op while paused.
    ///
    /// Particles past their lifespan are despawned without a partial update;
    /// live ones integrate position and velocity and refresh their
    /// interpolated color, opacity and mass.
    pub fn think(&mut self, delta: Duration) -> Result<()> {
        if self.paused {
            return Ok(());
        }

        let dt = delta.as_secs_f32();
        self.clock += delta.as_secs_f64();

        let mut forces = self.forces.clone();
        forces.push(Vec2 {
            x: self.cvars.get("g_gravity_x").unwrap().value.as_f32().unwrap(),
            y: self.cvars.get("g_gravity_y").unwrap().value.as_f32().unwrap(),
        });

        let clock = self.clock;
        let changed_set = &mut self.changed_set;
        let mut dead = Vec::new();

        for (id, (particle, state, color)) in self
            .world
            .query_mut::<(&CParticle, &mut CParticleState, &mut CParticleColor)>()
        {
            let age = (clock - particle.spawned_at) as f32;
            if age > particle.lifespan {
                dead.push(id);
                continue;
            }

            // Life time interpolation value.
            let t = age / particle.lifespan;
            let settings = &particle.settings;

            state.mass = lerp(settings.start_mass, settings.end_mass, t);
            let vel = state.vel;
            state.pos += vel * dt;
            for force in &forces {
                state.vel += *force / state.mass * dt;
            }

            color.color = lerp(settings.start_color, settings.end_color, t);
            color.opacity = lerp(settings.start_opacity, settings.end_opacity, t);

            changed_set.change(id);
        }

        for id in dead {
            self.world.despawn(id)?;
            self.changed_set.remove(id);
        }

        // Run the emitter.
        let (origin, emit_burst) = {
            let emitter = self.world.query_one_mut::<&mut CEmitter>(self.emitter)?;
            emitter.timer += dt;

            if emitter.timer > self.config.emission_rate {
                emitter.timer = 0.0;
                (emitter.pos, true)
            } else {
                (emitter.pos, false)
            }
        };

        if emit_burst {
            let settings = ParticleSettings::from_config(&self.config, &mut self.rng);
            self.emit(
                origin,
                self.config.emission_count as usize,
                settings,
                self.config.min_start_vel(),
                self.config.max_start_vel(),
            );
        }

        Ok(())
    }

    /// Called after the renderer has consumed the changed-set.
    pub fn think_end(&mut self) -> Result<()> {
        self.changed_set.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_config::ParticleShape;
    use ultraviolet::Vec3;

    fn test_config() -> EffectConfig {
        let mut config = EffectConfig::from_effect(Effect::Fire).unwrap();
        config.max_count = 8;
        // Keep the emitter quiet so tests see only what they emit;
        // emitter_bursts_on_rate lowers this locally.
        config.emission_rate = 1000.0;
        config.emission_count = 4;
        config.color_jitter = 0.0;
        config.mass_scale = 1.0;
        config.gravity = [0.0, 0.0];
        config
    }

    fn fixed_settings() -> ParticleSettings {
        ParticleSettings {
            start_color: Vec3::new(1.0, 0.5, 0.0),
            end_color: Vec3::zero(),
            start_opacity: 1.0,
            end_opacity: 0.0,
            min_lifespan: 1.0,
            max_lifespan: 1.0,
            start_mass: 1.0,
            end_mass: 1.0,
            shape: ParticleShape::Sprite,
            size: Vec2::new(32.0, 32.0),
        }
    }

    fn unpaused_world() -> World {
        let mut world = World::new_with_config(test_config(), Vec2::new(100.0, 100.0)).unwrap();
        world.paused = false;
        world
    }

    #[test]
    fn emit_caps_at_max_count() {
        let mut world = unpaused_world();
        let vel = Vec2::zero();

        let spawned = world.emit(Vec2::zero(), 20, fixed_settings(), vel, vel);

        assert_eq!(spawned.len(), 8);
        assert_eq!(world.particle_count(), 8);
        assert_eq!(world.changed_set.spawned().len(), 8);

        // Already full: nothing more comes out.
        assert!(world
            .emit(Vec2::zero(), 1, fixed_settings(), vel, vel)
            .is_empty());
    }

    #[test]
    fn particles_integrate_position() {
        let mut world = unpaused_world();
        let vel = Vec2::new(10.0, -20.0);
        let id = world.emit(Vec2::zero(), 1, fixed_settings(), vel, vel)[0];

        world.think(Duration::from_millis(500)).unwrap();

        let mut query = world.world.query_one::<&CParticleState>(id).unwrap();
        let state = query.get().unwrap();
        assert!((state.pos.x - 5.0).abs() < 1e-4);
        assert!((state.pos.y + 10.0).abs() < 1e-4);
    }

    #[test]
    fn forces_accelerate_by_inverse_mass() {
        let mut world = unpaused_world();
        world.forces.push(Vec2::new(0.0, -100.0));

        let mut settings = fixed_settings();
        settings.start_mass = 2.0;
        settings.end_mass = 2.0;
        let id = world.emit(Vec2::zero(), 1, settings, Vec2::zero(), Vec2::zero())[0];

        world.think(Duration::from_millis(100)).unwrap();

        let mut query = world.world.query_one::<&CParticleState>(id).unwrap();
        let state = query.get().unwrap();
        // a = F / m = -50 px/s^2, over 0.1s.
        assert!((state.vel.y + 5.0).abs() < 1e-4);
    }

    #[test]
    fn visuals_interpolate_over_lifespan() {
        let mut world = unpaused_world();
        let id = world.emit(Vec2::zero(), 1, fixed_settings(), Vec2::zero(), Vec2::zero())[0];

        world.think(Duration::from_millis(500)).unwrap();

        let mut query = world
            .world
            .query_one::<(&CParticleColor, &CParticleState)>(id)
            .unwrap();
        let (color, state) = query.get().unwrap();
        // t = 0.5 on a 1s lifespan.
        assert!((color.opacity - 0.5).abs() < 1e-4);
        assert!((color.color.x - 0.5).abs() < 1e-4);
        assert_eq!(state.mass, 1.0);
    }

    #[test]
    fn particles_die_past_their_lifespan() {
        let mut world = unpaused_world();
        let id = world.emit(Vec2::zero(), 1, fixed_settings(), Vec2::zero(), Vec2::zero())[0];
        world.think_end().unwrap();

        world.think(Duration::from_millis(900)).unwrap();
        assert_eq!(world.particle_count(), 1);
        world.think_end().unwrap();

        world.think(Duration::from_millis(200)).unwrap();
        assert_eq!(world.particle_count(), 0);
        assert!(world.changed_set.removed().contains(&id));
        assert!(!world.world.contains(id));
    }

    #[test]
    fn paused_world_does_not_age() {
        let mut world = unpaused_world();
        let id = world.emit(Vec2::zero(), 1, fixed_settings(), Vec2::zero(), Vec2::zero())[0];

        world.think(Duration::from_millis(500)).unwrap();
        world.think_end().unwrap();

        // A long pause must not age the particle.
        world.paused = true;
        world.think(Duration::from_secs(60)).unwrap();
        assert_eq!(world.clock, 0.5);
        assert!(world.changed_set.changed().is_empty());

        world.paused = false;
        world.think(Duration::from_millis(100)).unwrap();
        assert!(world.world.contains(id));
    }

    #[test]
    fn emitter_bursts_on_rate() {
        let mut config = test_config();
        config.emission_rate = 0.1;
        let mut world = World::new_with_config(config, Vec2::new(100.0, 100.0)).unwrap();
        world.paused = false;

        // One tick past the emission rate: exactly one burst.
        world.think(Duration::from_millis(150)).unwrap();
        assert_eq!(world.particle_count(), 4);

        // The timer was reset, so a short tick emits nothing new.
        world.think(Duration::from_millis(50)).unwrap();
        assert_eq!(world.particle_count(), 4);
    }

    #[test]
    fn inverted_spawn_ranges_are_normalized() {
        let mut world = unpaused_world();

        let mut settings = fixed_settings();
        settings.min_lifespan = 2.0;
        settings.max_lifespan = 1.0;

        // Bounds reversed on both axes; sampling must not panic.
        let min = Vec2::new(5.0, 10.0);
        let max = Vec2::new(-5.0, -10.0);
        let id = world.emit(Vec2::zero(), 1, settings, min, max)[0];

        let mut query = world
            .world
            .query_one::<(&CParticle, &CParticleState)>(id)
            .unwrap();
        let (particle, state) = query.get().unwrap();
        assert!((1.0..=2.0).contains(&particle.lifespan));
        assert!((-5.0..=5.0).contains(&state.vel.x));
        assert!((-10.0..=10.0).contains(&state.vel.y));
    }

    #[test]
    fn emitter_moves_with_callback() {
        let mut world = unpaused_world();
        world
            .with_emitter(|emitter| emitter.pos += Vec2::new(50.0, 0.0))
            .unwrap();

        let pos = world.with_emitter(|emitter| emitter.pos).unwrap();
        assert_eq!(pos, Vec2::new(150.0, 100.0));
    }
}
