use ember_config::{EffectConfig, ParticleShape};
use rand::Rng;
use ultraviolet::{Vec2, Vec3};

use crate::helpers::uniform_between;

/// Settings for a burst of particles: colors, opacity, lifespan and mass
/// ranges, and the shape they rasterize as.
///
/// Colors and opacity are interpolated from start to end over each
/// particle's lifespan; mass likewise, which changes how forces accelerate
/// the particle as it ages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSettings {
    pub start_color: Vec3,
    pub end_color: Vec3,

    pub start_opacity: f32,
    pub end_opacity: f32,

    pub min_lifespan: f32,
    pub max_lifespan: f32,

    pub start_mass: f32,
    pub end_mass: f32,

    pub shape: ParticleShape,
    /// Quad size in pixels, resolved from the shape.
    pub size: Vec2,
}

impl ParticleSettings {
    /// Roll the per-burst randomness of a preset: a darkening factor applied
    /// to both colors, and a start mass uniform in [1/mass_scale, mass_scale]
    /// with the end mass at start / mass_scale.
    pub fn from_config(config: &EffectConfig, rng: &mut impl Rng) -> Self {
        let jitter = uniform_between(rng, 1.0 - config.color_jitter, 1.0);
        let start_mass = uniform_between(rng, 1.0 / config.mass_scale, config.mass_scale);

        let size = match config.shape {
            ParticleShape::Sprite => Vec2::new(config.sprite_size, config.sprite_size),
            ParticleShape::Rect { width, height } => Vec2::new(width, height),
        };

        Self {
            start_color: config.start_color.0 * jitter,
            end_color: config.end_color.0 * jitter,

            start_opacity: config.start_opacity,
            end_opacity: config.end_opacity,

            min_lifespan: config.min_lifespan,
            max_lifespan: config.max_lifespan,

            start_mass,
            end_mass: start_mass / config.mass_scale,

            shape: config.shape,
            size,
        }
    }
}

/// The birth record of a particle. Never mutated after spawn.
#[derive(Debug)]
pub struct CParticle {
    /// World clock at spawn, in seconds.
    pub spawned_at: f64,
    /// Life duration in seconds, rolled per particle from the settings range.
    pub lifespan: f32,
    pub settings: ParticleSettings,
}

/// The physical state of a particle.
#[derive(Debug)]
pub struct CParticleState {
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
}

/// The current interpolated visual, streamed to the GPU every tick.
#[derive(Debug)]
pub struct CParticleColor {
    pub color: Vec3,
    pub opacity: f32,
}
