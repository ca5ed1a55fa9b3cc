use serde::Deserialize;
use ultraviolet::{Vec2, Vec3};

/// The built-in effects shipped with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Fire,
    Smoke,
    Sparks,
}

impl Effect {
    pub const ALL: &'static [Effect] = &[Effect::Fire, Effect::Smoke, Effect::Sparks];

    pub fn from_name(name: &str) -> Option<Effect> {
        match name {
            "fire" => Some(Effect::Fire),
            "smoke" => Some(Effect::Smoke),
            "sparks" => Some(Effect::Sparks),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Effect::Fire => "fire",
            Effect::Smoke => "smoke",
            Effect::Sparks => "sparks",
        }
    }
}

/// An RGB color, stored normalized (0..1 per channel).
///
/// Deserialized from hex strings like "#ff9020".
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color(pub Vec3);

impl TryFrom<String> for Color {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let digits = s.strip_prefix('#').ok_or("color must start with '#'")?;
        let bytes = hex::decode(digits).map_err(|_| "color must be 6 hex digits")?;
        if bytes.len() != 3 {
            return Err("color must be 6 hex digits");
        }

        Ok(Color(Vec3 {
            x: bytes[0] as f32 / 255.0,
            y: bytes[1] as f32 / 255.0,
            z: bytes[2] as f32 / 255.0,
        }))
    }
}

/// How a particle is rasterized.
///
/// Deserialized from "sprite" or "rect WxH" (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum ParticleShape {
    /// A textured quad with radial falloff.
    Sprite,
    /// A solid rectangle of the given size.
    Rect { width: f32, height: f32 },
}

impl TryFrom<String> for ParticleShape {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == "sprite" {
            return Ok(ParticleShape::Sprite);
        }

        if let Some(dims) = s.strip_prefix("rect ") {
            let (w, h) = dims
                .split_once('x')
                .ok_or("rect must look like 'rect WxH'")?;
            let width = w.parse().map_err(|_| "invalid rect width")?;
            let height = h.parse().map_err(|_| "invalid rect height")?;

            return Ok(ParticleShape::Rect { width, height });
        }

        Err("shape must be 'sprite' or 'rect WxH'")
    }
}

/// Everything that defines one particle effect.
///
/// Velocities are in px/s, the emission rate is seconds between bursts, and
/// the gravity vector is the ambient force applied to every particle.
#[derive(Debug, Clone, Deserialize)]
pub struct EffectConfig {
    pub name: String,

    /// Hard cap on live particles. Also sizes the GPU instance buffer.
    pub max_count: u32,

    pub emission_rate: f32,
    pub emission_count: u32,

    pub min_lifespan: f32,
    pub max_lifespan: f32,

    pub start_color: Color,
    pub end_color: Color,
    /// Per-burst random darkening of the colors, 0..1.
    pub color_jitter: f32,

    pub start_opacity: f32,
    pub end_opacity: f32,

    /// Start mass per burst is uniform in [1/mass_scale, mass_scale];
    /// end mass is start / mass_scale.
    pub mass_scale: f32,

    pub min_start_vel: [f32; 2],
    pub max_start_vel: [f32; 2],

    pub shape: ParticleShape,
    /// Side length of the sprite quad, in pixels. Ignored for rects.
    pub sprite_size: f32,

    pub gravity: [f32; 2],
}

impl EffectConfig {
    pub fn from_effect(effect: Effect) -> serde_json::Result<Self> {
        let config_str = match effect {
            Effect::Fire => include_str!("../config/fire.json"),
            Effect::Smoke => include_str!("../config/smoke.json"),
            Effect::Sparks => include_str!("../config/sparks.json"),
        };

        serde_json::from_str(config_str).and_then(Self::_validated)
    }

    pub fn from_json(config_str: &str) -> serde_json::Result<Self> {
        serde_json::from_str(config_str).and_then(Self::_validated)
    }

    /// Range checks that deserialization alone can't express. The engine
    /// samples uniformly inside these ranges, so an inverted range is a
    /// config error, not something to silently reorder.
    fn _validated(self) -> serde_json::Result<Self> {
        use serde::de::Error;

        if self.min_lifespan > self.max_lifespan {
            return Err(serde_json::Error::custom(
                "min_lifespan must not exceed max_lifespan",
            ));
        }
        if self.min_start_vel[0] > self.max_start_vel[0]
            || self.min_start_vel[1] > self.max_start_vel[1]
        {
            return Err(serde_json::Error::custom(
                "min_start_vel must not exceed max_start_vel",
            ));
        }
        if self.mass_scale < 1.0 {
            return Err(serde_json::Error::custom("mass_scale must be at least 1"));
        }

        Ok(self)
    }

    pub fn min_start_vel(&self) -> Vec2 {
        Vec2::new(self.min_start_vel[0], self.min_start_vel[1])
    }

    pub fn max_start_vel(&self) -> Vec2 {
        Vec2::new(self.max_start_vel[0], self.max_start_vel[1])
    }

    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity[0], self.gravity[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_presets_parse() {
        for effect in Effect::ALL {
            let config = EffectConfig::from_effect(*effect).unwrap();
            assert_eq!(config.name, effect.name());
            assert!(config.max_count > 0);
            assert!(config.min_lifespan <= config.max_lifespan);
            assert!(config.mass_scale >= 1.0);
        }
    }

    #[test]
    fn color_from_hex() {
        let color = Color::try_from("#ff8000".to_string()).unwrap();
        assert_eq!(color.0.x, 1.0);
        assert!((color.0.y - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(color.0.z, 0.0);

        assert!(Color::try_from("ff8000".to_string()).is_err());
        assert!(Color::try_from("#ff80".to_string()).is_err());
        assert!(Color::try_from("#zzzzzz".to_string()).is_err());
    }

    #[test]
    fn shape_from_string() {
        assert_eq!(
            ParticleShape::try_from("sprite".to_string()).unwrap(),
            ParticleShape::Sprite
        );
        assert_eq!(
            ParticleShape::try_from("rect 3x5".to_string()).unwrap(),
            ParticleShape::Rect {
                width: 3.0,
                height: 5.0
            }
        );
        assert!(ParticleShape::try_from("circle".to_string()).is_err());
        assert!(ParticleShape::try_from("rect 3".to_string()).is_err());
    }

    #[test]
    fn effect_round_trips_by_name() {
        for effect in Effect::ALL {
            assert_eq!(Effect::from_name(effect.name()), Some(*effect));
        }
        assert_eq!(Effect::from_name("plasma"), None);
    }

    const USER_JSON: &str = r##"{
                "name": "embers",
                "max_count": 64,
                "emission_rate": 0.5,
                "emission_count": 4,
                "min_lifespan": 1.0,
                "max_lifespan": 2.0,
                "start_color": "#ffffff",
                "end_color": "#000000",
                "color_jitter": 0.0,
                "start_opacity": 1.0,
                "end_opacity": 0.0,
                "mass_scale": 1.0,
                "min_start_vel": [-10.0, 0.0],
                "max_start_vel": [10.0, 50.0],
                "shape": "rect 2x2",
                "sprite_size": 32.0,
                "gravity": [0.0, -98.0]
            }"##;

    #[test]
    fn user_config_from_json() {
        let config = EffectConfig::from_json(USER_JSON).unwrap();

        assert_eq!(config.name, "embers");
        assert_eq!(
            config.shape,
            ParticleShape::Rect {
                width: 2.0,
                height: 2.0
            }
        );
        assert_eq!(config.gravity(), Vec2::new(0.0, -98.0));
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let inverted_lifespan = USER_JSON.replace(r#""min_lifespan": 1.0"#, r#""min_lifespan": 3.0"#);
        assert!(EffectConfig::from_json(&inverted_lifespan).is_err());

        let inverted_vel = USER_JSON.replace(
            r#""max_start_vel": [10.0, 50.0]"#,
            r#""max_start_vel": [-20.0, 50.0]"#,
        );
        assert!(EffectConfig::from_json(&inverted_vel).is_err());

        let inverting_mass = USER_JSON.replace(r#""mass_scale": 1.0"#, r#""mass_scale": 0.5"#);
        assert!(EffectConfig::from_json(&inverting_mass).is_err());
    }
}
