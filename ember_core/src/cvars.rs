use anyhow::Error;
use encase::ShaderType;
use indexmap::IndexMap;

pub const DEFAULT_CVARS: &[(&str, CVar)] = &[
    // #############################
    // GAMEPLAY VARIABLES:
    // #############################
    (
        "g_speed",
        CVar {
            description: "The speed of the emitter from the keyboard, in pixels per second.",
            value: CVarValue::F32(300.0),
        },
    ),
    // The defaults here are overwritten by the effect preset when the world
    // is created.
    (
        "g_gravity_x",
        CVar {
            description: "Ambient force applied to every particle, in N (x axis).",
            value: CVarValue::F32(0.0),
        },
    ),
    (
        "g_gravity_y",
        CVar {
            description: "Ambient force applied to every particle, in N (y axis).",
            value: CVarValue::F32(0.0),
        },
    ),
    // #############################
    // RENDERING VARIABLES:
    // These typically are also passed into CVarUniforms.
    // #############################

    // Number of MSAA samples.
    (
        "r_msaa",
        CVar {
            description: "",
            value: CVarValue::U32(4),
        },
    ),
    // Exponent of the sprite's radial falloff.
    (
        "r_softness",
        CVar {
            description: "",
            value: CVarValue::F32(2.0),
        },
    ),
];

/// IndexMap keeps the cvar ordering stable in the settings overlay.
pub type CVarsMap = IndexMap<&'static str, CVar>;

#[derive(ShaderType)]
/// This struct is used to pass the CVars into the shader uniform buffer.
/// Typically used for rendering variables.
pub struct CVarUniforms {
    pub r_softness: f32,
    pub r_msaa: u32,
}

impl CVarUniforms {
    pub fn from_cvars(cvars: &CVarsMap) -> Self {
        Self {
            r_softness: cvars.get("r_softness").unwrap().value.as_f32().unwrap(),
            r_msaa: cvars.get("r_msaa").unwrap().value.as_u32().unwrap(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CVar {
    pub description: &'static str,
    pub value: CVarValue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CVarValue {
    Bool(bool),
    U32(u32),
    F32(f32),
}

impl CVarValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CVarValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            CVarValue::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            CVarValue::F32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn set_from_str(&mut self, value: &str) -> Result<(), Error> {
        match self {
            CVarValue::Bool(ref mut v) => *v = value.parse()?,
            CVarValue::U32(ref mut v) => *v = value.parse()?,
            CVarValue::F32(ref mut v) => *v = value.parse()?,
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_from_str_respects_type() {
        let mut value = CVarValue::F32(2.0);
        value.set_from_str("3.5").unwrap();
        assert_eq!(value, CVarValue::F32(3.5));

        let mut value = CVarValue::U32(4);
        assert!(value.set_from_str("1.5").is_err());
        value.set_from_str("8").unwrap();
        assert_eq!(value, CVarValue::U32(8));
    }

    #[test]
    fn uniforms_pull_render_cvars() {
        let cvars: CVarsMap = DEFAULT_CVARS.iter().copied().collect();
        let uniforms = CVarUniforms::from_cvars(&cvars);

        assert_eq!(uniforms.r_msaa, 4);
        assert_eq!(uniforms.r_softness, 2.0);
    }
}
