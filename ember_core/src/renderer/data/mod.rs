mod particle_data;
mod sprite_texture_data;

pub use particle_data::*;
pub use sprite_texture_data::*;
