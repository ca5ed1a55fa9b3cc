mod emitter;
mod particle;

pub use emitter::*;
pub use particle::*;
