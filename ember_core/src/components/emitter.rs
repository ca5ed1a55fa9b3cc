use ultraviolet::Vec2;

/// The emission point of the world.
///
/// The timer accumulates seconds; once it exceeds the preset's emission
/// rate, the world emits a burst and resets it.
#[derive(Debug)]
pub struct CEmitter {
    pub pos: Vec2,
    pub timer: f32,
}

impl CEmitter {
    pub fn at(pos: Vec2) -> Self {
        Self { pos, timer: 0.0 }
    }
}
