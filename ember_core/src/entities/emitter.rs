use ultraviolet::Vec2;

use crate::components::CEmitter;

pub fn init_emitter_entity(world: &mut hecs::World, pos: Vec2) -> hecs::Entity {
    world.spawn((CEmitter::at(pos),))
}
