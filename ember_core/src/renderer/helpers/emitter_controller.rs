use std::{collections::HashMap, time::Duration};

use anyhow::Result;
use ultraviolet::{UVec2, Vec2};

use crate::world::World;

use super::system::{SystemEvent, SystemKeycode};

/// Moves the emitter with the arrow keys while the simulation is running.
///
/// Key state is tracked here rather than queried from the platform, so the
/// controller works with any event source that speaks [SystemEvent].
#[derive(Default)]
pub struct EmitterController {
    key_presses: HashMap<SystemKeycode, bool>,
}

impl EmitterController {
    pub fn new() -> Self {
        Self {
            ..Default::default()
        }
    }

    pub fn handle_event(&mut self, event: &SystemEvent) {
        match event {
            SystemEvent::KeyDown { keycode, .. } => {
                self.key_presses.insert(*keycode, true);
            }
            SystemEvent::KeyUp { keycode, .. } => {
                self.key_presses.insert(*keycode, false);
            }
            _ => {}
        }
    }

    fn pressed(&self, keycode: SystemKeycode) -> bool {
        *self.key_presses.get(&keycode).unwrap_or(&false)
    }

    /// Apply held arrow keys to the emitter position. The `g_speed` cvar is
    /// the horizontal speed in px/s; vertical speed scales with the window's
    /// aspect ratio. Held keys do nothing while the world is paused, and
    /// opposite keys don't cancel: left and up take precedence.
    pub fn think(&self, world: &mut World, delta: Duration, size: UVec2) -> Result<()> {
        if world.paused {
            return Ok(());
        }

        let speed = world.cvars.get("g_speed").unwrap().value.as_f32().unwrap();
        let speed = Vec2::new(speed, speed * (size.y as f32 / size.x as f32));

        let mut movement = Vec2::default();

        if self.pressed(SystemKeycode::ArrowLeft) {
            movement.x -= 1.;
        } else if self.pressed(SystemKeycode::ArrowRight) {
            movement.x += 1.;
        }
        if self.pressed(SystemKeycode::ArrowUp) {
            movement.y += 1.;
        } else if self.pressed(SystemKeycode::ArrowDown) {
            movement.y -= 1.;
        }

        if movement.mag() != 0.0 {
            world.with_emitter(|emitter| {
                emitter.pos += movement * speed * delta.as_secs_f32();
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_config::{Effect, EffectConfig};
    use keycode::KeyModifiers;

    fn key_down(keycode: SystemKeycode) -> SystemEvent {
        SystemEvent::KeyDown {
            keycode,
            mods: KeyModifiers::empty(),
        }
    }

    fn key_up(keycode: SystemKeycode) -> SystemEvent {
        SystemEvent::KeyUp {
            keycode,
            mods: KeyModifiers::empty(),
        }
    }

    fn test_world() -> World {
        let mut config = EffectConfig::from_effect(Effect::Fire).unwrap();
        config.gravity = [0.0, 0.0];

        let mut world = World::new_with_config(config, Vec2::new(100.0, 100.0)).unwrap();
        world.paused = false;
        world
    }

    fn emitter_pos(world: &mut World) -> Vec2 {
        world.with_emitter(|emitter| emitter.pos).unwrap()
    }

    #[test]
    fn arrows_move_the_emitter() {
        let mut controller = EmitterController::new();
        let mut world = test_world();

        controller.handle_event(&key_down(SystemKeycode::ArrowRight));
        controller.handle_event(&key_down(SystemKeycode::ArrowUp));
        controller
            .think(&mut world, Duration::from_millis(100), UVec2::new(960, 540))
            .unwrap();

        // g_speed defaults to 300 px/s; vertical speed is scaled by 540/960.
        let pos = emitter_pos(&mut world);
        assert!((pos.x - 130.0).abs() < 1e-3);
        assert!((pos.y - 116.875).abs() < 1e-3);
    }

    #[test]
    fn released_keys_stop_moving() {
        let mut controller = EmitterController::new();
        let mut world = test_world();

        controller.handle_event(&key_down(SystemKeycode::ArrowLeft));
        controller.handle_event(&key_up(SystemKeycode::ArrowLeft));
        controller
            .think(&mut world, Duration::from_millis(100), UVec2::new(960, 540))
            .unwrap();

        assert_eq!(emitter_pos(&mut world), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn held_keys_do_nothing_while_paused() {
        let mut controller = EmitterController::new();
        let mut world = test_world();
        world.paused = true;

        controller.handle_event(&key_down(SystemKeycode::ArrowRight));
        controller
            .think(&mut world, Duration::from_millis(100), UVec2::new(960, 540))
            .unwrap();

        assert_eq!(emitter_pos(&mut world), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn opposite_keys_do_not_cancel() {
        let mut controller = EmitterController::new();
        let mut world = test_world();

        controller.handle_event(&key_down(SystemKeycode::ArrowRight));
        controller.handle_event(&key_down(SystemKeycode::ArrowLeft));
        controller
            .think(&mut world, Duration::from_millis(100), UVec2::new(960, 540))
            .unwrap();

        assert!(emitter_pos(&mut world).x < 100.0);
    }
}
