use egui::{Key, Modifiers, Pos2};

use super::super::system::{SystemEvent, SystemKeycode, SystemMod, SystemMouseButton};

/// A trait that adds a method to convert to an egui key
pub trait ToEguiKey {
    /// Convert the struct to an egui key
    fn to_egui_key(&self) -> Option<egui::Key>;
}

impl ToEguiKey for SystemKeycode {
    fn to_egui_key(&self) -> Option<egui::Key> {
        use keycode::KeyMappingCode as KC;

        Some(match *self {
            KC::ArrowLeft => Key::ArrowLeft,
            KC::ArrowUp => Key::ArrowUp,
            KC::ArrowRight => Key::ArrowRight,
            KC::ArrowDown => Key::ArrowDown,
            KC::Escape => Key::Escape,
            KC::Tab => Key::Tab,
            KC::Backspace => Key::Backspace,
            KC::Space => Key::Space,
            KC::Enter => Key::Enter,
            KC::Insert => Key::Insert,
            KC::Home => Key::Home,
            KC::Delete => Key::Delete,
            KC::End => Key::End,
            KC::PageDown => Key::PageDown,
            KC::PageUp => Key::PageUp,
            KC::Numpad0 | KC::Digit0 => Key::Num0,
            KC::Numpad1 | KC::Digit1 => Key::Num1,
            KC::Numpad2 | KC::Digit2 => Key::Num2,
            KC::Numpad3 | KC::Digit3 => Key::Num3,
            KC::Numpad4 | KC::Digit4 => Key::Num4,
            KC::Numpad5 | KC::Digit5 => Key::Num5,
            KC::Numpad6 | KC::Digit6 => Key::Num6,
            KC::Numpad7 | KC::Digit7 => Key::Num7,
            KC::Numpad8 | KC::Digit8 => Key::Num8,
            KC::Numpad9 | KC::Digit9 => Key::Num9,
            KC::KeyA => Key::A,
            KC::KeyB => Key::B,
            KC::KeyC => Key::C,
            KC::KeyD => Key::D,
            KC::KeyE => Key::E,
            KC::KeyF => Key::F,
            KC::KeyG => Key::G,
            KC::KeyH => Key::H,
            KC::KeyI => Key::I,
            KC::KeyJ => Key::J,
            KC::KeyK => Key::K,
            KC::KeyL => Key::L,
            KC::KeyM => Key::M,
            KC::KeyN => Key::N,
            KC::KeyO => Key::O,
            KC::KeyP => Key::P,
            KC::KeyQ => Key::Q,
            KC::KeyR => Key::R,
            KC::KeyS => Key::S,
            KC::KeyT => Key::T,
            KC::KeyU => Key::U,
            KC::KeyV => Key::V,
            KC::KeyW => Key::W,
            KC::KeyX => Key::X,
            KC::KeyY => Key::Y,
            KC::KeyZ => Key::Z,
            _ => {
                return None;
            }
        })
    }
}

/// Collapse the USB HID modifier bitmask into egui's view of it. Left and
/// right variants fold together; `command` follows ctrl (or the meta key,
/// for macOS).
fn _to_egui_modifiers(mods: &SystemMod) -> Modifiers {
    let ctrl = mods.intersects(SystemMod::ControlLeft | SystemMod::ControlRight);
    let alt = mods.intersects(SystemMod::AltLeft | SystemMod::AltRight);
    let shift = mods.intersects(SystemMod::ShiftLeft | SystemMod::ShiftRight);
    let mac_cmd = mods.intersects(SystemMod::MetaLeft | SystemMod::MetaRight);

    Modifiers {
        alt,
        ctrl,
        shift,
        mac_cmd,
        command: ctrl || mac_cmd,
    }
}

/// Feeds [SystemEvent]s into an egui context.
pub struct EguiPlatform {
    // The position of the mouse pointer
    pointer_pos: Pos2,
    // The egui modifiers
    modifiers: Modifiers,
    // The raw input
    egui_input: egui::RawInput,

    // The egui context
    egui_ctx: egui::Context,
}

impl EguiPlatform {
    pub fn new(screen_size: (u32, u32)) -> anyhow::Result<Self> {
        Ok(Self {
            pointer_pos: Pos2::ZERO,
            egui_input: egui::RawInput {
                screen_rect: Some(egui::Rect::from_min_size(
                    egui::Pos2::ZERO,
                    egui::Vec2 {
                        x: screen_size.0 as f32,
                        y: screen_size.1 as f32,
                    },
                )),
                ..Default::default()
            },
            modifiers: Modifiers::default(),
            egui_ctx: egui::Context::default(),
        })
    }

    /// Handle a system event. Returns true if egui wants the event.
    pub fn handle_event(&mut self, event: &SystemEvent) -> bool {
        match event {
            SystemEvent::SizeChanged { width, height } => {
                self.egui_input.screen_rect = Some(egui::Rect::from_min_size(
                    egui::Pos2::ZERO,
                    egui::Vec2 {
                        x: *width as f32,
                        y: *height as f32,
                    },
                ));
            }

            SystemEvent::Text { text } => {
                if self.egui_ctx.wants_keyboard_input() {
                    self.egui_input.events.push(egui::Event::Text(text.clone()));
                    return true;
                }
            }

            SystemEvent::MouseButtonDown { mouse_btn, .. } => {
                let btn = match mouse_btn {
                    SystemMouseButton::Left => egui::PointerButton::Primary,
                    SystemMouseButton::Middle => egui::PointerButton::Middle,
                    SystemMouseButton::Right => egui::PointerButton::Secondary,
                };
                self.egui_input.events.push(egui::Event::PointerButton {
                    pos: self.pointer_pos,
                    button: btn,
                    pressed: true,
                    modifiers: self.modifiers,
                });

                return self.egui_ctx.wants_pointer_input();
            }

            SystemEvent::MouseButtonUp { mouse_btn, .. } => {
                let btn = match mouse_btn {
                    SystemMouseButton::Left => egui::PointerButton::Primary,
                    SystemMouseButton::Middle => egui::PointerButton::Middle,
                    SystemMouseButton::Right => egui::PointerButton::Secondary,
                };
                self.egui_input.events.push(egui::Event::PointerButton {
                    pos: self.pointer_pos,
                    button: btn,
                    pressed: false,
                    modifiers: self.modifiers,
                });

                return self.egui_ctx.wants_pointer_input();
            }

            SystemEvent::MouseMotion { x, y, .. } => {
                self.pointer_pos = egui::Pos2::new(*x as f32, *y as f32);
                self.egui_input
                    .events
                    .push(egui::Event::PointerMoved(self.pointer_pos));

                return self.egui_ctx.wants_pointer_input();
            }

            SystemEvent::KeyDown { keycode, mods, .. } => {
                if let Some(key) = keycode.to_egui_key() {
                    self.modifiers = _to_egui_modifiers(mods);
                    self.egui_input.modifiers = self.modifiers;

                    self.egui_input.events.push(egui::Event::Key {
                        key,
                        physical_key: None,
                        pressed: true,
                        repeat: false,
                        modifiers: self.modifiers,
                    });

                    return self.egui_ctx.wants_keyboard_input();
                }
            }

            SystemEvent::KeyUp { keycode, mods, .. } => {
                if let Some(key) = keycode.to_egui_key() {
                    self.modifiers = _to_egui_modifiers(mods);
                    self.egui_input.modifiers = self.modifiers;

                    self.egui_input.events.push(egui::Event::Key {
                        key,
                        physical_key: None,
                        pressed: false,
                        repeat: false,
                        modifiers: self.modifiers,
                    });
                }
            }
        };

        false
    }

    /// Return the processed context
    pub fn context(&mut self) -> egui::Context {
        self.egui_ctx.clone()
    }

    /// Begin drawing the egui frame
    pub fn begin_frame(&mut self) {
        self.egui_ctx.begin_pass(self.egui_input.take());
    }

    /// Stop drawing the egui frame and return the full output
    pub fn end_frame(&mut self) -> anyhow::Result<egui::FullOutput> {
        let output = self.egui_ctx.end_pass();
        Ok(output)
    }

    /// Tessellate the egui frame
    pub fn tessellate(
        &self,
        full_output: &egui::FullOutput,
        pixels_per_point: f32,
    ) -> Vec<egui::ClippedPrimitive> {
        self.egui_ctx
            .tessellate(full_output.shapes.clone(), pixels_per_point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keycodes_map_to_egui() {
        assert_eq!(SystemKeycode::ArrowLeft.to_egui_key(), Some(Key::ArrowLeft));
        assert_eq!(SystemKeycode::KeyT.to_egui_key(), Some(Key::T));
        assert_eq!(SystemKeycode::Digit3.to_egui_key(), Some(Key::Num3));
        assert_eq!(SystemKeycode::Numpad3.to_egui_key(), Some(Key::Num3));
        assert_eq!(SystemKeycode::F1.to_egui_key(), None);
    }

    #[test]
    fn modifiers_collapse_left_and_right() {
        let mods = SystemMod::ControlLeft | SystemMod::ShiftRight;
        let egui_mods = _to_egui_modifiers(&mods);

        assert!(egui_mods.ctrl);
        assert!(egui_mods.shift);
        assert!(egui_mods.command);
        assert!(!egui_mods.alt);
        assert!(!egui_mods.mac_cmd);

        assert_eq!(_to_egui_modifiers(&SystemMod::empty()), Modifiers::NONE);
    }
}
