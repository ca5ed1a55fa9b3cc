// Since we don't want to use SDL2 across the board, we define a subset of
// system abstractions in "ember_core".
//
// This is the SDL2 implementation, which tracks system.rs there.

use std::mem::transmute;

use ember_core::renderer::system::{
    parse_keymap_from_usb, SystemEvent, SystemMod, SystemMouseButton,
};

use sdl2::{
    event::{Event, WindowEvent},
    keyboard::{Mod, Scancode},
    mouse::MouseButton,
    video::Window,
};

/// SDL reports the live modifier state per key event; fold it into the
/// engine's USB HID modifier bitmask.
fn to_system_mod(keymod: Mod) -> SystemMod {
    let pairs = [
        (Mod::LCTRLMOD, SystemMod::ControlLeft),
        (Mod::RCTRLMOD, SystemMod::ControlRight),
        (Mod::LSHIFTMOD, SystemMod::ShiftLeft),
        (Mod::RSHIFTMOD, SystemMod::ShiftRight),
        (Mod::LALTMOD, SystemMod::AltLeft),
        (Mod::RALTMOD, SystemMod::AltRight),
        (Mod::LGUIMOD, SystemMod::MetaLeft),
        (Mod::RGUIMOD, SystemMod::MetaRight),
    ];

    let mut mods = SystemMod::empty();
    for (sdl_mod, system_mod) in pairs {
        if keymod.contains(sdl_mod) {
            mods |= system_mod;
        }
    }
    mods
}

pub trait ToSystemMouseButtonExt {
    fn to_system_mouse_button(&self) -> Option<SystemMouseButton>;
}

impl ToSystemMouseButtonExt for MouseButton {
    fn to_system_mouse_button(&self) -> Option<SystemMouseButton> {
        match self {
            MouseButton::Left => Some(SystemMouseButton::Left),
            MouseButton::Middle => Some(SystemMouseButton::Middle),
            MouseButton::Right => Some(SystemMouseButton::Right),
            _ => None,
        }
    }
}

pub trait ToSystemEventExt {
    fn to_system_event(&self, sdl_window: &Window) -> Option<SystemEvent>;
}

impl ToSystemEventExt for Event {
    fn to_system_event(&self, sdl_window: &Window) -> Option<SystemEvent> {
        match self {
            Event::TextInput { text, .. } => {
                return Some(SystemEvent::Text { text: text.clone() });
            }
            Event::KeyDown {
                scancode: Some(scancode),
                keymod,
                ..
            } => {
                let scancode = unsafe { transmute::<Scancode, u32>(*scancode) as u16 };
                let keymap = parse_keymap_from_usb(scancode);

                if let Ok(keymap) = keymap {
                    if let Some(keycode) = keymap.code {
                        return Some(SystemEvent::KeyDown {
                            keycode,
                            mods: to_system_mod(*keymod),
                        });
                    }
                }
            }
            Event::KeyUp {
                scancode: Some(scancode),
                keymod,
                ..
            } => {
                let scancode = unsafe { transmute::<Scancode, u32>(*scancode) as u16 };
                let keymap = parse_keymap_from_usb(scancode);

                if let Ok(keymap) = keymap {
                    if let Some(keycode) = keymap.code {
                        return Some(SystemEvent::KeyUp {
                            keycode,
                            mods: to_system_mod(*keymod),
                        });
                    }
                }
            }
            Event::MouseMotion {
                x, y, xrel, yrel, ..
            } => {
                return Some(SystemEvent::MouseMotion {
                    x: *x,
                    y: *y,
                    xrel: *xrel,
                    yrel: *yrel,
                });
            }
            Event::MouseButtonDown { mouse_btn, .. } => {
                if let Some(mouse_btn) = mouse_btn.to_system_mouse_button() {
                    return Some(SystemEvent::MouseButtonDown { mouse_btn });
                }
            }
            Event::MouseButtonUp { mouse_btn, .. } => {
                if let Some(mouse_btn) = mouse_btn.to_system_mouse_button() {
                    return Some(SystemEvent::MouseButtonUp { mouse_btn });
                }
            }
            Event::Window {
                window_id,
                win_event: WindowEvent::SizeChanged(width, height),
                ..
            } if *window_id == sdl_window.id() => {
                if *width <= 0 || *height <= 0 {
                    return None;
                }
                let width = *width as u32;
                let height = *height as u32;

                return Some(SystemEvent::SizeChanged { width, height });
            }
            _ => {}
        }
        None
    }
}
