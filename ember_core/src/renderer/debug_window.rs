use std::time::Duration;

use anyhow::Result;
use ultraviolet::UVec2;

use super::{
    helpers::egui::HasEguiUserContext,
    helpers::window::{Window, WindowContext, WindowSetup},
    main_user_context::MainUserContext,
    system::{SystemEvent, SystemKeycode, SystemMod},
};

use crate::cvars::CVarValue;

use MainUserContext as UC;

pub fn debug_window() -> impl WindowSetup<UC> {
    move |_context: &WindowContext<UC>, _size: UVec2| {
        Ok(Box::new(DebugWindow {
            settings_active: false,
            fps: 0.0,
        }) as Box<dyn Window<UC>>)
    }
}

pub struct DebugWindow {
    settings_active: bool,

    /// Exponentially smoothed frames per second.
    fps: f32,
}

impl Window<UC> for DebugWindow {
    fn handle_event(
        &mut self,
        _context: &mut WindowContext<UC>,
        event: &SystemEvent,
    ) -> Result<bool> {
        if let SystemEvent::KeyDown { keycode, mods, .. } = event {
            let ctrl = mods.intersects(SystemMod::ControlLeft | SystemMod::ControlRight);
            if *keycode == SystemKeycode::KeyT && ctrl {
                self.settings_active = !self.settings_active;
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn draw(
        &mut self,
        context: &mut WindowContext<UC>,
        _texture: &wgpu::Texture,
        delta: Duration,
    ) -> Result<()> {
        let ui = &context.user_context.ui();
        let setup_time = context.user_context.setup_time;
        let world = context.user_context.world.clone();

        let delta_s = delta.as_secs_f32().max(1e-6);
        self.fps = self.fps * 0.95 + (1.0 / delta_s) * 0.05;

        egui::Area::new("Stats".into()).show(ui, |ui| {
            let world = world.borrow();

            ui.label(format!("FPS: {:.0}", self.fps));
            ui.label(format!("Effect: {}", world.config.name));
            ui.label(format!("Particles: {}", world.particle_count()));
            ui.label(format!("Setup: {:?}ms", setup_time.as_millis()));
        });

        if world.borrow().paused {
            egui::Area::new("Paused".into())
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ui, |ui| {
                    ui.label("Press [SPACE] to start");
                });
        }

        if self.settings_active {
            egui::Window::new("Settings").show(ui, |ui| {
                let mut world = world.borrow_mut();

                for (name, cvar) in world.cvars.iter_mut() {
                    ui.horizontal(|ui| {
                        ui.label(*name);

                        match &mut cvar.value {
                            CVarValue::Bool(v) => {
                                ui.checkbox(v, "");
                            }
                            CVarValue::U32(v) => {
                                ui.add(egui::DragValue::new(v));
                            }
                            CVarValue::F32(v) => {
                                ui.add(egui::DragValue::new(v).speed(0.1));
                            }
                        };
                    })
                    .response
                    .on_hover_text(cvar.description);
                }
            });
        }

        Ok(())
    }
}
