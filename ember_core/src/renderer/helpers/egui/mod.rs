mod egui_system_platform;
mod egui_user_context;
mod egui_window;

pub use egui_system_platform::*;
pub use egui_user_context::*;
pub use egui_window::*;
