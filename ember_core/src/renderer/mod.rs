pub(crate) mod helpers;

mod data;
mod debug_window;
mod main_user_context;
mod main_window;

pub use debug_window::debug_window;
pub use helpers::egui::egui_window;
pub use helpers::window::overlay_window;
pub use main_window::main_window;

pub use helpers::egui::egui_user_context;
pub use main_user_context::{main_user_context, MainUserContext};

pub use helpers::window::WindowRunner;

pub use helpers::system;
