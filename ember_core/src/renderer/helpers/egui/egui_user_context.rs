use ultraviolet::UVec2;

use super::super::window::{UserContext, UserContextContext, UserContextSetup};
use super::egui_system_platform::EguiPlatform;

/// Implemented by any [UserContext] that carries egui state, so the egui
/// wrapper window and overlays can reach the platform without knowing the
/// concrete context type.
pub trait HasEguiUserContext {
    fn egui_platform(&mut self) -> &mut EguiPlatform;
    fn ui(&mut self) -> egui::Context;
}

/// The smallest egui-carrying [UserContext]. Richer contexts embed one and
/// forward [HasEguiUserContext] to it.
pub struct EguiUserContext {
    egui_platform: EguiPlatform,
}

pub fn egui_user_context() -> impl UserContextSetup<EguiUserContext> {
    move |_context: &UserContextContext, size: UVec2| {
        Ok(Box::new(EguiUserContext {
            egui_platform: EguiPlatform::new((size.x, size.y))?,
        }))
    }
}

impl UserContext for EguiUserContext {}

impl HasEguiUserContext for EguiUserContext {
    fn egui_platform(&mut self) -> &mut EguiPlatform {
        &mut self.egui_platform
    }

    fn ui(&mut self) -> egui::Context {
        self.egui_platform.context()
    }
}
