use std::time::Duration;

use anyhow::Result;
use ultraviolet::UVec2;

use crate::renderer::system::SystemEvent;

use super::{UserContext, Window, WindowContext, WindowSequence, WindowSetup};

/// Stacks its children into layers: the first child is the backmost.
///
/// Events stop at the first child that consumes them; think and draw visit
/// every child in order, so later children composite on top. Draw ordering
/// holds because all children submit to the same wgpu queue.
pub fn overlay_window<UC: UserContext + 'static>(
    children: impl Into<WindowSequence<UC>>,
) -> impl WindowSetup<UC> {
    move |context: &WindowContext<UC>, size: UVec2| {
        let mut built = Vec::new();
        for child in children.into().sequence {
            built.push(child(context, size)?);
        }

        Ok(Box::new(OverlayWindow { children: built }) as Box<dyn Window<UC>>)
    }
}

pub struct OverlayWindow<UC: UserContext + 'static> {
    pub children: Vec<Box<dyn Window<UC>>>,
}

impl<UC: UserContext + 'static> Window<UC> for OverlayWindow<UC> {
    fn handle_event(
        &mut self,
        context: &mut WindowContext<UC>,
        event: &SystemEvent,
    ) -> Result<bool> {
        for child in &mut self.children {
            if child.handle_event(context, event)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn think(&mut self, context: &mut WindowContext<UC>, delta: Duration) -> Result<()> {
        for child in &mut self.children {
            child.think(context, delta)?;
        }

        Ok(())
    }

    fn draw(
        &mut self,
        context: &mut WindowContext<UC>,
        texture: &wgpu::Texture,
        delta: Duration,
    ) -> Result<()> {
        for child in &mut self.children {
            child.draw(context, texture, delta)?;
        }

        Ok(())
    }
}
