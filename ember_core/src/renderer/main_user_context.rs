use std::{cell::RefCell, rc::Rc, time::Duration};

use anyhow::Result;
use encase::ShaderType;
use ultraviolet::{UVec2, Vec2};
use wgpu::BufferUsages;

use crate::{cvars::CVarUniforms, world::World, Stopwatch};

use super::{
    data::{ParticleData, SpriteTextureData},
    egui_user_context,
    helpers::{
        egui::{EguiPlatform, EguiUserContext, HasEguiUserContext},
        gpu::{GpuUniformBuffer, LenOrData::Len},
        window::{UserContext, UserContextContext, UserContextSetup},
    },
};

pub fn main_user_context(world: Rc<RefCell<World>>) -> impl UserContextSetup<MainUserContext> {
    move |context: &UserContextContext, size: UVec2| {
        let egui_user_context = egui_user_context()(context, size)?;

        let device = context.device;

        let ubo = GpuUniformBuffer::new(
            BufferUsages::UNIFORM,
            device,
            Len(Ubo::min_size().get()),
            Some("MainUserContext::ubo"),
        )?;

        // Time how long it takes to build the GPU-side data.
        let mut stopwatch = Stopwatch::new();

        let world_cloned = world.clone();
        let world = world.borrow();

        let sprite_texture_data = SpriteTextureData::new(device, context.queue)?;
        let particle_data = ParticleData::new(device, &world)?;

        Ok(Box::new(MainUserContext {
            egui_user_context,
            world: world_cloned,

            ubo,

            sprite_texture_data,
            particle_data,

            setup_time: stopwatch.lap(),
        }))
    }
}

#[derive(ShaderType)]
pub struct Ubo {
    screen_size: Vec2,
    r_softness: f32,
    r_msaa: u32,
}

pub struct MainUserContext {
    egui_user_context: Box<EguiUserContext>,

    pub world: Rc<RefCell<World>>,

    pub ubo: GpuUniformBuffer<Ubo>,

    pub sprite_texture_data: SpriteTextureData,
    pub particle_data: ParticleData,

    pub setup_time: Duration,
}

impl UserContext for MainUserContext {
    fn think(&mut self, context: &UserContextContext, delta: Duration) -> Result<()> {
        let world = self.world.clone();

        // Start by letting the world think.
        world.borrow_mut().think(delta)?;

        // Update egui if necessary.
        self.egui_user_context.think(context, delta)?;

        // Sync particle instances to the GPU.
        self.particle_data.think(context.queue, &world.borrow())?;

        // Update the screen size and render cvars.
        let cvars = CVarUniforms::from_cvars(&world.borrow().cvars);
        self.ubo.write(
            context.queue,
            Ubo {
                screen_size: context.size.into(),
                r_softness: cvars.r_softness,
                r_msaa: cvars.r_msaa,
            },
        )?;

        // End by letting the world think_end.
        world.borrow_mut().think_end()?;

        Ok(())
    }
}

impl HasEguiUserContext for MainUserContext {
    fn egui_platform(&mut self) -> &mut EguiPlatform {
        self.egui_user_context.egui_platform()
    }

    fn ui(&mut self) -> egui::Context {
        self.egui_user_context.ui()
    }
}
