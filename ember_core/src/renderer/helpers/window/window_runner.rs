use std::{borrow::BorrowMut, time::Duration};

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use thiserror::Error;
use ultraviolet::UVec2;
use wgpu::{Backends, Gles3MinorVersion, Instance, InstanceDescriptor, InstanceFlags};

use super::super::system::SystemEvent;
use super::{
    UserContext, UserContextContext, UserContextSetup, Window, WindowContext, WindowSetup,
};

/// Owns the wgpu device, surface and swapchain, and drives a [Window] tree
/// plus its [UserContext] through the event/think/draw cycle.
pub struct WindowRunner<'surface, UC: UserContext> {
    window: Box<dyn Window<UC>>,
    user_context: Box<UC>,

    size: UVec2,

    surface: wgpu::Surface<'surface>,
    surface_format: wgpu::TextureFormat,

    device: wgpu::Device,
    queue: wgpu::Queue,

    // This is somewhat odd... but to keep the think/draw in separate functions,
    // we wait for the next swapchain at the end of draw.
    next_texture: Option<wgpu::SurfaceTexture>,
}

#[derive(Debug, Error)]
pub enum WindowRunnerError {
    #[error("window handle error: {0}")]
    Handle(#[from] raw_window_handle::HandleError),

    #[error(transparent)]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error(transparent)]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error(transparent)]
    Surface(#[from] wgpu::SurfaceError),
    #[error("window error: {0}")]
    Window(#[from] anyhow::Error),

    #[error("no swapchain is ready")]
    NoSwapchain,
    #[error("no suitable gpu adapter found")]
    NoSuitableAdapter,
}

fn _create_surface_information(
    surface_format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> wgpu::SurfaceConfiguration {
    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width,
        height,
        present_mode: wgpu::PresentMode::Fifo,
        alpha_mode: wgpu::CompositeAlphaMode::Auto,
        view_formats: Vec::default(),
        desired_maximum_frame_latency: 2,
    }
}

impl<'surface, UC: UserContext> WindowRunner<'surface, UC> {
    pub async fn from_system_window<SW, U, T>(
        system_window: &'surface SW,
        drawable_size: UVec2,
        user_context_setup: U,
        window_setup: T,
    ) -> Result<Self, WindowRunnerError>
    where
        SW: HasWindowHandle + HasDisplayHandle,
        U: UserContextSetup<UC>,
        T: WindowSetup<UC>,
    {
        let (width, height) = (drawable_size.x, drawable_size.y);

        let instance = Instance::new(InstanceDescriptor {
            backends: Backends::from_bits(Backends::VULKAN.bits() | Backends::METAL.bits())
                .unwrap(),
            flags: InstanceFlags::empty(),
            dx12_shader_compiler: Default::default(),
            gles_minor_version: Gles3MinorVersion::Automatic,
        });

        let surface = unsafe {
            instance.create_surface_unsafe(wgpu::SurfaceTargetUnsafe::RawHandle {
                raw_window_handle: system_window.window_handle()?.into(),
                raw_display_handle: system_window.display_handle()?.into(),
            })?
        };

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::None,
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .ok_or(WindowRunnerError::NoSuitableAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    ..Default::default()
                },
                None,
            )
            .await?;

        // Create swap chain.

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap();

        surface.configure(
            &device,
            &_create_surface_information(surface_format, width, height),
        );

        let user_context_context = UserContextContext {
            device: &device,
            queue: &queue,
            surface_format: &surface_format,
            size: drawable_size,
        };

        // Setup the user context.
        let mut user_context = user_context_setup(&user_context_context, drawable_size)
            .map_err(WindowRunnerError::Window)?;

        let window_context = WindowContext {
            device: &device,
            queue: &queue,
            surface_format: &surface_format,
            size: drawable_size,
            user_context: user_context.borrow_mut(),
        };

        // Setup the window.
        let window = window_setup(&window_context, UVec2 { x: width, y: height })
            .map_err(WindowRunnerError::Window)?;

        // Block on the first swapchain so it's ready.
        let next_texture = Some(surface.get_current_texture()?);

        Ok(WindowRunner {
            window,
            user_context,

            size: UVec2 { x: width, y: height },

            surface,
            surface_format,

            device,
            queue,

            next_texture,
        })
    }

    pub fn handle_event(&mut self, event: SystemEvent) -> Result<(), WindowRunnerError> {
        if let SystemEvent::SizeChanged { width, height } = event {
            self.size.x = width;
            self.size.y = height;

            self.next_texture.take();
            self.surface.configure(
                &self.device,
                &_create_surface_information(self.surface_format, width, height),
            );

            // Get the next swapchain.
            self.next_texture = Some(self.surface.get_current_texture()?);
        }

        let mut window_context = WindowContext {
            device: &self.device,
            queue: &self.queue,
            surface_format: &self.surface_format,
            size: self.size,
            user_context: self.user_context.borrow_mut(),
        };

        // Let the window handle the event.
        self.window
            .handle_event(&mut window_context, &event)
            .map_err(WindowRunnerError::Window)?;

        Ok(())
    }

    pub fn think(&mut self, delta: Duration) -> Result<(), WindowRunnerError> {
        {
            let user_context_context = UserContextContext {
                device: &self.device,
                queue: &self.queue,
                surface_format: &self.surface_format,
                size: self.size,
            };

            self.user_context
                .think(&user_context_context, delta)
                .map_err(WindowRunnerError::Window)?;
        }

        {
            let mut window_context = WindowContext {
                device: &self.device,
                queue: &self.queue,
                surface_format: &self.surface_format,
                size: self.size,
                user_context: self.user_context.borrow_mut(),
            };

            self.window
                .think(&mut window_context, delta)
                .map_err(WindowRunnerError::Window)
        }
    }

    pub fn draw(&mut self, delta: Duration) -> Result<(), WindowRunnerError> {
        let next_texture = self.next_texture.take().ok_or(WindowRunnerError::NoSwapchain)?;

        let mut window_draw_context = WindowContext {
            device: &self.device,
            queue: &self.queue,
            surface_format: &self.surface_format,
            size: self.size,
            user_context: self.user_context.borrow_mut(),
        };

        // Draw the current window using the stored swapchain.
        self.window
            .draw(&mut window_draw_context, &next_texture.texture, delta)
            .map_err(WindowRunnerError::Window)?;

        next_texture.present();

        // Get the next swapchain.
        self.next_texture = Some(self.surface.get_current_texture()?);

        Ok(())
    }
}
