use std::{borrow::Cow, time::Duration};

use wgpu::ShaderStages;
use wgpu_pp::include_wgsl;

use anyhow::Result;
use ultraviolet::UVec2;

use crate::{
    cvars::CVarUniforms,
    renderer::helpers::{
        gpu::{GpuFrameTexture, GpuFrameTextureDescriptor},
        system::{SystemEvent, SystemKeycode},
        window::{Window, WindowContext, WindowSetup},
    },
};

use super::{
    data::ParticleData, helpers::EmitterController, main_user_context::MainUserContext,
};

pub struct MainWindow {
    emitter_controller: EmitterController,

    bind_group: wgpu::BindGroup,
    render_pipeline: wgpu::RenderPipeline,

    msaa_texture: GpuFrameTexture,
}

fn _create_particle_render_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    pipeline_layout: &wgpu::PipelineLayout,
    particle_data: &ParticleData,
    cvars: &CVarUniforms,
) -> wgpu::RenderPipeline {
    let vertex_state = wgpu::VertexState {
        buffers: &[wgpu::VertexBufferLayout {
            array_stride: particle_data.quad_vertex_buf.stride as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            }],
        }],
        module: shader,
        entry_point: "vs_main",
        compilation_options: Default::default(),
    };

    let fragment_state = Some(wgpu::FragmentState {
        targets: &[Some(wgpu::ColorTargetState {
            format: wgpu::TextureFormat::Bgra8UnormSrgb,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        })],
        module: shader,
        entry_point: "fs_main",
        compilation_options: Default::default(),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        layout: Some(pipeline_layout),
        vertex: vertex_state,
        fragment: fragment_state,
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Quads are camera-facing, so nothing to cull.
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: None,
        label: None,
        multisample: wgpu::MultisampleState {
            count: cvars.r_msaa,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

use MainUserContext as UC;

pub fn main_window() -> impl WindowSetup<UC> {
    move |context: &WindowContext<UC>, size: UVec2| {
        let device = context.device;

        let ubo = &context.user_context.ubo;

        let particle_data = &context.user_context.particle_data;
        let sprite_texture_data = &context.user_context.sprite_texture_data;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_wgsl!(
                "./shaders/particle.wgsl"
            ))),
        });

        let world = context.user_context.world.clone();
        let cvars = CVarUniforms::from_cvars(&world.borrow().cvars);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                ubo.bind_group_layout_entry(0, ShaderStages::all()),
                particle_data
                    .particle_buf
                    .bind_group_layout_entry(1, ShaderStages::VERTEX),
                sprite_texture_data.texture_bind_group_layout_entry(2),
                sprite_texture_data.sampler_bind_group_layout_entry(3),
            ],
            label: Some("bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                ubo.bind_group_descriptor_entry(0),
                particle_data.particle_buf.bind_group_descriptor_entry(1),
                sprite_texture_data.texture_bind_group_descriptor_entry(2),
                sprite_texture_data.sampler_bind_group_descriptor_entry(3),
            ],
            label: Some("bind_group"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            bind_group_layouts: &[&bind_group_layout],
            label: None,
            push_constant_ranges: &[],
        });

        let render_pipeline =
            _create_particle_render_pipeline(device, &shader, &pipeline_layout, particle_data, &cvars);

        let msaa_texture = GpuFrameTexture::new(
            device,
            &size,
            GpuFrameTextureDescriptor {
                label: Some("MainWindow::msaa_texture"),
                sample_count: cvars.r_msaa,
                ..Default::default()
            },
        );

        Ok(Box::new(MainWindow {
            emitter_controller: EmitterController::new(),

            bind_group,
            render_pipeline,

            msaa_texture,
        }) as Box<dyn Window<UC>>)
    }
}

impl Window<UC> for MainWindow {
    fn handle_event(
        &mut self,
        context: &mut WindowContext<UC>,
        event: &SystemEvent,
    ) -> Result<bool> {
        if let SystemEvent::KeyDown { keycode, .. } = event {
            if *keycode == SystemKeycode::Space {
                let world = context.user_context.world.clone();
                let mut world = world.borrow_mut();
                world.paused = !world.paused;
                return Ok(true);
            }
        }

        self.emitter_controller.handle_event(event);
        Ok(false)
    }

    fn think(&mut self, context: &mut WindowContext<UC>, delta: Duration) -> Result<()> {
        let world = context.user_context.world.clone();
        let mut world = world.borrow_mut();

        self.emitter_controller.think(&mut world, delta, context.size)
    }

    fn draw(
        &mut self,
        context: &mut WindowContext<UC>,
        texture: &wgpu::Texture,
        _delta: Duration,
    ) -> Result<()> {
        let device = context.device;
        let queue = context.queue;

        let particle_data = &context.user_context.particle_data;

        let output = self
            .msaa_texture
            .create_texture(device, &context.size)
            .create_view(&wgpu::TextureViewDescriptor::default());
        let output_final = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("command_encoder"),
        });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &output,
                    resolve_target: Some(&output_final),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                label: Some("MainWindow::render_pass"),
                ..Default::default()
            });

            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(0, particle_data.quad_vertex_buf.buf.slice(..));

            rpass.set_pipeline(&self.render_pipeline);
            rpass.draw(0..6, 0..particle_data.instance_count);
        }

        queue.submit([encoder.finish()]);
        Ok(())
    }
}
