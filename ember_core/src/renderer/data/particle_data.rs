use std::collections::HashMap;

use anyhow::Result;
use ember_config::ParticleShape;
use encase::ShaderType;
use offset_allocator::{Allocation, Allocator};
use ultraviolet::{Vec2, Vec3};
use wgpu::BufferUsages;

use crate::{
    components::{CParticle, CParticleColor, CParticleState},
    renderer::helpers::{
        gpu::{GpuStorageBuffer, GpuVertexBuffer},
        SparseVec,
    },
    world::World,
};

pub const SHAPE_SPRITE: u32 = 0;
pub const SHAPE_RECT: u32 = 1;

#[derive(ShaderType, Clone, Copy, Default)]
pub struct ParticleStorageData {
    pub pos: Vec2,
    pub size: Vec2,

    pub color: Vec3,
    pub opacity: f32,

    pub shape: u32,
}

/// Particles are rendered totally instanced: one storage record per
/// particle, one unit quad expanded in the vertex shader.
///
/// The buffer holds exactly `max_count` records. Slots come from an
/// allocator keyed by entity; each tick we drain the world's changed-set,
/// stage the affected records, and flush them in contiguous runs. Freed
/// slots are zeroed so stale instances collapse to nothing.
pub struct ParticleData {
    /// The basic quad that we'll render for particles.
    pub quad_vertex_buf: GpuVertexBuffer<Vec2>,

    pub particle_buf: GpuStorageBuffer<ParticleStorageData>,

    /// One past the highest slot ever allocated; the instance range we draw.
    pub instance_count: u32,

    particle_alloc: Allocator,
    particle_alloc_by_entity: HashMap<hecs::Entity, Allocation>,
}

impl ParticleData {
    pub fn new(device: &wgpu::Device, world: &World) -> Result<Self> {
        let capacity = world.max_count as u32;

        Ok(Self {
            quad_vertex_buf: GpuVertexBuffer::new_vec(
                BufferUsages::VERTEX,
                device,
                vec![
                    Vec2::new(0., 0.),
                    Vec2::new(1., 0.),
                    Vec2::new(0., 1.),
                    Vec2::new(0., 1.),
                    Vec2::new(1., 0.),
                    Vec2::new(1., 1.),
                ],
                None,
                Some("ParticleData::quad_vertex_buf"),
            )?,

            particle_buf: GpuStorageBuffer::new_vec(
                BufferUsages::STORAGE,
                device,
                Vec::new(),
                Some(capacity as u64),
                Some("ParticleData::particle_buf"),
            )?,

            instance_count: 0,

            particle_alloc: Allocator::new(capacity),
            particle_alloc_by_entity: HashMap::new(),
        })
    }

    pub fn think(&mut self, queue: &wgpu::Queue, world: &World) -> Result<()> {
        let mut staged: SparseVec<ParticleStorageData> = SparseVec::default();

        // First handle changed, which will update the data.
        for id in world.changed_set.changed() {
            let alloc = match self.particle_alloc_by_entity.get(id) {
                Some(alloc) => *alloc,
                None => continue,
            };

            staged.insert(alloc.offset as usize, _create_particle(world, *id)?);
        }

        // Next handle removed, freeing the slot and zeroing it on the GPU.
        for id in world.changed_set.removed() {
            if let Some(alloc) = self.particle_alloc_by_entity.remove(id) {
                self.particle_alloc.free(alloc);
                staged.insert(alloc.offset as usize, ParticleStorageData::default());
            }
        }

        // Lastly handle spawned, which will add new particles. A slot freed
        // above can be reallocated here; the staged spawn record wins.
        for id in world.changed_set.spawned() {
            if !world.world.satisfies::<&CParticle>(*id)? {
                continue;
            }

            let alloc = self
                .particle_alloc
                .allocate(1)
                .ok_or(anyhow::anyhow!("Particle allocation failed, out of space!"))?;

            self.particle_alloc_by_entity.insert(*id, alloc);
            self.instance_count = self.instance_count.max(alloc.offset + 1);

            staged.insert(alloc.offset as usize, _create_particle(world, *id)?);
        }

        // Flush the staged records in contiguous runs.
        let stride = self.particle_buf.stride;
        for (start, items) in staged {
            self.particle_buf
                .write_vec_to_offset(queue, items, start * stride)?;
        }

        Ok(())
    }
}

fn _create_particle(world: &World, id: hecs::Entity) -> Result<ParticleStorageData> {
    let mut query = world
        .world
        .query_one::<(&CParticle, &CParticleState, &CParticleColor)>(id)?;
    let (particle, state, color) = query
        .get()
        .ok_or(anyhow::anyhow!("Particle entity is missing components."))?;

    let shape = match particle.settings.shape {
        ParticleShape::Sprite => SHAPE_SPRITE,
        ParticleShape::Rect { .. } => SHAPE_RECT,
    };

    Ok(ParticleStorageData {
        pos: state.pos,
        size: particle.settings.size,

        color: color.color,
        opacity: color.opacity,

        shape,
    })
}
