use anyhow::Result;

/// Side length of the generated sprite mask.
const SPRITE_TEXTURE_SIZE: u32 = 64;

/// The sprite mask every [super::SHAPE_SPRITE] particle samples: a radial
/// falloff generated at startup, replacing a baked image asset. The
/// fragment shader raises it to the r_softness cvar.
pub struct SpriteTextureData {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

fn _falloff_pixels(size: u32) -> Vec<u8> {
    let center = (size as f32 - 1.0) / 2.0;
    let mut pixels = vec![0u8; (size * size) as usize];

    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 - center) / center;
            let dy = (y as f32 - center) / center;
            let r = (dx * dx + dy * dy).sqrt();

            let mask = (1.0 - r).clamp(0.0, 1.0);
            pixels[(y * size + x) as usize] = (mask * 255.0) as u8;
        }
    }

    pixels
}

impl SpriteTextureData {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Self> {
        let size = SPRITE_TEXTURE_SIZE;
        let pixels = _falloff_pixels(size);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("SpriteTextureData::texture"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(size),
                rows_per_image: Some(size),
            },
            wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("SpriteTextureData::sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            sampler,
        })
    }

    pub fn texture_bind_group_layout_entry(&self, binding: u32) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        }
    }

    pub fn sampler_bind_group_layout_entry(&self, binding: u32) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        }
    }

    pub fn texture_bind_group_descriptor_entry(&self, binding: u32) -> wgpu::BindGroupEntry {
        wgpu::BindGroupEntry {
            binding,
            resource: wgpu::BindingResource::TextureView(&self.view),
        }
    }

    pub fn sampler_bind_group_descriptor_entry(&self, binding: u32) -> wgpu::BindGroupEntry {
        wgpu::BindGroupEntry {
            binding,
            resource: wgpu::BindingResource::Sampler(&self.sampler),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falloff_peaks_at_center_and_fades_out() {
        let size = SPRITE_TEXTURE_SIZE;
        let pixels = _falloff_pixels(size);

        let center = ((size / 2) * size + size / 2) as usize;
        assert!(pixels[center] > 240);

        // Corners are outside the unit circle.
        assert_eq!(pixels[0], 0);
        assert_eq!(pixels[(size * size - 1) as usize], 0);
    }
}
