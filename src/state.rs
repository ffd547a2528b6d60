use crate::canvas::FrameUniforms;
use crate::raster::{Raster, Surface as _};
use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, Queue, RenderPipeline, Sampler, Surface, SurfaceConfiguration, Texture};

pub struct GpuContext<'a> {
    pub surface: Surface<'a>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
    pub canvas_pipeline: RenderPipeline,
    pub layer_layout: BindGroupLayout,
    pub sampler: Sampler,
}

pub struct FrameBuffer {
    pub uniforms: FrameUniforms,
    pub buffer: Buffer,
}

/// GPU copy of one raster. Re-uploaded only when the raster's revision moves.
pub struct LayerTexture {
    label: &'static str,
    texture: Texture,
    pub bind_group: BindGroup,
    size: (u32, u32),
    uploaded_revision: Option<u64>,
}

impl LayerTexture {
    pub fn new(gpu: &GpuContext, frame: &Buffer, size: (u32, u32), label: &'static str) -> Self {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent(size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &gpu.layer_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&gpu.sampler),
                },
            ],
            label: Some(label),
        });

        Self {
            label,
            texture,
            bind_group,
            size,
            uploaded_revision: None,
        }
    }

    /// Brings the texture in line with `raster`, recreating it after a resize.
    pub fn sync(&mut self, gpu: &GpuContext, frame: &Buffer, raster: &Raster) {
        let size = raster.dimensions();
        if size != self.size {
            log::debug!("recreating {} texture at {}x{}", self.label, size.0, size.1);
            *self = Self::new(gpu, frame, size, self.label);
        }
        if size.0 == 0 || size.1 == 0 || self.uploaded_revision == Some(raster.revision()) {
            return;
        }

        gpu.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            raster.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.0),
                rows_per_image: Some(size.1),
            },
            extent(size),
        );
        self.uploaded_revision = Some(raster.revision());
    }
}

fn extent((width, height): (u32, u32)) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: width.max(1),
        height: height.max(1),
        depth_or_array_layers: 1,
    }
}

pub struct InputState {
    pub cursor: [f32; 2],
    /// Accumulated wheel scroll applied to the canvas position.
    pub scroll: [f32; 2],
}
