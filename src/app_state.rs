use crate::canvas::{CanvasLayout, FrameUniforms};
use crate::controller::Controller;
use crate::gallery::Gallery;
use crate::settings::Settings;
use crate::state::{FrameBuffer, GpuContext, InputState, LayerTexture};
use anyhow::Context;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

pub struct State {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    pub gpu: GpuContext<'static>,
    pub frame: FrameBuffer,
    pub committed_layer: LayerTexture,
    pub draft_layer: LayerTexture,
    pub input: InputState,

    pub settings: Settings,
    pub controller: Controller,
    /// `None` when the gallery directory could not be opened.
    pub gallery: Option<Gallery>,
    /// How many pictures back the next `L` press loads, newest first.
    pub gallery_cursor: usize,
}

impl State {
    pub async fn new(window: Arc<Window>, settings: Settings) -> anyhow::Result<State> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to open GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no texture formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let (canvas_width, canvas_height) = settings.canvas_size_for(size.width, size.height);
        let controller = Controller::from_settings(&settings, canvas_width, canvas_height);
        let layout = controller.frame().layout();

        let uniforms = FrameUniforms::new(&layout, (size.width as f32, size.height as f32));
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let layer_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("layer_bind_group_layout"),
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("layer_sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Canvas Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../data/shaders/canvas.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Canvas Pipeline Layout"),
            bind_group_layouts: &[&layer_layout],
            push_constant_ranges: &[],
        });

        // Layers upload premultiplied texels.
        let canvas_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Canvas Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let gpu = GpuContext {
            surface,
            device,
            queue,
            config,
            canvas_pipeline,
            layer_layout,
            sampler,
        };

        let layer_size = (layout.width, layout.height);
        let committed_layer = LayerTexture::new(&gpu, &frame_buffer, layer_size, "committed_layer");
        let draft_layer = LayerTexture::new(&gpu, &frame_buffer, layer_size, "draft_layer");

        let gallery = match Gallery::open(settings.gallery_dir.clone()) {
            Ok(gallery) => Some(gallery),
            Err(err) => {
                log::warn!("gallery disabled: {err}");
                None
            }
        };

        log::info!(
            "canvas {}x{} at ({}, {}), mode {:?}",
            layout.width,
            layout.height,
            layout.left,
            layout.top,
            controller.mode()
        );

        Ok(Self {
            window,
            size,
            gpu,
            frame: FrameBuffer {
                uniforms,
                buffer: frame_buffer,
            },
            committed_layer,
            draft_layer,
            input: InputState {
                cursor: [0.0; 2],
                scroll: [0.0; 2],
            },
            settings,
            controller,
            gallery,
            gallery_cursor: 0,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn canvas_layout(&self) -> CanvasLayout {
        let (width, height) = self.settings.canvas_size_for(self.size.width, self.size.height);
        CanvasLayout {
            left: self.settings.canvas_origin[0] - self.input.scroll[0],
            top: self.settings.canvas_origin[1] - self.input.scroll[1],
            border_left: self.settings.border,
            border_top: self.settings.border,
            width,
            height,
        }
    }
}
