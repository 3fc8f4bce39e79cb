//! wgpu Renderer
//!
//! This module handles all wgpu initialization and presents the picker frame.
//! The frame is painted on the CPU, uploaded to a texture and blitted onto the
//! surface, letterboxed so the picker keeps its aspect ratio.

use wgpu::util::DeviceExt;

use crate::debug;
use crate::error::{PickerError, PickerResult};
use crate::surface::PixelBuffer;

/// Uniforms for blit shader
#[repr(C, align(16))] // Force 16-byte alignment for WebGL compatibility
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct BlitUniforms {
    scale: [f32; 2],
    encode_srgb: u32, // 0 = surface encodes, 1 = shader encodes
    _padding: u32,
}

/// Placement of the frame inside the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Fraction of the surface covered on each axis
    pub scale: [f32; 2],
    /// Top-left corner of the frame in surface pixels
    pub offset: [f32; 2],
    /// Surface pixels per frame pixel
    pub zoom: f32,
}

impl Letterbox {
    /// Fit a frame into a surface, centered, preserving aspect ratio
    pub fn fit(frame: (u32, u32), surface: (u32, u32)) -> Self {
        let (fw, fh) = (frame.0.max(1) as f32, frame.1.max(1) as f32);
        let (sw, sh) = (surface.0.max(1) as f32, surface.1.max(1) as f32);

        let zoom = (sw / fw).min(sh / fh);
        let (dw, dh) = (fw * zoom, fh * zoom);

        Self {
            scale: [dw / sw, dh / sh],
            offset: [(sw - dw) / 2.0, (sh - dh) / 2.0],
            zoom,
        }
    }

    /// Convert a surface pixel position into frame pixels (unclamped)
    pub fn surface_to_frame(&self, position: [f32; 2]) -> [f32; 2] {
        [
            (position[0] - self.offset[0]) / self.zoom,
            (position[1] - self.offset[1]) / self.zoom,
        ]
    }
}

/// Renderer wraps the wgpu device, queue, and surface
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    max_texture_dimension: u32,
    /// Whether the shader must sRGB-encode (non-sRGB surface)
    encode_srgb: bool,

    // Picker frame, written from the CPU
    frame_size: (u32, u32),
    frame_texture: wgpu::Texture,
    letterbox: Letterbox,

    // Blit pipeline for copying the frame to the surface
    blit_pipeline: wgpu::RenderPipeline,
    blit_uniform_buffer: wgpu::Buffer,
    blit_bind_group: wgpu::BindGroup,
}

impl Renderer {
    /// Create a new renderer
    ///
    /// # Arguments
    /// * `window` - The window to render to
    /// * `size` - Initial surface size
    /// * `frame_size` - Size of the picker frame that will be uploaded
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: winit::dpi::PhysicalSize<u32>,
        frame_size: (u32, u32),
    ) -> PickerResult<Self> {
        log::info!("🔧 Renderer::new() starting...");
        debug::update_status("Creating wgpu instance...");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all() & !wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        debug::update_status("Creating surface...");
        let surface = instance
            .create_surface(window)
            .map_err(|e| renderer_error("Failed to create surface", e))?;
        log::info!("✅ Surface created");

        debug::update_status("Requesting adapter...");
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| renderer_error("Failed to find suitable adapter", e))?;

        let adapter_info = adapter.get_info();
        log::info!("✅ Adapter acquired: {:?} (backend: {:?})", adapter_info.name, adapter_info.backend);
        debug::update_status(&format!("Using: {:?}", adapter_info.backend));

        let adapter_limits = adapter.limits();
        let max_texture_dimension = adapter_limits.max_texture_dimension_2d;
        log::info!("📏 Max texture dimension: {}", max_texture_dimension);

        if frame_size.0 > max_texture_dimension || frame_size.1 > max_texture_dimension {
            return Err(renderer_error(
                "Picker frame exceeds max texture size",
                (frame_size, max_texture_dimension),
            ));
        }

        // WebGL2 baseline, raised to whatever resolution the adapter supports
        let device_limits = wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter_limits);

        debug::update_status("Creating device...");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Color Picker Device"),
                required_features: wgpu::Features::empty(),
                required_limits: device_limits,
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| renderer_error("Failed to create device", e))?;
        log::info!("✅ Device and queue created");

        debug::update_status("Configuring surface...");
        let surface_caps = surface.get_capabilities(&adapter);
        log::info!(
            "Surface capabilities: formats={:?}, present_modes={:?}",
            surface_caps.formats,
            surface_caps.present_modes
        );

        // Prefer sRGB formats so the hardware encodes on write
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| renderer_error("Surface reports no formats", &adapter_info.name))?;
        let encode_srgb = !surface_format.is_srgb();
        log::info!("Selected surface format: {:?} (shader encode: {})", surface_format, encode_srgb);

        let present_mode = surface_caps
            .present_modes
            .first()
            .copied()
            .unwrap_or(wgpu::PresentMode::Fifo);
        // Opaque keeps the page background from showing through the canvas
        let alpha_mode = if surface_caps.alpha_modes.contains(&wgpu::CompositeAlphaMode::Opaque) {
            wgpu::CompositeAlphaMode::Opaque
        } else {
            wgpu::CompositeAlphaMode::Auto
        };

        let (width, height) = clamp_size(size, max_texture_dimension);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        // Only configure if size is valid, otherwise wait for resize
        if config.width > 0 && config.height > 0 {
            surface.configure(&device, &config);
            log::info!("✅ Surface configured: {}x{}", config.width, config.height);
        } else {
            log::warn!("Skipping surface configuration (invalid size: {}x{})", config.width, config.height);
        }

        let frame_texture = Self::create_frame_texture(&device, frame_size);
        let frame_view = frame_texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::info!("✅ Frame texture created: {}x{}", frame_size.0, frame_size.1);

        // Nearest filtering keeps picked pixels exact at 1:1 zoom
        let frame_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Frame Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let letterbox = Letterbox::fit(frame_size, (width, height));
        let blit_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Blit Uniform Buffer"),
            contents: bytemuck::cast_slice(&[blit_uniforms(&letterbox, encode_srgb)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let (blit_pipeline, blit_bind_group_layout) = Self::create_blit_pipeline(&device, surface_format);
        log::info!("✅ Blit pipeline created");

        let blit_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blit Bind Group"),
            layout: &blit_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&frame_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&frame_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: blit_uniform_buffer.as_entire_binding(),
                },
            ],
        });

        debug::update_status("✅ Renderer complete!");
        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            max_texture_dimension,
            encode_srgb,
            frame_size,
            frame_texture,
            letterbox,
            blit_pipeline,
            blit_uniform_buffer,
            blit_bind_group,
        })
    }

    /// Create the texture the picker frame is uploaded into
    fn create_frame_texture(device: &wgpu::Device, (width, height): (u32, u32)) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Frame Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            // Painted bytes are sRGB-encoded
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
    }

    /// Create the blit pipeline for copying the frame to the surface
    fn create_blit_pipeline(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
    ) -> (wgpu::RenderPipeline, wgpu::BindGroupLayout) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blit.wgsl").into()),
        });

        // Texture, sampler and uniforms
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Blit Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blit Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group_layout)
    }

    /// Resize the surface
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;

        let (width, height) = clamp_size(new_size, self.max_texture_dimension);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.letterbox = Letterbox::fit(self.frame_size, (width, height));
        self.queue.write_buffer(
            &self.blit_uniform_buffer,
            0,
            bytemuck::cast_slice(&[blit_uniforms(&self.letterbox, self.encode_srgb)]),
        );

        log::debug!("Surface resized to: {}x{}, letterbox: {:?}", width, height, self.letterbox);
    }

    /// Upload the composed picker frame
    pub fn upload_frame(&mut self, frame: &PixelBuffer) {
        if (frame.width(), frame.height()) != self.frame_size {
            log::warn!(
                "Frame {}x{} does not match texture {}x{}, skipping upload",
                frame.width(),
                frame.height(),
                self.frame_size.0,
                self.frame_size.1
            );
            return;
        }

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.frame_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            frame.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * frame.width()),
                rows_per_image: Some(frame.height()),
            },
            wgpu::Extent3d {
                width: frame.width(),
                height: frame.height(),
                depth_or_array_layers: 1,
            },
        );
        log::debug!("Uploaded {}x{} frame", frame.width(), frame.height());
    }

    /// Render a frame (blit the picker to the surface)
    pub fn render(&mut self) {
        if self.config.width == 0 || self.config.height == 0 {
            log::warn!("Invalid surface state, skipping render");
            return;
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::error!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Blit Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // Letterbox bars
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.12,
                            g: 0.12,
                            b: 0.12,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.blit_pipeline);
            render_pass.set_bind_group(0, &self.blit_bind_group, &[]);
            render_pass.draw(0..6, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Get the current surface size
    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }

    /// Where the frame sits on the surface
    pub fn letterbox(&self) -> Letterbox {
        self.letterbox
    }
}

fn blit_uniforms(letterbox: &Letterbox, encode_srgb: bool) -> BlitUniforms {
    BlitUniforms {
        scale: letterbox.scale,
        encode_srgb: encode_srgb as u32,
        _padding: 0,
    }
}

/// Clamp a surface size to the max texture dimension
fn clamp_size(size: winit::dpi::PhysicalSize<u32>, max_texture_dimension: u32) -> (u32, u32) {
    let width = size.width.min(max_texture_dimension);
    let height = size.height.min(max_texture_dimension);
    if width != size.width || height != size.height {
        log::warn!(
            "⚠️ Surface size {}x{} exceeds max texture size {}, clamping to {}x{}",
            size.width,
            size.height,
            max_texture_dimension,
            width,
            height
        );
    }
    (width, height)
}

/// Log a GPU setup failure and turn it into a `PickerError`
fn renderer_error(context: &str, err: impl std::fmt::Debug) -> PickerError {
    let msg = format!("{}: {:?}", context, err);
    log::error!("❌ {}", msg);
    debug::update_status(&format!("❌ {}", msg));
    PickerError::Renderer(msg)
}
