use std::collections::HashMap;

use anyhow::{anyhow, Result};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use wgpu::{
    vertex_attr_array, AddressMode, BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout,
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingResource, BindingType, Buffer,
    BufferBindingType, BufferUsages, ColorTargetState, ColorWrites, CommandEncoderDescriptor,
    CompositeAlphaMode, DeviceDescriptor, Extent3d, FilterMode, FragmentState, Instance, LoadOp,
    MultisampleState, Operations, Origin3d, PipelineLayoutDescriptor, PresentMode, PrimitiveState,
    RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline, RenderPipelineDescriptor,
    RequestAdapterOptions, Sampler, SamplerBindingType, SamplerDescriptor, ShaderModuleDescriptor,
    ShaderSource, SurfaceConfiguration, TexelCopyBufferLayout, TexelCopyTextureInfo, Texture,
    TextureAspect, TextureDescriptor, TextureDimension, TextureFormat, TextureSampleType,
    TextureUsages, TextureView, TextureViewDescriptor, TextureViewDimension, VertexState,
};
use winit::{dpi::PhysicalSize, window::Window};

use crate::math::{Rect, Vec2};
use crate::render::text::TextRasterizer;
use crate::render::{Color, DrawList, Drawable, Letterbox, TextAlign};

/// Quads beyond this count in one frame are dropped.
const MAX_QUADS_PER_FRAME: usize = 4096;
/// Rasterised strings kept on the GPU before the cache is flushed.
const MAX_CACHED_TEXTS: usize = 256;
const LETTERBOX_COLOR: Color = [0.0, 0.0, 0.0, 1.0];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct TextureHandle(u32);

/// Draws a [`DrawList`] to a window through wgpu.
pub struct Renderer<'window> {
    backend: WgpuBackend<'window>,
}

impl<'window> Renderer<'window> {
    /// `virtual_size` is the canvas the game draws on; it is letterboxed
    /// into the window.
    pub fn new(window: &'window Window, vsync: bool, virtual_size: Vec2) -> Result<Self> {
        let backend = WgpuBackend::new(window, vsync, virtual_size)?;
        Ok(Self { backend })
    }

    /// Font used for [`Drawable::Text`]. Without one, text is skipped.
    pub fn set_font(&mut self, font: TextRasterizer) {
        self.backend.font = Some(font);
        self.backend.clear_text_cache();
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.backend.resize(new_size);
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.backend.surface_config.width, self.backend.surface_config.height)
    }

    /// Current mapping from the virtual canvas to the window.
    pub fn letterbox(&self) -> Letterbox {
        self.backend.letterbox()
    }

    /// Draw one frame: letterbox bars, the canvas background, then `list`
    /// back to front.
    pub fn render(&mut self, list: &DrawList, background: Color) -> Result<()> {
        self.backend.render(list, background)
    }
}

struct Frame {
    surface_texture: wgpu::SurfaceTexture,
    view: TextureView,
}

struct TextureEntry {
    /// Kept alive for the view and sampler.
    #[allow(dead_code)]
    texture: Texture,
    view: TextureView,
    sampler: Sampler,
}

struct QuadPipeline {
    pipeline: RenderPipeline,
    vertex_buffer: Buffer,
    uniform_buffer: Buffer,
    bind_group_layout: BindGroupLayout,
    uniform_alignment: u64,
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct QuadVertex {
    position: [f32; 2],
    uv: [f32; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct QuadUniforms {
    transform: [[f32; 4]; 4],
    color: [f32; 4],
}

// Unit quad, top-left origin.
const QUAD_VERTICES: [QuadVertex; 6] = [
    QuadVertex {
        position: [0.0, 0.0],
        uv: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 0.0],
        uv: [1.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 1.0],
        uv: [1.0, 1.0],
    },
    QuadVertex {
        position: [0.0, 0.0],
        uv: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 1.0],
        uv: [1.0, 1.0],
    },
    QuadVertex {
        position: [0.0, 1.0],
        uv: [0.0, 1.0],
    },
];

/// A textured, tinted rectangle in physical pixels.
struct Quad {
    texture: TextureHandle,
    rect: Rect,
    color: Color,
}

struct WgpuBackend<'window> {
    surface: wgpu::Surface<'window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: SurfaceConfiguration,
    present_mode: PresentMode,
    quad_pipeline: QuadPipeline,
    textures: HashMap<TextureHandle, TextureEntry>,
    next_texture_id: u32,
    white_texture: TextureHandle,
    font: Option<TextRasterizer>,
    /// (text, size bits) -> texture and size in canvas pixels. `None` marks
    /// strings with nothing to draw.
    text_cache: HashMap<(String, u32), Option<(TextureHandle, Vec2)>>,
    virtual_size: Vec2,
    dropped_quads_logged: bool,
}

impl<'window> WgpuBackend<'window> {
    fn new(window: &'window Window, vsync: bool, virtual_size: Vec2) -> Result<Self> {
        let instance = Instance::default();
        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))?;

        let (device, queue) = pollster::block_on(adapter.request_device(&DeviceDescriptor {
            label: Some("brickrun-device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: Default::default(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
        }))?;

        let size = window.inner_size();
        let capabilities = surface.get_capabilities(&adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .or_else(|| capabilities.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface reports no supported formats"))?;

        let present_mode = choose_present_mode(&capabilities.present_modes, vsync);
        let alpha_mode = choose_alpha_mode(&capabilities.alpha_modes);

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let quad_pipeline = create_quad_pipeline(&device, format);

        let mut backend = Self {
            surface,
            device,
            queue,
            surface_config,
            present_mode,
            quad_pipeline,
            textures: HashMap::new(),
            next_texture_id: 1,
            white_texture: TextureHandle(0),
            font: None,
            text_cache: HashMap::new(),
            virtual_size,
            dropped_quads_logged: false,
        };
        // Plain rectangles are drawn with a 1x1 white texture.
        backend.white_texture = backend.load_texture_from_rgba(&[255, 255, 255, 255], 1, 1)?;
        log::info!(
            "Renderer ready: {}x{} surface, format {:?}, {:?}",
            backend.surface_config.width,
            backend.surface_config.height,
            format,
            present_mode
        );
        Ok(backend)
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface_config.present_mode = self.present_mode;
        self.surface.configure(&self.device, &self.surface_config);
    }

    fn letterbox(&self) -> Letterbox {
        Letterbox::fit(
            self.virtual_size,
            Vec2::new(self.surface_config.width as f64, self.surface_config.height as f64),
        )
    }

    fn render(&mut self, list: &DrawList, background: Color) -> Result<()> {
        let letterbox = self.letterbox();
        let quads = self.build_quads(list, &letterbox, background)?;

        let Some(frame) = self.acquire_frame()? else {
            return Ok(());
        };

        let alignment = self.quad_pipeline.uniform_alignment as usize;
        let projection = Mat4::orthographic_rh(
            0.0,
            self.surface_config.width as f32,
            self.surface_config.height as f32,
            0.0,
            -1.0,
            1.0,
        );
        let linear = self.surface_config.format.is_srgb();
        let mut uniform_bytes = vec![0u8; quads.len() * alignment];
        for (i, quad) in quads.iter().enumerate() {
            let model = Mat4::from_translation(Vec3::new(quad.rect.x as f32, quad.rect.y as f32, 0.0))
                * Mat4::from_scale(Vec3::new(quad.rect.w as f32, quad.rect.h as f32, 1.0));
            let color = if linear { srgb_to_linear(quad.color) } else { quad.color };
            let uniforms = QuadUniforms {
                transform: (projection * model).to_cols_array_2d(),
                color,
            };
            let start = i * alignment;
            let bytes = bytemuck::bytes_of(&uniforms);
            uniform_bytes[start..start + bytes.len()].copy_from_slice(bytes);
        }
        if !uniform_bytes.is_empty() {
            self.queue
                .write_buffer(&self.quad_pipeline.uniform_buffer, 0, &uniform_bytes);
        }

        let mut bind_groups: HashMap<TextureHandle, BindGroup> = HashMap::new();
        for quad in &quads {
            if bind_groups.contains_key(&quad.texture) {
                continue;
            }
            let texture = self
                .textures
                .get(&quad.texture)
                .ok_or_else(|| anyhow!("Unknown texture handle"))?;
            bind_groups.insert(quad.texture, self.create_bind_group(texture));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("quad-pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(wgpu::Color {
                            r: LETTERBOX_COLOR[0] as f64,
                            g: LETTERBOX_COLOR[1] as f64,
                            b: LETTERBOX_COLOR[2] as f64,
                            a: LETTERBOX_COLOR[3] as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                multiview_mask: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some((x, y, w, h)) = self.scissor(&letterbox) {
                pass.set_scissor_rect(x, y, w, h);
                pass.set_pipeline(&self.quad_pipeline.pipeline);
                pass.set_vertex_buffer(0, self.quad_pipeline.vertex_buffer.slice(..));
                for (i, quad) in quads.iter().enumerate() {
                    if let Some(bind_group) = bind_groups.get(&quad.texture) {
                        pass.set_bind_group(0, bind_group, &[(i * alignment) as u32]);
                        pass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
                    }
                }
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.surface_texture.present();
        Ok(())
    }

    fn build_quads(&mut self, list: &DrawList, letterbox: &Letterbox, background: Color) -> Result<Vec<Quad>> {
        let mut quads = vec![Quad {
            texture: self.white_texture,
            rect: letterbox.viewport(),
            color: background,
        }];

        for command in list.sorted() {
            match &command.drawable {
                Drawable::ColorRect { color } => quads.push(Quad {
                    texture: self.white_texture,
                    rect: letterbox.to_physical(&command.rect),
                    color: *color,
                }),
                Drawable::Text {
                    text,
                    size,
                    color,
                    background,
                    align,
                } => {
                    if let Some(fill) = background {
                        quads.push(Quad {
                            texture: self.white_texture,
                            rect: letterbox.to_physical(&command.rect),
                            color: *fill,
                        });
                    }
                    let Some((texture, text_size)) = self.text_texture(text, *size)? else {
                        continue;
                    };
                    let x = match align {
                        TextAlign::Left => command.rect.x,
                        TextAlign::Center => command.rect.x + (command.rect.w - text_size.x) / 2.0,
                    };
                    let y = command.rect.y + (command.rect.h - text_size.y) / 2.0;
                    quads.push(Quad {
                        texture,
                        rect: letterbox.to_physical(&Rect::from_position_size(Vec2::new(x, y), text_size)),
                        color: *color,
                    });
                }
            }
        }

        if quads.len() > MAX_QUADS_PER_FRAME {
            if !self.dropped_quads_logged {
                log::warn!(
                    "Frame has {} quads, drawing only the first {}",
                    quads.len(),
                    MAX_QUADS_PER_FRAME
                );
                self.dropped_quads_logged = true;
            }
            quads.truncate(MAX_QUADS_PER_FRAME);
        }
        Ok(quads)
    }

    fn text_texture(&mut self, text: &str, size: f32) -> Result<Option<(TextureHandle, Vec2)>> {
        let Some(font) = &self.font else {
            return Ok(None);
        };
        let key = (text.to_string(), size.to_bits());
        if let Some(cached) = self.text_cache.get(&key) {
            return Ok(*cached);
        }

        let image = font.rasterize(text, size);
        if self.text_cache.len() >= MAX_CACHED_TEXTS {
            self.clear_text_cache();
        }
        let entry = match image {
            Some(image) => {
                let handle = self.load_texture_from_rgba(&image.pixels, image.width, image.height)?;
                Some((handle, Vec2::new(image.width as f64, image.height as f64)))
            }
            None => None,
        };
        self.text_cache.insert(key, entry);
        Ok(entry)
    }

    fn clear_text_cache(&mut self) {
        for (handle, _) in self.text_cache.drain().filter_map(|(_, entry)| entry) {
            self.textures.remove(&handle);
        }
    }

    fn acquire_frame(&mut self) -> Result<Option<Frame>> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(surface_texture) => surface_texture,
            Err(e) => match e {
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                    self.surface.configure(&self.device, &self.surface_config);
                    return Ok(None);
                }
                wgpu::SurfaceError::Timeout => {
                    log::debug!("Surface timed out, skipping frame");
                    return Ok(None);
                }
                wgpu::SurfaceError::OutOfMemory => {
                    return Err(anyhow!("Surface ran out of memory"));
                }
                wgpu::SurfaceError::Other => {
                    return Err(anyhow!("Surface error: Other"));
                }
            },
        };
        let view = surface_texture
            .texture
            .create_view(&TextureViewDescriptor::default());
        Ok(Some(Frame {
            surface_texture,
            view,
        }))
    }

    fn scissor(&self, letterbox: &Letterbox) -> Option<(u32, u32, u32, u32)> {
        let viewport = letterbox.viewport();
        let max_w = self.surface_config.width;
        let max_h = self.surface_config.height;
        let x = (viewport.x.max(0.0).floor() as u32).min(max_w);
        let y = (viewport.y.max(0.0).floor() as u32).min(max_h);
        let w = (viewport.w.max(0.0).ceil() as u32).min(max_w - x);
        let h = (viewport.h.max(0.0).ceil() as u32).min(max_h - y);
        (w > 0 && h > 0).then_some((x, y, w, h))
    }

    fn create_bind_group(&self, texture: &TextureEntry) -> BindGroup {
        let uniform_size = std::mem::size_of::<QuadUniforms>() as u64;
        self.device.create_bind_group(&BindGroupDescriptor {
            label: Some("quad-bind-group"),
            layout: &self.quad_pipeline.bind_group_layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &self.quad_pipeline.uniform_buffer,
                        offset: 0,
                        size: std::num::NonZeroU64::new(uniform_size),
                    }),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::TextureView(&texture.view),
                },
                BindGroupEntry {
                    binding: 2,
                    resource: BindingResource::Sampler(&texture.sampler),
                },
            ],
        })
    }

    /// Upload RGBA8 pixels. `data` must be `width * height * 4` bytes.
    fn load_texture_from_rgba(&mut self, data: &[u8], width: u32, height: u32) -> Result<TextureHandle> {
        if data.len() != (width * height * 4) as usize {
            return Err(anyhow!(
                "Texture data is {} bytes, expected {}x{}x4",
                data.len(),
                width,
                height
            ));
        }
        let size = Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = self.device.create_texture(&TextureDescriptor {
            label: Some("texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: Origin3d::ZERO,
                aspect: TextureAspect::All,
            },
            data,
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&TextureViewDescriptor::default());
        let sampler = self.device.create_sampler(&SamplerDescriptor {
            label: Some("quad-sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            address_mode_w: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let handle = TextureHandle(self.next_texture_id);
        self.next_texture_id += 1;
        self.textures.insert(
            handle,
            TextureEntry {
                texture,
                view,
                sampler,
            },
        );
        Ok(handle)
    }
}

fn create_quad_pipeline(device: &wgpu::Device, surface_format: TextureFormat) -> QuadPipeline {
    let shader = device.create_shader_module(ShaderModuleDescriptor {
        label: Some("quad-shader"),
        source: ShaderSource::Wgsl(include_str!("quad.wgsl").into()),
    });

    let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("quad-bind-group-layout"),
        entries: &[
            BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<QuadUniforms>() as u64,
                    ),
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: true },
                    view_dimension: TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: BindingType::Sampler(SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });

    let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: Some("quad-pipeline-layout"),
        bind_group_layouts: &[&bind_group_layout],
        immediate_size: 0,
    });

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("quad-vertices"),
        contents: bytemuck::cast_slice(&QUAD_VERTICES),
        usage: BufferUsages::VERTEX,
    });

    // Each quad's uniforms sit at their own aligned offset (usually 256 bytes).
    let uniform_size = std::mem::size_of::<QuadUniforms>() as u64;
    let min_alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
    let uniform_alignment = uniform_size.div_ceil(min_alignment) * min_alignment;

    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("quad-uniform-buffer"),
        size: uniform_alignment * MAX_QUADS_PER_FRAME as u64,
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some("quad-pipeline"),
        layout: Some(&pipeline_layout),
        vertex: VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &vertex_attr_array![0 => Float32x2, 1 => Float32x2],
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: PrimitiveState::default(),
        depth_stencil: None,
        multisample: MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    QuadPipeline {
        pipeline,
        vertex_buffer,
        uniform_buffer,
        bind_group_layout,
        uniform_alignment,
    }
}

fn choose_present_mode(modes: &[PresentMode], vsync: bool) -> PresentMode {
    if vsync {
        modes
            .iter()
            .copied()
            .find(|mode| matches!(mode, PresentMode::Fifo | PresentMode::FifoRelaxed))
            .unwrap_or(PresentMode::Fifo)
    } else {
        modes
            .iter()
            .copied()
            .find(|mode| matches!(mode, PresentMode::Immediate | PresentMode::Mailbox))
            .unwrap_or(PresentMode::Fifo)
    }
}

fn choose_alpha_mode(modes: &[CompositeAlphaMode]) -> CompositeAlphaMode {
    modes
        .iter()
        .copied()
        .find(|mode| matches!(mode, CompositeAlphaMode::Auto))
        .unwrap_or_else(|| modes.first().copied().unwrap_or(CompositeAlphaMode::Opaque))
}

// Palette colours are authored in sRGB; an sRGB surface expects linear values.
fn srgb_to_linear(color: Color) -> Color {
    let channel = |c: f32| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(color[0]), channel(color[1]), channel(color[2]), color[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vsync_prefers_fifo_and_falls_back_safely() {
        assert_eq!(
            choose_present_mode(&[PresentMode::Mailbox, PresentMode::Fifo], true),
            PresentMode::Fifo
        );
        assert_eq!(
            choose_present_mode(&[PresentMode::Fifo, PresentMode::Mailbox], false),
            PresentMode::Mailbox
        );
        assert_eq!(choose_present_mode(&[PresentMode::Fifo], false), PresentMode::Fifo);
    }

    #[test]
    fn srgb_conversion_keeps_endpoints_and_alpha() {
        assert_eq!(srgb_to_linear([0.0, 1.0, 0.0, 0.5]), [0.0, 1.0, 0.0, 0.5]);
        let mid = srgb_to_linear([0.5, 0.5, 0.5, 1.0]);
        assert!((mid[0] - 0.214).abs() < 0.001);
    }
}
