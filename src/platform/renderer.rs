//=========================================================================
// Wgpu Render Service
//=========================================================================
//
// wgpu-backed implementation of the render contract.
//
// Frame model:
//   clear()            → reset the vertex batch, latch the clear color
//   submit(command)    → CPU-tessellate into NDC vertices
//   present()          → acquire surface frame, one pass: clear + draw,
//                        submit, present
//
// The draw color doubles as the clear color, and the engine resets it to
// black after every frame, so an undrawn frame starts from black.
//
// Surface errors are handled here and never cross the trait boundary:
// lost/outdated surfaces reconfigure, transient errors skip the frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use log::{debug, error, info};
use winit::window::Window;

//=== Internal Dependencies ===============================================

use crate::core::draw::{Color, DrawCommand, Rect};
use crate::core::error::EngineError;
use crate::core::services::RenderService;

//=== Vertex ==============================================================

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position (NDC)
        1 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

//=== Tessellation ========================================================

//
// Pixel → NDC conversion and shape tessellation are plain functions so
// they stay testable without a GPU.
//

fn to_ndc(x: f32, y: f32, viewport: (u32, u32)) -> [f32; 2] {
    let w = viewport.0.max(1) as f32;
    let h = viewport.1.max(1) as f32;
    [2.0 * x / w - 1.0, 1.0 - 2.0 * y / h]
}

fn rect_vertices(rect: Rect, color: Color, viewport: (u32, u32)) -> [Vertex; 6] {
    let c = color.to_f32_array();
    let tl = to_ndc(rect.x, rect.y, viewport);
    let tr = to_ndc(rect.x + rect.w, rect.y, viewport);
    let bl = to_ndc(rect.x, rect.y + rect.h, viewport);
    let br = to_ndc(rect.x + rect.w, rect.y + rect.h, viewport);

    [
        Vertex { position: tl, color: c },
        Vertex { position: tr, color: c },
        Vertex { position: bl, color: c },
        Vertex { position: tr, color: c },
        Vertex { position: br, color: c },
        Vertex { position: bl, color: c },
    ]
}

fn line_vertices(
    from: (f32, f32),
    to: (f32, f32),
    color: Color,
    viewport: (u32, u32),
) -> [Vertex; 6] {
    // A line is a one-pixel-wide quad along its perpendicular.
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = (dx * dx + dy * dy).sqrt().max(f32::EPSILON);
    let (nx, ny) = (-dy / len * 0.5, dx / len * 0.5);

    let c = color.to_f32_array();
    let a0 = to_ndc(from.0 + nx, from.1 + ny, viewport);
    let a1 = to_ndc(from.0 - nx, from.1 - ny, viewport);
    let b0 = to_ndc(to.0 + nx, to.1 + ny, viewport);
    let b1 = to_ndc(to.0 - nx, to.1 - ny, viewport);

    [
        Vertex { position: a0, color: c },
        Vertex { position: b0, color: c },
        Vertex { position: a1, color: c },
        Vertex { position: b0, color: c },
        Vertex { position: b1, color: c },
        Vertex { position: a1, color: c },
    ]
}

fn choose_surface_format(caps: &wgpu::SurfaceCapabilities) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    let preferred = [
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ];
    for f in preferred {
        if caps.formats.contains(&f) {
            return Some(f);
        }
    }

    Some(caps.formats[0])
}

//=== WgpuRenderer ========================================================

/// wgpu surface, device and a single flat-color pipeline.
pub(crate) struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,

    vertex_buffer: Option<wgpu::Buffer>,
    vertex_capacity: usize,
    vertices: Vec<Vertex>,

    draw_color: Color,
    clear_color: wgpu::Color,
}

impl WgpuRenderer {
    /// Creates the renderer bound to the window.
    ///
    /// Adapter and device acquisition are asynchronous under wgpu; this
    /// blocks on them, which is fine during bring-up.
    pub(crate) fn new(window: Arc<Window>) -> Result<Self, EngineError> {
        pollster::block_on(Self::new_async(window))
    }

    async fn new_async(window: Arc<Window>) -> Result<Self, EngineError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Arc keeps the window alive for the surface's 'static lifetime.
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| EngineError::RendererInit(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| EngineError::RendererInit(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("ember device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| EngineError::RendererInit(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps)
            .ok_or_else(|| EngineError::RendererInit("no supported surface formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = Self::build_pipeline(&device, format);

        info!(
            target: "platform::render",
            "renderer ready: {:?} {}x{}",
            format, config.width, config.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer: None,
            vertex_capacity: 0,
            vertices: Vec::new(),
            draw_color: Color::BLACK,
            clear_color: wgpu::Color::BLACK,
        })
    }

    fn build_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ember draw shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/draw.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ember draw pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ember draw pipeline"),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
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
            multiview_mask: None,
            cache: None,
        })
    }

    fn upload_vertices(&mut self) {
        if self.vertices.is_empty() {
            return;
        }

        let required = self.vertices.len();
        if required > self.vertex_capacity || self.vertex_buffer.is_none() {
            let capacity = required.next_power_of_two().max(256);
            self.vertex_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("ember vertex buffer"),
                size: (capacity * std::mem::size_of::<Vertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vertex_capacity = capacity;
        }

        if let Some(buffer) = self.vertex_buffer.as_ref() {
            self.queue
                .write_buffer(buffer, 0, bytemuck::cast_slice(&self.vertices));
        }
    }

    fn handle_surface_error(&mut self, err: wgpu::SurfaceError) {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                if self.config.width > 0 && self.config.height > 0 {
                    self.surface.configure(&self.device, &self.config);
                }
                debug!(target: "platform::render", "surface reconfigured after {:?}", err);
            }
            wgpu::SurfaceError::OutOfMemory => {
                error!(target: "platform::render", "render surface out of memory");
            }
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => {
                debug!(target: "platform::render", "frame skipped: {:?}", err);
            }
        }
    }

    fn viewport(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

impl RenderService for WgpuRenderer {
    fn clear(&mut self) {
        self.vertices.clear();
        let [r, g, b, a] = self.draw_color.to_f32_array();
        self.clear_color = wgpu::Color {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
            a: f64::from(a),
        };
    }

    fn update_viewport(&mut self, size: (u32, u32)) {
        // Zero-sized surfaces cannot be configured; skip until the window
        // has an area again.
        if size.0 == 0 || size.1 == 0 {
            return;
        }

        if size != (self.config.width, self.config.height) {
            self.config.width = size.0;
            self.config.height = size.1;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn submit(&mut self, command: DrawCommand) {
        let viewport = self.viewport();
        match command {
            DrawCommand::Rect { rect, color } => {
                if !rect.is_empty() {
                    self.vertices.extend(rect_vertices(rect, color, viewport));
                }
            }
            DrawCommand::Line { from, to, color } => {
                self.vertices.extend(line_vertices(from, to, color, viewport));
            }
        }
    }

    fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
    }

    fn reset_draw_color(&mut self) {
        self.draw_color = Color::BLACK;
    }

    fn present(&mut self) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(err) => {
                self.handle_surface_error(err);
                return;
            }
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.upload_vertices();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ember frame encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ember frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if !self.vertices.is_empty() {
                if let Some(buffer) = self.vertex_buffer.as_ref() {
                    rpass.set_pipeline(&self.pipeline);
                    rpass.set_vertex_buffer(0, buffer.slice(..));
                    rpass.draw(0..self.vertices.len() as u32, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
