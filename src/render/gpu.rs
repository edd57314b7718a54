//! wgpu implementation of [`RenderBackend`].
//!
//! Submissions are batched on the CPU during the frame: vertices go into one
//! growable vertex buffer, and each distinct transform gets a slot in a
//! uniform buffer addressed through a dynamic offset. [`RenderBackend::present`]
//! uploads both and replays the batch in a single render pass.

use std::num::NonZeroU64;
use std::ops::Range;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use glam::{Mat4, Vec2, Vec3Swizzles, Vec4Swizzles};
use wgpu::util::DeviceExt;
use winit::window::Window;

use super::backend::{
    FrameHost, MeshHandle, Primitive, RenderBackend, Vertex, Viewport, DEFAULT_LINE_WIDTH,
};
use super::transform::TransformStack;
use crate::math::Color;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MATRIX_SIZE: u64 = std::mem::size_of::<Mat4>() as u64;
const INITIAL_VERTEX_CAPACITY: u64 = 16 * 1024;
const INITIAL_MATRIX_CAPACITY: u64 = 16;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

/// GPU primitive topology a draw is assembled with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Assembly {
    Lines,
    Triangles,
}

#[derive(Clone, Debug)]
enum DrawSource {
    Immediate(Range<u32>),
    Mesh(usize),
}

#[derive(Clone, Debug)]
struct DrawRecord {
    assembly: Assembly,
    source: DrawSource,
    matrix: u32,
    depth_test: bool,
}

struct GpuMesh {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

struct Pipelines {
    lines: wgpu::RenderPipeline,
    triangles: wgpu::RenderPipeline,
    lines_no_depth: wgpu::RenderPipeline,
    triangles_no_depth: wgpu::RenderPipeline,
}

impl Pipelines {
    fn select(&self, assembly: Assembly, depth_test: bool) -> &wgpu::RenderPipeline {
        match (assembly, depth_test) {
            (Assembly::Lines, true) => &self.lines,
            (Assembly::Triangles, true) => &self.triangles,
            (Assembly::Lines, false) => &self.lines_no_depth,
            (Assembly::Triangles, false) => &self.triangles_no_depth,
        }
    }
}

pub struct GpuBackend {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    pipelines: Pipelines,
    matrix_layout: wgpu::BindGroupLayout,
    matrix_buffer: wgpu::Buffer,
    matrix_bind_group: wgpu::BindGroup,
    matrix_capacity: u64,
    matrix_stride: u64,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: u64,
    meshes: Vec<GpuMesh>,
    transforms: TransformStack,
    depth_test: bool,
    line_width: f32,
    clear_color: Color,
    vertices: Vec<Vertex>,
    matrices: Vec<Mat4>,
    draws: Vec<DrawRecord>,
}

impl GpuBackend {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create window surface")?;
        let adapter = Self::request_adapter(&instance, &surface).await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        let config = Self::create_surface_config(&surface, &adapter, size.width, size.height)?;
        surface.configure(&device, &config);
        let depth_view = Self::create_depth_view(&device, config.width, config.height);

        let matrix_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Transform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(MATRIX_SIZE),
                },
                count: None,
            }],
        });

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment).max(1);
        let matrix_stride = MATRIX_SIZE.div_ceil(alignment) * alignment;
        let matrix_buffer = Self::create_matrix_buffer(&device, INITIAL_MATRIX_CAPACITY * matrix_stride);
        let matrix_bind_group = Self::create_matrix_bind_group(&device, &matrix_layout, &matrix_buffer);

        let vertex_buffer = Self::create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);
        let pipelines = Self::create_pipelines(&device, &matrix_layout, config.format);

        log::info!(
            "GPU backend ready: {}x{} {:?} ({})",
            config.width,
            config.height,
            config.format,
            adapter.get_info().name
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            depth_view,
            pipelines,
            matrix_layout,
            matrix_buffer,
            matrix_bind_group,
            matrix_capacity: INITIAL_MATRIX_CAPACITY,
            matrix_stride,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            meshes: Vec::new(),
            transforms: TransformStack::new(),
            depth_test: false,
            line_width: DEFAULT_LINE_WIDTH,
            clear_color: Color::BLACK,
            vertices: Vec::new(),
            matrices: Vec::new(),
            draws: Vec::new(),
        })
    }

    /// Reconfigures the surface and depth buffer for a new window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = Self::create_depth_view(&self.device, width, height);
    }

    async fn request_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'_>,
    ) -> Result<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow!("Failed to find appropriate adapter: {:?}", e))
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Prism Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("Failed to create device")
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let caps = surface.get_capabilities(adapter);
        // Colors are authored as display values, so prefer a non-sRGB target.
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .context("Surface reports no supported formats")?;

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_vertex_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Immediate Vertex Buffer"),
            size: capacity * std::mem::size_of::<Vertex>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_matrix_buffer(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Transform Buffer"),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_matrix_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Transform Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    size: NonZeroU64::new(MATRIX_SIZE),
                }),
            }],
        })
    }

    fn create_pipelines(
        device: &wgpu::Device,
        matrix_layout: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
    ) -> Pipelines {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Immediate Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("immediate.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Immediate Pipeline Layout"),
            bind_group_layouts: &[matrix_layout],
            push_constant_ranges: &[],
        });

        let build = |label: &str, topology: wgpu::PrimitiveTopology, depth_test: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &VERTEX_ATTRIBUTES,
                    }],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth_test,
                    depth_compare: if depth_test {
                        wgpu::CompareFunction::LessEqual
                    } else {
                        wgpu::CompareFunction::Always
                    },
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        Pipelines {
            lines: build("Lines Pipeline", wgpu::PrimitiveTopology::LineList, true),
            triangles: build("Triangles Pipeline", wgpu::PrimitiveTopology::TriangleList, true),
            lines_no_depth: build("Lines Pipeline (no depth)", wgpu::PrimitiveTopology::LineList, false),
            triangles_no_depth: build(
                "Triangles Pipeline (no depth)",
                wgpu::PrimitiveTopology::TriangleList,
                false,
            ),
        }
    }

    fn matrix_slot(&mut self, matrix: Mat4) -> u32 {
        if self.matrices.last() != Some(&matrix) {
            self.matrices.push(matrix);
        }
        (self.matrices.len() - 1) as u32
    }

    fn push_vertices(&mut self, assembly: Assembly, vertices: &[Vertex], matrix: Mat4) {
        if vertices.is_empty() {
            return;
        }

        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        let end = self.vertices.len() as u32;
        let matrix = self.matrix_slot(matrix);

        self.draws.push(DrawRecord {
            assembly,
            source: DrawSource::Immediate(start..end),
            matrix,
            depth_test: self.depth_test,
        });
    }

    fn push_segments(&mut self, segments: Vec<(Vertex, Vertex)>) {
        let matrix = self.transforms.combined();

        if self.line_width <= DEFAULT_LINE_WIDTH {
            let flat: Vec<Vertex> = segments.into_iter().flat_map(|(a, b)| [a, b]).collect();
            self.push_vertices(Assembly::Lines, &flat, matrix);
            return;
        }

        // Wide strokes are already in clip space.
        let viewport = Vec2::new(self.config.width as f32, self.config.height as f32);
        let quads: Vec<Vertex> = segments
            .into_iter()
            .filter_map(|(a, b)| expand_wide_line(a, b, matrix, viewport, self.line_width))
            .flatten()
            .collect();
        self.push_vertices(Assembly::Triangles, &quads, Mat4::IDENTITY);
    }

    fn ensure_capacity(&mut self) {
        let needed_vertices = self.vertices.len() as u64;
        if needed_vertices > self.vertex_capacity {
            self.vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = Self::create_vertex_buffer(&self.device, self.vertex_capacity);
            log::debug!("Vertex buffer grown to {} vertices", self.vertex_capacity);
        }

        let needed_matrices = self.matrices.len() as u64;
        if needed_matrices > self.matrix_capacity {
            self.matrix_capacity = needed_matrices.next_power_of_two();
            self.matrix_buffer =
                Self::create_matrix_buffer(&self.device, self.matrix_capacity * self.matrix_stride);
            self.matrix_bind_group =
                Self::create_matrix_bind_group(&self.device, &self.matrix_layout, &self.matrix_buffer);
            log::debug!("Transform buffer grown to {} slots", self.matrix_capacity);
        }
    }

    fn upload_frame(&mut self) {
        self.ensure_capacity();

        if !self.vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.vertices));
        }

        if !self.matrices.is_empty() {
            let stride = self.matrix_stride as usize;
            let mut bytes = vec![0u8; self.matrices.len() * stride];
            for (i, matrix) in self.matrices.iter().enumerate() {
                let offset = i * stride;
                bytes[offset..offset + MATRIX_SIZE as usize]
                    .copy_from_slice(bytemuck::cast_slice(&matrix.to_cols_array()));
            }
            self.queue.write_buffer(&self.matrix_buffer, 0, &bytes);
        }
    }

    fn reset_frame(&mut self) {
        self.vertices.clear();
        self.matrices.clear();
        self.draws.clear();
    }
}

/// Expands one segment into a screen-space quad `width` pixels wide.
///
/// Returns two triangles in normalised device coordinates, or `None` when
/// the segment is degenerate on screen or crosses behind the eye.
pub(crate) fn expand_wide_line(
    a: Vertex,
    b: Vertex,
    matrix: Mat4,
    viewport: Vec2,
    width: f32,
) -> Option<[Vertex; 6]> {
    let clip_a = matrix * a.position().extend(1.0);
    let clip_b = matrix * b.position().extend(1.0);
    if clip_a.w <= 0.0 || clip_b.w <= 0.0 {
        return None;
    }

    let ndc_a = clip_a.xyz() / clip_a.w;
    let ndc_b = clip_b.xyz() / clip_b.w;

    let half = viewport * 0.5;
    let direction = (ndc_b.xy() - ndc_a.xy()) * half;
    if direction.length_squared() == 0.0 {
        return None;
    }

    let normal = Vec2::new(-direction.y, direction.x).normalize() * (width * 0.5);
    let offset = (normal / half).extend(0.0);

    let a0 = Vertex { position: (ndc_a + offset).to_array(), color: a.color };
    let a1 = Vertex { position: (ndc_a - offset).to_array(), color: a.color };
    let b0 = Vertex { position: (ndc_b + offset).to_array(), color: b.color };
    let b1 = Vertex { position: (ndc_b - offset).to_array(), color: b.color };

    Some([a0, a1, b1, a0, b1, b0])
}

impl RenderBackend for GpuBackend {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.config.width, self.config.height)
    }

    fn transforms(&mut self) -> &mut TransformStack {
        &mut self.transforms
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    fn clear(&mut self, color: Color) {
        self.reset_frame();
        self.clear_color = color;
    }

    fn submit(&mut self, primitive: Primitive, vertices: &[Vertex]) {
        match primitive {
            Primitive::Lines => {
                let segments = vertices.chunks_exact(2).map(|s| (s[0], s[1])).collect();
                self.push_segments(segments);
            }
            Primitive::LineLoop => {
                let n = vertices.len();
                if n < 2 {
                    return;
                }
                let segments = (0..n).map(|i| (vertices[i], vertices[(i + 1) % n])).collect();
                self.push_segments(segments);
            }
            Primitive::Triangles => {
                let whole = vertices.len() - vertices.len() % 3;
                let matrix = self.transforms.combined();
                self.push_vertices(Assembly::Triangles, &vertices[..whole], matrix);
            }
            Primitive::Quads => {
                let triangles: Vec<Vertex> = vertices
                    .chunks_exact(4)
                    .flat_map(|q| [q[0], q[1], q[2], q[0], q[2], q[3]])
                    .collect();
                let matrix = self.transforms.combined();
                self.push_vertices(Assembly::Triangles, &triangles, matrix);
            }
        }
    }

    fn upload_mesh(&mut self, vertices: &[Vertex]) -> MeshHandle {
        // Zero-sized vertex buffers are invalid; keep a placeholder vertex.
        let placeholder = [Vertex::new(glam::Vec3::ZERO, Color::BLACK)];
        let contents = if vertices.is_empty() { &placeholder[..] } else { vertices };

        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Static Mesh Buffer"),
            contents: bytemuck::cast_slice(contents),
            usage: wgpu::BufferUsages::VERTEX,
        });

        self.meshes.push(GpuMesh {
            buffer,
            vertex_count: vertices.len() as u32,
        });
        log::debug!("Uploaded static mesh: {} vertices", vertices.len());
        MeshHandle(self.meshes.len() - 1)
    }

    fn draw_mesh(&mut self, mesh: MeshHandle) {
        let matrix = self.matrix_slot(self.transforms.combined());
        self.draws.push(DrawRecord {
            assembly: Assembly::Triangles,
            source: DrawSource::Mesh(mesh.0),
            matrix,
            depth_test: self.depth_test,
        });
    }

    fn present(&mut self) -> Result<()> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                self.reset_frame();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface texture timed out, skipping frame");
                self.reset_frame();
                return Ok(());
            }
            Err(e) => return Err(anyhow!("Failed to acquire surface texture: {}", e)),
        };

        self.upload_frame();

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let clear = self.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(clear.r),
                            g: f64::from(clear.g),
                            b: f64::from(clear.b),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for draw in &self.draws {
                let offset = (u64::from(draw.matrix) * self.matrix_stride) as u32;
                pass.set_pipeline(self.pipelines.select(draw.assembly, draw.depth_test));
                pass.set_bind_group(0, &self.matrix_bind_group, &[offset]);

                match &draw.source {
                    DrawSource::Immediate(range) => {
                        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                        pass.draw(range.clone(), 0..1);
                    }
                    DrawSource::Mesh(index) => {
                        let Some(mesh) = self.meshes.get(*index) else {
                            continue;
                        };
                        if mesh.vertex_count == 0 {
                            continue;
                        }
                        pass.set_vertex_buffer(0, mesh.buffer.slice(..));
                        pass.draw(0..mesh.vertex_count, 0..1);
                    }
                }
            }
        }

        self.queue.submit(Some(encoder.finish()));
        self.window.pre_present_notify();
        frame.present();
        self.reset_frame();

        Ok(())
    }
}

impl FrameHost for GpuBackend {
    /// The window's close signal arrives as a winit event, not through the
    /// backend.
    fn poll_close(&mut self) -> bool {
        false
    }

    fn release(&mut self) {
        self.reset_frame();
        self.meshes.clear();
    }
}
