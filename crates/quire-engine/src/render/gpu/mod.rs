//! wgpu implementation of [`RenderBackend`].

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Viewport};
use crate::error::BackendError;

use super::{AlphaMode, BlendFactor, BlendState, FrameSubmission, RenderBackend};

/// Draws submitted frames into a bound texture view.
///
/// One pipeline per alpha mode is created lazily. Each frame is recorded into
/// its own encoder with `LoadOp::Load`, so clearing the target is up to the
/// caller.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
    target: Option<wgpu::TextureView>,

    shader: Option<wgpu::ShaderModule>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    pipeline_layout: Option<wgpu::PipelineLayout>,
    straight_pipeline: Option<wgpu::RenderPipeline>,
    premultiplied_pipeline: Option<wgpu::RenderPipeline>,

    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    vertex_vbo: Option<wgpu::Buffer>,
    vertex_capacity: usize,
    scratch: Vec<GpuVertex>,
}

impl WgpuBackend {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            queue,
            format,
            target: None,
            shader: None,
            bind_group_layout: None,
            pipeline_layout: None,
            straight_pipeline: None,
            premultiplied_pipeline: None,
            bind_group: None,
            viewport_ubo: None,
            vertex_vbo: None,
            vertex_capacity: 0,
            scratch: Vec::new(),
        }
    }

    /// Sets the view drawn into by subsequent frames.
    pub fn set_target(&mut self, view: wgpu::TextureView) {
        self.target = Some(view);
    }

    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_layouts(&mut self) {
        if self.shader.is_some() && self.pipeline_layout.is_some() {
            return;
        }

        let shader = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quire path shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/path.wgsl").into()),
        });

        let bind_group_layout = self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quire path bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<ViewportUniform>() as u64),
                },
                count: None,
            }],
        });

        let pipeline_layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quire path pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        self.shader = Some(shader);
        self.bind_group_layout = Some(bind_group_layout);
        self.pipeline_layout = Some(pipeline_layout);
        self.straight_pipeline = None;
        self.premultiplied_pipeline = None;
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_pipeline(&mut self, mode: AlphaMode) {
        let exists = match mode {
            AlphaMode::Straight => self.straight_pipeline.is_some(),
            AlphaMode::Premultiplied => self.premultiplied_pipeline.is_some(),
        };
        if exists {
            return;
        }
        let (Some(shader), Some(layout)) = (self.shader.as_ref(), self.pipeline_layout.as_ref()) else {
            return;
        };

        let label = match mode {
            AlphaMode::Straight => "quire path pipeline (straight)",
            AlphaMode::Premultiplied => "quire path pipeline (premultiplied)",
        };
        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[GpuVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: Some(to_wgpu_blend(mode.blend_state())),
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
        });

        log::debug!("created {label}");
        match mode {
            AlphaMode::Straight => self.straight_pipeline = Some(pipeline),
            AlphaMode::Premultiplied => self.premultiplied_pipeline = Some(pipeline),
        }
    }

    fn ensure_bindings(&mut self) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quire path viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quire path bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn write_viewport_uniform(&self, viewport: Viewport) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        self.queue.write_buffer(
            ubo,
            0,
            bytemuck::bytes_of(&ViewportUniform {
                viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
                _pad: [0.0; 2],
            }),
        );
    }

    fn ensure_vertex_capacity(&mut self, required: usize) {
        if required <= self.vertex_capacity && self.vertex_vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(1024);
        let new_size = (new_cap * std::mem::size_of::<GpuVertex>()) as u64;
        self.vertex_vbo = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quire path vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vertex_capacity = new_cap;
        log::debug!("path vbo grown to {new_cap} vertices");
    }

    /// Expands batch vertices into colored GPU vertices, call by call.
    fn bake(&mut self, frame: &FrameSubmission<'_>) {
        self.scratch.clear();
        self.scratch.resize(frame.vertices.len(), GpuVertex::zeroed());
        for call in frame.calls {
            for i in call.vertices.clone() {
                let i = i as usize;
                let (Some(v), Some(slot)) = (frame.vertices.get(i), self.scratch.get_mut(i)) else {
                    continue;
                };
                *slot = GpuVertex {
                    pos: [v.pos.x, v.pos.y],
                    color: call.alpha_mode.vertex_color(call.color, v.coverage),
                };
            }
        }
    }
}

impl RenderBackend for WgpuBackend {
    fn submit(&mut self, frame: &FrameSubmission<'_>) -> Result<(), BackendError> {
        if frame.calls.is_empty() {
            return Ok(());
        }
        if self.target.is_none() {
            return Err(BackendError::NoTarget);
        }

        let required = (frame.vertices.len() * std::mem::size_of::<GpuVertex>()) as u64;
        let limit = self.device.limits().max_buffer_size;
        if required > limit {
            return Err(BackendError::BufferTooLarge { required, limit });
        }

        self.bake(frame);
        self.ensure_layouts();
        self.ensure_pipeline(frame.alpha_mode);
        self.ensure_bindings();
        self.write_viewport_uniform(frame.viewport);
        self.ensure_vertex_capacity(self.scratch.len());

        let Some(vbo) = self.vertex_vbo.as_ref() else { return Ok(()) };
        self.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&self.scratch));

        let pipeline = match frame.alpha_mode {
            AlphaMode::Straight => self.straight_pipeline.as_ref(),
            AlphaMode::Premultiplied => self.premultiplied_pipeline.as_ref(),
        };
        let Some(pipeline) = pipeline else { return Ok(()) };
        let Some(bind_group) = self.bind_group.as_ref() else { return Ok(()) };
        let Some(target) = self.target.as_ref() else { return Err(BackendError::NoTarget) };

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("quire path encoder"),
        });

        let screen = Rect::new(0.0, 0.0, frame.viewport.width, frame.viewport.height);
        let mut culled = 0usize;
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quire path pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, bind_group, &[]);
            rpass.set_vertex_buffer(0, vbo.slice(..));

            for call in frame.calls {
                if call.bounds.intersect(screen).is_none() {
                    culled += 1;
                    continue;
                }
                rpass.draw(call.vertices.clone(), 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        if culled > 0 {
            log::trace!("{culled} draw calls outside the viewport");
        }
        Ok(())
    }
}

fn to_wgpu_factor(f: BlendFactor) -> wgpu::BlendFactor {
    match f {
        BlendFactor::Zero => wgpu::BlendFactor::Zero,
        BlendFactor::One => wgpu::BlendFactor::One,
        BlendFactor::SrcAlpha => wgpu::BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
    }
}

fn to_wgpu_blend(b: BlendState) -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: to_wgpu_factor(b.color.src_factor),
            dst_factor: to_wgpu_factor(b.color.dst_factor),
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: to_wgpu_factor(b.alpha.src_factor),
            dst_factor: to_wgpu_factor(b.alpha.dst_factor),
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    viewport: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

/// Vertex layout (24 bytes):
///
///  offset  0  pos    [f32; 2]   loc 0  (frame units)
///  offset  8  color  [f32; 4]   loc 1
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GpuVertex {
    pos: [f32; 2],
    color: [f32; 4],
}

impl GpuVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
