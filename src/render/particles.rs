use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use tracing::debug;
use wgpu::util::DeviceExt;
use wgpu::*;

use super::mesh::{circle_fan, MeshVertex};
use super::pipelines::*;
use super::shaders::PARTICLE_SHADER;
use crate::game::{DrawSink, ParticleInstance, ParticleKind};

/// Draw requests of one frame, in submission order.
#[derive(Default)]
pub struct InstanceBatch {
    instances: Vec<ParticleInstance>,
}

impl InstanceBatch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { instances: Vec::with_capacity(capacity) }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn as_slice(&self) -> &[ParticleInstance] {
        &self.instances
    }
}

impl DrawSink for InstanceBatch {
    fn draw(&mut self, _kind: ParticleKind, instance: ParticleInstance) {
        self.instances.push(instance);
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ParticleUniforms {
    view_proj: [[f32; 4]; 4],
}

/// Orthographic camera over `[0, width] x [0, height]` looking down -z.
/// Everything with `|z| <= depth` is kept; respawn jitter moves trails off the z = 0 plane.
pub fn world_view_proj(width: f32, height: f32, depth: f32) -> Mat4 {
    Mat4::orthographic_rh(0.0, width, 0.0, height, -depth, depth)
}

fn instance_buffer_layout() -> VertexBufferLayout<'static> {
    VertexBufferLayout {
        array_stride: std::mem::size_of::<ParticleInstance>() as BufferAddress,
        step_mode: VertexStepMode::Instance,
        attributes: &[
            VertexAttribute {
                offset: 0,
                shader_location: 1,
                format: VertexFormat::Float32x4,
            },
            VertexAttribute {
                offset: std::mem::size_of::<[f32; 4]>() as BufferAddress,
                shader_location: 2,
                format: VertexFormat::Float32x4,
            },
        ],
    }
}

fn create_instance_buffer(device: &Device, capacity: usize) -> Buffer {
    device.create_buffer(&BufferDescriptor {
        label: Some("Particle Instance Buffer"),
        size: (std::mem::size_of::<ParticleInstance>() * capacity) as u64,
        usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Instanced circle renderer for every particle of the show.
pub struct FireworkRenderer {
    device: Arc<Device>,
    queue: Arc<Queue>,
    pipeline: RenderPipeline,
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
    instance_buffer: Buffer,
    instance_capacity: usize,
    uniform_buffer: Buffer,
    bind_group: BindGroup,
}

impl FireworkRenderer {
    pub fn new(
        device: Arc<Device>,
        queue: Arc<Queue>,
        surface_format: TextureFormat,
        arc_vertices: u32,
        instance_capacity: usize,
    ) -> Self {
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: ShaderSource::Wgsl(PARTICLE_SHADER.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Particle Bind Group Layout"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[MeshVertex::desc(), instance_buffer_layout()],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(create_color_target_state(surface_format))],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
            multiview: None,
        });

        let (vertices, indices) = circle_fan(arc_vertices);

        let vertex_buffer = device.create_buffer_init(&util::BufferInitDescriptor {
            label: Some("Circle Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&util::BufferInitDescriptor {
            label: Some("Circle Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("Particle Uniform Buffer"),
            size: std::mem::size_of::<ParticleUniforms>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("Particle Bind Group"),
            layout: &bind_group_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let instance_capacity = instance_capacity.max(1);
        let instance_buffer = create_instance_buffer(&device, instance_capacity);

        Self {
            device,
            queue,
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            instance_buffer,
            instance_capacity,
            uniform_buffer,
            bind_group,
        }
    }

    pub fn set_view_proj(&self, view_proj: Mat4) {
        let uniforms = ParticleUniforms {
            view_proj: view_proj.to_cols_array_2d(),
        };
        self.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    fn ensure_capacity(&mut self, count: usize) {
        if count <= self.instance_capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        debug!(old = self.instance_capacity, new = capacity, "Growing particle instance buffer");
        self.instance_buffer = create_instance_buffer(&self.device, capacity);
        self.instance_capacity = capacity;
    }

    /// Clear `output_view` to black and draw every instance in `batch`.
    pub fn render(&mut self, encoder: &mut CommandEncoder, output_view: &TextureView, batch: &InstanceBatch) {
        self.ensure_capacity(batch.len());
        if !batch.is_empty() {
            self.queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(batch.as_slice()));
        }

        let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Particle Render Pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(Color::BLACK),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        if batch.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..batch.len() as u32);
    }
}
