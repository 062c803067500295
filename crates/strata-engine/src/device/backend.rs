use std::borrow::Cow;

use strata_glsl::ShaderSources;
use wgpu::naga::ShaderStage;

use crate::render::packer::{AttributeSlot, BufferDescriptor, LayoutError};
use crate::render::scene::{DrawMode, MapperUniforms};
use crate::render::shader::validate_glsl;
use crate::render::{DrawBatch, RenderBackend, RenderError};

use super::OffscreenTarget;

/// A compiled mapper program: pipeline plus its uniform block.
pub struct WgpuProgram {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl WgpuProgram {
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

/// [`RenderBackend`] over a wgpu device.
///
/// Cheap to clone; handles share the device and queue they were made from.
#[derive(Clone)]
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    color_format: wgpu::TextureFormat,
    depth_format: Option<wgpu::TextureFormat>,
}

impl WgpuBackend {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        color_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        Self { device, queue, color_format, depth_format }
    }

    /// Clears color to `rgba` and depth to the far plane.
    pub fn clear(&self, target: &OffscreenTarget, rgba: [f64; 4]) {
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("strata clear encoder"),
        });
        {
            let [r, g, b, a] = rgba;
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("strata clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: target.depth_view().map(|view| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Draws one mapper batch on top of what `target` already holds.
    pub fn draw(&self, target: &OffscreenTarget, batch: &DrawBatch<'_, Self>, uniforms: &MapperUniforms) {
        self.queue.write_buffer(&batch.program.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("strata mapper encoder"),
        });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("strata mapper pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: target.depth_view().map(|view| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(&batch.program.pipeline);
            rpass.set_bind_group(0, &batch.program.bind_group, &[]);
            rpass.set_vertex_buffer(0, batch.buffer.slice(..));
            rpass.draw(0..batch.vertex_count, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn shader_module(&self, label: &str, source: &str, stage: ShaderStage) -> wgpu::ShaderModule {
        self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Glsl {
                shader: Cow::Owned(source.to_owned()),
                stage,
                defines: &[],
            },
        })
    }
}

impl RenderBackend for WgpuBackend {
    type Buffer = wgpu::Buffer;
    type Program = WgpuProgram;

    fn create_vertex_buffer(&mut self, label: &str, size: u64) -> Result<wgpu::Buffer, RenderError> {
        if size > self.device.limits().max_buffer_size {
            return Err(RenderError::Device(format!(
                "{label}: vertex buffer of {size} bytes exceeds the device limit"
            )));
        }
        Ok(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }))
    }

    fn write_vertex_buffer(&mut self, buffer: &wgpu::Buffer, data: &[u8]) -> Result<(), RenderError> {
        if data.len() as u64 > buffer.size() {
            return Err(RenderError::Device(format!(
                "write of {} bytes overflows a {}-byte buffer",
                data.len(),
                buffer.size()
            )));
        }
        self.queue.write_buffer(buffer, 0, data);
        Ok(())
    }

    fn compile_program(
        &mut self,
        label: &str,
        sources: &ShaderSources,
        descriptor: &BufferDescriptor,
        draw_mode: DrawMode,
    ) -> Result<WgpuProgram, RenderError> {
        validate_glsl(label, sources)?;

        let vs = self.shader_module(&format!("{label} vertex"), &sources.vertex, ShaderStage::Vertex);
        let fs = self.shader_module(&format!("{label} fragment"), &sources.fragment, ShaderStage::Fragment);

        let uniform_size = std::mem::size_of::<MapperUniforms>() as u64;
        let bind_group_layout = self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(uniform_size),
                },
                count: None,
            }],
        });

        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.queue.write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(&MapperUniforms::default()));

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let attributes = vertex_attributes(descriptor)?;
        let buffers = [wgpu::VertexBufferLayout {
            array_stride: u64::from(descriptor.stride()),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &attributes,
        }];

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: topology(draw_mode),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: self.depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(WgpuProgram { pipeline, uniform_buffer, bind_group })
    }
}

fn topology(mode: DrawMode) -> wgpu::PrimitiveTopology {
    match mode {
        DrawMode::Points => wgpu::PrimitiveTopology::PointList,
        DrawMode::Lines => wgpu::PrimitiveTopology::LineList,
        DrawMode::Triangles => wgpu::PrimitiveTopology::TriangleList,
    }
}

fn vertex_format(slot: &AttributeSlot) -> Result<wgpu::VertexFormat, LayoutError> {
    match slot.components {
        1 => Ok(wgpu::VertexFormat::Float32),
        2 => Ok(wgpu::VertexFormat::Float32x2),
        3 => Ok(wgpu::VertexFormat::Float32x3),
        4 => Ok(wgpu::VertexFormat::Float32x4),
        components => Err(LayoutError::InvalidComponents { name: slot.name.clone(), components }),
    }
}

/// One wgpu attribute per descriptor slot, at the slot's location.
fn vertex_attributes(descriptor: &BufferDescriptor) -> Result<Vec<wgpu::VertexAttribute>, LayoutError> {
    descriptor
        .slots()
        .iter()
        .map(|slot| {
            Ok(wgpu::VertexAttribute {
                format: vertex_format(slot)?,
                offset: u64::from(slot.offset),
                shader_location: slot.location,
            })
        })
        .collect()
}
