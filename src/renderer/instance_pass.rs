//! Reusable instanced-mesh pass.
//!
//! The sphere and cylinder passes follow the same pattern: one unit mesh,
//! one storage buffer of instances, one bind group, one pipeline and a
//! `draw_indexed(0..index_count, 0, 0..instance_count)` call.
//! `InstancePass<T>` holds that boilerplate.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::unit_mesh::{UnitMesh, UnitVertex};
use super::{pipeline_util, DrawBindGroups, PipelineLayouts};
use crate::error::MolvisError;
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{ShaderComposer, ShaderSource};

/// A single instanced draw pass: pipeline + unit mesh + typed storage
/// buffer + bind group.
///
/// Bind group layout convention:
/// - group(0): storage buffer (instances)
/// - group(1): camera uniform
/// - group(2): lighting uniform
pub struct InstancePass<T: Pod + Zeroable> {
    label: String,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: TypedBuffer<T>,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    instance_count: u32,
}

impl<T: Pod + Zeroable> InstancePass<T> {
    /// Create a pass drawing `mesh` once per instance with `shader`.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::Shader`] if the shader does not compose.
    pub fn new(
        context: &RenderContext,
        label: &str,
        shader: ShaderSource,
        mesh: &UnitMesh,
        layouts: &PipelineLayouts,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, MolvisError> {
        let device = &context.device;
        let instance_buffer = TypedBuffer::new_with_data(
            device,
            &format!("{label} Instances"),
            &[T::zeroed()],
            wgpu::BufferUsages::STORAGE,
        );
        let bind_group_layout = Self::create_bind_group_layout(device, label);
        let bind_group = Self::create_bind_group(
            device,
            &bind_group_layout,
            &instance_buffer,
            label,
        );
        let pipeline = Self::create_pipeline(
            context,
            label,
            shader,
            &bind_group_layout,
            layouts,
            shader_composer,
        )?;

        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertices")),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Indices")),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Ok(Self {
            label: label.to_owned(),
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            instance_buffer,
            bind_group_layout,
            bind_group,
            instance_count: 0,
        })
    }

    fn create_bind_group_layout(
        device: &wgpu::Device,
        label: &str,
    ) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} Layout")),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX
                    | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        buffer: &TypedBuffer<T>,
        label: &str,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.buffer().as_entire_binding(),
            }],
            label: Some(&format!("{label} Bind Group")),
        })
    }

    fn create_pipeline(
        context: &RenderContext,
        label: &str,
        shader: ShaderSource,
        bind_group_layout: &wgpu::BindGroupLayout,
        layouts: &PipelineLayouts,
        shader_composer: &mut ShaderComposer,
    ) -> Result<wgpu::RenderPipeline, MolvisError> {
        let module = shader_composer.compose(
            &context.device,
            &format!("{label} Shader"),
            shader,
        )?;

        let pipeline_layout = context.device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("{label} Pipeline Layout")),
                bind_group_layouts: &[
                    bind_group_layout,
                    &layouts.camera,
                    &layouts.lighting,
                ],
                push_constant_ranges: &[],
            },
        );

        Ok(context.device.create_render_pipeline(
            &wgpu::RenderPipelineDescriptor {
                label: Some(&format!("{label} Pipeline")),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some("vs_main"),
                    buffers: &[UnitVertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some("fs_main"),
                    targets: &pipeline_util::color_targets(context.format()),
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(pipeline_util::depth_stencil_state()),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            },
        ))
    }

    /// Write typed instances to the GPU buffer. Recreates the bind group if
    /// the buffer was reallocated.
    pub fn write_instances(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        instances: &[T],
    ) {
        // Storage bindings may not be empty.
        let zeroed = [T::zeroed()];
        let data = if instances.is_empty() { &zeroed[..] } else { instances };
        if self.instance_buffer.write(device, queue, data) {
            self.bind_group = Self::create_bind_group(
                device,
                &self.bind_group_layout,
                &self.instance_buffer,
                &self.label,
            );
        }
        self.instance_count = instances.len() as u32;
    }

    /// Instances drawn per frame.
    #[must_use]
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    /// Issue the draw call for this pass.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        bind_groups: &DrawBindGroups<'a>,
    ) {
        if self.instance_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_bind_group(1, bind_groups.camera, &[]);
        render_pass.set_bind_group(2, bind_groups.lighting, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(
            self.index_buffer.slice(..),
            wgpu::IndexFormat::Uint32,
        );
        render_pass.draw_indexed(
            0..self.index_count,
            0,
            0..self.instance_count,
        );
    }
}
