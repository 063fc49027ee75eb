//! Indexed triangle-mesh pass for surfaces and the cartoon tube.
//!
//! Every mesh of the scene is concatenated into one vertex buffer and one
//! index buffer and drawn with a single call.

use super::{pipeline_util, DrawBindGroups, PipelineLayouts};
use crate::error::MolvisError;
use crate::gpu::dynamic_buffer::DynamicBuffer;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{ShaderComposer, MESH_SHADER};
use crate::scene::{MeshData, MeshVertex};

/// Create the mesh render pipeline.
fn create_mesh_pipeline(
    context: &RenderContext,
    layouts: &PipelineLayouts,
    shader_composer: &mut ShaderComposer,
) -> Result<wgpu::RenderPipeline, MolvisError> {
    let label = "Mesh";
    let shader = shader_composer.compose(&context.device, label, MESH_SHADER)?;

    let pipeline_layout = context.device.create_pipeline_layout(
        &wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Layout"),
            bind_group_layouts: &[&layouts.camera, &layouts.lighting],
            push_constant_ranges: &[],
        },
    );

    Ok(context
        .device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &pipeline_util::color_targets(context.format()),
                compilation_options: Default::default(),
            }),
            // Surface files do not agree on winding.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(pipeline_util::depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        }))
}

/// An indexed-mesh draw pass: pipeline + vertex and index buffers.
pub(crate) struct MeshPass {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: DynamicBuffer,
    index_buffer: DynamicBuffer,
    index_count: u32,
}

impl MeshPass {
    /// Create an empty pass.
    pub fn new(
        context: &RenderContext,
        layouts: &PipelineLayouts,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, MolvisError> {
        let device = &context.device;
        Ok(Self {
            pipeline: create_mesh_pipeline(context, layouts, shader_composer)?,
            vertex_buffer: DynamicBuffer::new(
                device,
                "Mesh Vertices",
                size_of::<MeshVertex>() * 3000,
                wgpu::BufferUsages::VERTEX,
            ),
            index_buffer: DynamicBuffer::new(
                device,
                "Mesh Indices",
                size_of::<u32>() * 3000,
                wgpu::BufferUsages::INDEX,
            ),
            index_count: 0,
        })
    }

    /// Upload `meshes` as one combined mesh.
    pub fn write_meshes(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        meshes: &[MeshData],
    ) {
        let mut combined = MeshData::default();
        for mesh in meshes {
            combined.append(mesh);
        }
        if !combined.is_empty() {
            let _ = self.vertex_buffer.write(device, queue, &combined.vertices);
            let _ = self.index_buffer.write(device, queue, &combined.indices);
        }
        self.index_count = combined.indices.len() as u32;
    }

    /// Triangles drawn per frame.
    #[must_use]
    pub fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }

    /// Set pipeline, bind groups, buffers, and draw.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        bind_groups: &DrawBindGroups<'a>,
    ) {
        if self.index_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, bind_groups.camera, &[]);
        render_pass.set_bind_group(1, bind_groups.lighting, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.buffer().slice(..));
        render_pass.set_index_buffer(
            self.index_buffer.buffer().slice(..),
            wgpu::IndexFormat::Uint32,
        );
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
