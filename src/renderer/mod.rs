//! Rendering of the scene geometry.
//!
//! Three passes share one camera and one lighting uniform: instanced unit
//! spheres (atoms, JSON spheres), instanced unit cylinders (bonds, wires,
//! bounding-box edges, JSON cylinders) and one triangle-mesh pass
//! (surfaces, cartoon tube). Uploads only happen when the scene changed.

pub(crate) mod instance_pass;
pub(crate) mod lighting;
pub(crate) mod mesh_pass;
pub(crate) mod pipeline_util;
pub mod screenshot;
pub mod unit_mesh;

use wgpu::util::DeviceExt;

use self::instance_pass::InstancePass;
use self::lighting::LightingUniform;
use self::mesh_pass::MeshPass;
use crate::camera::CameraUniform;
use crate::engine::ViewerState;
use crate::error::MolvisError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{
    ShaderComposer, CYLINDER_SHADER, SPHERE_SHADER,
};
use crate::scene::{CylinderInstance, SphereInstance};

/// Bind group layouts shared by every pipeline.
pub struct PipelineLayouts {
    /// Camera uniform.
    pub camera: wgpu::BindGroupLayout,
    /// Lighting uniform.
    pub lighting: wgpu::BindGroupLayout,
}

/// Per-frame bind groups handed to the passes.
pub struct DrawBindGroups<'a> {
    /// Camera uniform.
    pub camera: &'a wgpu::BindGroup,
    /// Lighting uniform.
    pub lighting: &'a wgpu::BindGroup,
}

/// A uniform buffer and its bind group.
struct UniformBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl UniformBinding {
    fn new<T: bytemuck::Pod>(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        value: &T,
    ) -> Self {
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(value),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    fn write<T: bytemuck::Pod>(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }
}

/// GPU side of the viewer.
pub struct Renderer {
    spheres: InstancePass<SphereInstance>,
    cylinders: InstancePass<CylinderInstance>,
    meshes: MeshPass,
    camera: UniformBinding,
    lighting: UniformBinding,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    /// Unit-mesh detail the passes were built with.
    detail: (u32, u32),
}

impl Renderer {
    /// Build every pipeline for `context`.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::Shader`] if a shader does not compose.
    pub fn new(
        context: &RenderContext,
        state: &ViewerState,
    ) -> Result<Self, MolvisError> {
        let device = &context.device;
        let mut composer = ShaderComposer::new()?;
        let layouts = PipelineLayouts {
            camera: pipeline_util::uniform_layout(device, "Camera Layout"),
            lighting: pipeline_util::uniform_layout(device, "Lighting Layout"),
        };
        let geometry = &state.options().geometry;
        let detail =
            (geometry.sphere_subdivisions, geometry.cylinder_tessellation);

        let spheres = InstancePass::new(
            context,
            "Spheres",
            SPHERE_SHADER,
            &unit_mesh::icosphere(detail.0),
            &layouts,
            &mut composer,
        )?;
        let cylinders = InstancePass::new(
            context,
            "Cylinders",
            CYLINDER_SHADER,
            &unit_mesh::cylinder(detail.1),
            &layouts,
            &mut composer,
        )?;
        let meshes = MeshPass::new(context, &layouts, &mut composer)?;

        let camera = UniformBinding::new(
            device,
            &layouts.camera,
            "Camera Uniform",
            &CameraUniform::new(),
        );
        let lighting = UniformBinding::new(
            device,
            &layouts.lighting,
            "Lighting Uniform",
            &LightingUniform::new(
                &state.options().lighting,
                &state.camera().camera,
                false,
            ),
        );
        let depth_size = context.size();
        let depth_view =
            pipeline_util::create_depth_view(device, depth_size.0, depth_size.1);

        Ok(Self {
            spheres,
            cylinders,
            meshes,
            camera,
            lighting,
            depth_view,
            depth_size,
            detail,
        })
    }

    /// Whether the unit meshes no longer match the geometry options.
    #[must_use]
    pub fn needs_rebuild(&self, state: &ViewerState) -> bool {
        let g = &state.options().geometry;
        self.detail != (g.sphere_subdivisions, g.cylinder_tessellation)
    }

    /// Upload whatever changed in the scene plus the per-frame uniforms.
    pub fn prepare(&mut self, context: &RenderContext, state: &mut ViewerState) {
        let (device, queue) = (&context.device, &context.queue);

        let scene = state.scene_mut();
        let geometry_dirty = scene.is_dirty();
        let colors_dirty = scene.take_colors_changed();
        if geometry_dirty || colors_dirty {
            self.spheres
                .write_instances(device, queue, &scene.sphere_instances());
        }
        if geometry_dirty {
            let geometry = scene.geometry();
            self.cylinders
                .write_instances(device, queue, &geometry.cylinders);
            self.meshes.write_meshes(device, queue, &geometry.meshes);
            scene.mark_rendered();
            log::debug!(
                "uploaded {} spheres, {} cylinders, {} triangles",
                self.spheres.instance_count(),
                self.cylinders.instance_count(),
                self.meshes.triangle_count(),
            );
        }

        let camera = &state.camera().camera;
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(camera);
        self.camera.write(queue, &uniform);

        let key_light_only = state.scene().geometry().key_light_only;
        self.lighting.write(
            queue,
            &LightingUniform::new(
                &state.options().lighting,
                camera,
                key_light_only,
            ),
        );
    }

    fn ensure_depth(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        if self.depth_size != size {
            self.depth_view =
                pipeline_util::create_depth_view(device, size.0, size.1);
            self.depth_size = size;
        }
    }

    /// Record the scene into `target`, cleared to `background`.
    pub fn encode(
        &mut self,
        context: &RenderContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        background: [f32; 3],
    ) {
        self.ensure_depth(&context.device, context.size());
        let [r, g, b] = background.map(f64::from);

        let mut render_pass =
            encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth_view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    },
                ),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

        let bind_groups = DrawBindGroups {
            camera: &self.camera.bind_group,
            lighting: &self.lighting.bind_group,
        };
        self.meshes.draw(&mut render_pass, &bind_groups);
        self.cylinders.draw(&mut render_pass, &bind_groups);
        self.spheres.draw(&mut render_pass, &bind_groups);
    }
}
