use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use crate::error::MolvisError;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// The shared WGSL modules are registered at construction time. Shaders
/// pull them in with `#import molvis::camera` and `#import
/// molvis::lighting`. The composer produces `naga::Module` IR directly,
/// skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: (source, file_path)
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

const SHARED_MODULES: &[ModuleDef] = &[
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/camera.wgsl"),
        file_path: "modules/camera.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/lighting.wgsl"),
        file_path: "modules/lighting.wgsl",
    },
];

/// A shader that draws scene geometry.
#[derive(Debug, Clone, Copy)]
pub struct ShaderSource {
    /// WGSL source, possibly with `#import` directives.
    pub source: &'static str,
    /// Path used in error messages.
    pub file_path: &'static str,
}

/// Instanced unit-sphere shader.
pub const SPHERE_SHADER: ShaderSource = ShaderSource {
    source: include_str!("../../assets/shaders/raster/sphere.wgsl"),
    file_path: "raster/sphere.wgsl",
};

/// Instanced unit-cylinder shader.
pub const CYLINDER_SHADER: ShaderSource = ShaderSource {
    source: include_str!("../../assets/shaders/raster/cylinder.wgsl"),
    file_path: "raster/cylinder.wgsl",
};

/// Per-vertex colored triangle mesh shader.
pub const MESH_SHADER: ShaderSource = ShaderSource {
    source: include_str!("../../assets/shaders/raster/mesh.wgsl"),
    file_path: "raster/mesh.wgsl",
};

impl ShaderComposer {
    /// Register every shared module.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::Shader`] if a shared module does not parse.
    pub fn new() -> Result<Self, MolvisError> {
        let mut composer = Composer::default();

        // Registered in dependency order.
        for m in SHARED_MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    MolvisError::Shader(format!(
                        "failed to register shader module '{}': {e:?}",
                        m.file_path
                    ))
                })?;
        }

        Ok(Self { composer })
    }

    /// Compose `shader` into a `wgpu::ShaderModule` ready for pipeline
    /// creation.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        shader: ShaderSource,
    ) -> Result<wgpu::ShaderModule, MolvisError> {
        let naga_module = self.compose_naga(shader)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader into a `naga::Module` without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::Shader`] if composition fails.
    pub fn compose_naga(
        &mut self,
        shader: ShaderSource,
    ) -> Result<naga::Module, MolvisError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source: shader.source,
                file_path: shader.file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                MolvisError::Shader(format!(
                    "failed to compose shader '{}': {e}",
                    shader.file_path
                ))
            })
    }
}
