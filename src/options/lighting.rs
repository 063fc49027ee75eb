use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Key/fill directional lights with Blinn-Phong specular.
pub struct LightingOptions {
    #[schemars(title = "Key Light", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    /// Key light intensity.
    pub light1_intensity: f32,
    #[schemars(title = "Fill Light", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    /// Fill light intensity.
    pub light2_intensity: f32,
    #[schemars(skip)]
    /// Key light direction in view space.
    pub light1_dir: [f32; 3],
    #[schemars(skip)]
    /// Fill light direction in view space.
    pub light2_dir: [f32; 3],
    #[schemars(title = "Ambient", range(min = 0.0, max = 0.7), extend("step" = 0.01))]
    /// Ambient light level.
    pub ambient: f32,
    #[schemars(skip)]
    /// Specular highlight intensity.
    pub specular_intensity: f32,
    #[schemars(skip)]
    /// Blinn-Phong shininess exponent.
    pub shininess: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            light1_intensity: 1.0,
            light2_intensity: 0.5,
            // View space: from upper left, and from below right.
            light1_dir: [-0.3, 0.5, 1.0],
            light2_dir: [0.4, -0.6, 0.5],
            ambient: 0.25,
            specular_intensity: 0.35,
            shininess: 38.0,
        }
    }
}
