use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Geometry", inline)]
#[serde(default)]
/// Sizes and tessellation of the drawn primitives.
pub struct GeometryOptions {
    /// Ball radius as a fraction of the covalent radius.
    #[schemars(title = "Ball Scale", range(min = 0.1, max = 1.5), extend("step" = 0.05))]
    pub ball_scale: f32,
    /// Sphere radius as a fraction of the van der Waals radius.
    #[schemars(title = "VdW Scale", range(min = 0.2, max = 1.5), extend("step" = 0.05))]
    pub vdw_scale: f32,
    /// Bond stick radius in angstroms (balls and sticks).
    #[schemars(title = "Bond Radius", range(min = 0.02, max = 0.5), extend("step" = 0.01))]
    pub bond_radius: f32,
    /// Bond stick radius in angstroms (wireframe).
    #[schemars(title = "Wire Radius", range(min = 0.01, max = 0.2), extend("step" = 0.01))]
    pub wire_radius: f32,
    /// Cartoon tube radius in angstroms.
    #[schemars(title = "Cartoon Radius", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub cartoon_radius: f32,
    /// Spline samples between consecutive CA atoms.
    #[schemars(skip)]
    pub cartoon_segments: u32,
    /// Vertices around the cartoon tube.
    #[schemars(skip)]
    pub tube_sides: u32,
    /// Radius of the bounding-box edge sticks.
    #[schemars(skip)]
    pub bounds_radius: f32,
    /// Icosphere subdivision level of the unit sphere.
    #[schemars(skip)]
    pub sphere_subdivisions: u32,
    /// Sides of the unit cylinder.
    #[schemars(skip)]
    pub cylinder_tessellation: u32,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            ball_scale: 0.5,
            vdw_scale: 1.0,
            bond_radius: 0.1,
            wire_radius: 0.04,
            cartoon_radius: 0.4,
            cartoon_segments: 8,
            tube_sides: 12,
            bounds_radius: 0.03,
            sphere_subdivisions: 2,
            cylinder_tessellation: 32,
        }
    }
}
