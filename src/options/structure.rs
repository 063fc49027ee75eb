use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::structure::LoadSettings;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Structure", inline)]
#[serde(default)]
/// How structure files are interpreted.
pub struct StructureOptions {
    /// Infer bonds by distance when a PDB file has no CONECT records.
    #[schemars(title = "Infer Bonds")]
    pub infer_bonds: bool,
    /// Extra distance (Å) allowed beyond the summed covalent radii.
    #[schemars(title = "Bond Tolerance", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub bond_tolerance: f32,
}

impl Default for StructureOptions {
    fn default() -> Self {
        let settings = LoadSettings::default();
        Self {
            infer_bonds: settings.infer_bonds,
            bond_tolerance: settings.bond_tolerance,
        }
    }
}

impl StructureOptions {
    /// Parser settings for these options.
    #[must_use]
    pub fn load_settings(&self) -> LoadSettings {
        LoadSettings {
            infer_bonds: self.infer_bonds,
            bond_tolerance: self.bond_tolerance,
        }
    }
}
