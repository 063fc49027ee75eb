//! Centralized viewer options with TOML preset support.
//!
//! All tweakable settings (display model, geometry sizes, camera, lighting,
//! colors, picking, structure parsing, VR locomotion, keybindings and the
//! example list) are consolidated here. Options serialize to/from TOML for
//! presets stored in `assets/presets/`.

mod camera;
mod colors;
mod display;
mod examples;
mod geometry;
mod keybindings;
mod lighting;
mod picking;
mod structure;
mod xr;

use std::path::Path;

pub use camera::CameraOptions;
pub use colors::{rgb_hex_to_rgba, ColorOptions};
pub use display::{DisplayModel, DisplayOptions};
pub use examples::ExampleOptions;
pub use geometry::GeometryOptions;
pub use keybindings::KeybindingOptions;
pub use lighting::LightingOptions;
pub use picking::PickingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use structure::StructureOptions;
pub use xr::XrOptions;

use crate::error::MolvisError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[lighting]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Display model and scene toggles.
    pub display: DisplayOptions,
    /// Primitive sizes and tessellation.
    pub geometry: GeometryOptions,
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Lighting parameters.
    pub lighting: LightingOptions,
    /// Color palette options.
    #[schemars(skip)]
    pub colors: ColorOptions,
    /// Mouse and touch picking.
    pub picking: PickingOptions,
    /// Structure file parsing.
    pub structure: StructureOptions,
    /// VR locomotion tuning.
    #[schemars(skip)]
    pub xr: XrOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
    /// Example models offered in the panel.
    #[schemars(skip)]
    pub examples: ExampleOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::Io`] if the file cannot be read and
    /// [`MolvisError::OptionsParse`] for invalid TOML.
    pub fn load(path: &Path) -> Result<Self, MolvisError> {
        let content = std::fs::read_to_string(path).map_err(MolvisError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::OptionsParse`] for invalid TOML.
    pub fn from_toml(content: &str) -> Result<Self, MolvisError> {
        toml::from_str(content)
            .map_err(|e| MolvisError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::OptionsParse`] if serialization fails and
    /// [`MolvisError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), MolvisError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MolvisError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MolvisError::Io)?;
        }
        std::fs::write(path, content).map_err(MolvisError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }

    /// Patch a single field from a UI message, e.g.
    /// `set_field("lighting", "ambient", 0.3)`.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::OptionsParse`] if the section or field does
    /// not exist or the value has the wrong type.
    pub fn set_field(
        &mut self,
        section: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<(), MolvisError> {
        let mut tree = serde_json::to_value(&*self)
            .map_err(|e| MolvisError::OptionsParse(e.to_string()))?;
        let slot = tree
            .get_mut(section)
            .and_then(|s| s.get_mut(field))
            .ok_or_else(|| {
                MolvisError::OptionsParse(format!(
                    "unknown option {section}.{field}"
                ))
            })?;
        *slot = value;
        *self = serde_json::from_value(tree)
            .map_err(|e| MolvisError::OptionsParse(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[display]
display_model = "van_der_waals"

[lighting]
shininess = 80.0
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.display.display_model, DisplayModel::VanDerWaals);
        assert_eq!(opts.lighting.shininess, 80.0);
        // Everything else should be default
        assert_eq!(opts.lighting.ambient, 0.25);
        assert_eq!(opts.picking.click_max_ms, 125);
        assert_eq!(opts.xr.home_position, [0.0, 1.6, 10.0]);
    }

    #[test]
    fn keybinding_lookup() {
        use crate::input::KeyAction;
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("KeyR"),
            Some(KeyAction::ResetCamera)
        );
        assert_eq!(opts.keybindings.lookup("Escape"), Some(KeyAction::CloseInfo));
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn custom_keybindings_survive_loading() {
        use crate::input::KeyAction;
        let toml_str = r#"
[keybindings.bindings]
screenshot = "F12"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.keybindings.lookup("F12"), Some(KeyAction::Screenshot));
        assert_eq!(opts.keybindings.lookup("KeyP"), None);
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = Options::default();
        opts.display.show_bounds = false;
        opts.save(&dir.path().join("presets/quiet.toml")).unwrap();
        Options::default()
            .save(&dir.path().join("presets/default.toml"))
            .unwrap();
        std::fs::write(dir.path().join("presets/notes.txt"), "x").unwrap();

        let loaded = Options::load(&dir.path().join("presets/quiet.toml")).unwrap();
        assert_eq!(loaded, opts);
        assert_eq!(
            Options::list_presets(&dir.path().join("presets")),
            vec!["default".to_owned(), "quiet".to_owned()]
        );
    }

    #[test]
    fn set_field_patches_one_value() {
        let mut opts = Options::default();
        opts.set_field("geometry", "bond_radius", serde_json::json!(0.2))
            .unwrap();
        assert_eq!(opts.geometry.bond_radius, 0.2);
        assert!(opts
            .set_field("geometry", "nope", serde_json::json!(1))
            .is_err());
        assert!(opts
            .set_field("camera", "fovy", serde_json::json!("wide"))
            .is_err());
        assert_eq!(opts.camera.fovy, 50.0);
    }

    #[test]
    fn invalid_toml_is_reported() {
        assert!(matches!(
            Options::from_toml("[display\n"),
            Err(MolvisError::OptionsParse(_))
        ));
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("display"));
        assert!(props.contains_key("geometry"));
        assert!(props.contains_key("camera"));
        assert!(props.contains_key("lighting"));
        assert!(props.contains_key("picking"));

        assert!(!props.contains_key("colors"));
        assert!(!props.contains_key("keybindings"));
        assert!(!props.contains_key("xr"));

        let lighting = &props["lighting"]["properties"];
        assert!(lighting.get("ambient").is_some());
        assert!(lighting.get("light1_dir").is_none());
    }
}
