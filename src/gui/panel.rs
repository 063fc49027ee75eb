//! Settings-panel state.
//!
//! The panel itself is drawn by the host (an HTML page on the web, a
//! native dialog otherwise); this is the state it mirrors. Folder
//! visibility follows the kind of model that is loaded.

use serde::Serialize;

use crate::options::{DisplayModel, ExampleOptions};
use crate::structure::ModelFormat;

/// Initial value of the atom color picker.
pub const DEFAULT_ATOM_COLOR: u32 = 0x00aa_bbcc;

/// Top-level panel folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Folder {
    /// `Load Model`: open a local file.
    LoadModel,
    /// `Models`: display model radio buttons.
    Models,
    /// `Search for Atoms`: search field, color, resets.
    AtomSearch,
    /// `Misc.`: camera and viewer reset, screenshot.
    Misc,
    /// `Debug`: example models.
    Debug,
}

impl Folder {
    /// Every folder in panel order.
    pub const ALL: [Self; 5] = [
        Self::LoadModel,
        Self::Models,
        Self::AtomSearch,
        Self::Misc,
        Self::Debug,
    ];

    /// Folder title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::LoadModel => "Load Model",
            Self::Models => "Models",
            Self::AtomSearch => "Search for Atoms",
            Self::Misc => "Misc.",
            Self::Debug => "Debug",
        }
    }

    /// Whether the folder depends on the loaded model.
    #[must_use]
    pub fn is_settings(self) -> bool {
        matches!(self, Self::Models | Self::AtomSearch)
    }
}

/// Current values and visibility of the panel widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelState {
    /// Checked radio button in `Models`.
    pub display_model: DisplayModel,
    /// Contents of the search field.
    pub search_field: String,
    /// Value of the atom color picker (`0xRRGGBB`).
    pub atom_color: u32,
    /// Last picked example, if any.
    pub example: Option<String>,
    /// Example lists offered under `Debug`.
    pub examples: ExampleOptions,
    models_visible: bool,
    atom_search_visible: bool,
}

impl PanelState {
    /// Initial panel: Balls and Sticks checked, settings folders hidden.
    #[must_use]
    pub fn new(examples: ExampleOptions) -> Self {
        Self {
            display_model: DisplayModel::default(),
            search_field: String::new(),
            atom_color: DEFAULT_ATOM_COLOR,
            example: None,
            examples,
            models_visible: false,
            atom_search_visible: false,
        }
    }

    /// Whether `folder` is shown.
    #[must_use]
    pub fn is_visible(&self, folder: Folder) -> bool {
        match folder {
            Folder::Models => self.models_visible,
            Folder::AtomSearch => self.atom_search_visible,
            _ => true,
        }
    }

    /// Folders currently shown, in panel order.
    #[must_use]
    pub fn visible_folders(&self) -> Vec<Folder> {
        Folder::ALL
            .into_iter()
            .filter(|f| self.is_visible(*f))
            .collect()
    }

    fn hide_settings(&mut self) {
        self.models_visible = false;
        self.atom_search_visible = false;
    }

    /// Check exactly one display model radio button.
    pub fn select_display_model(&mut self, model: DisplayModel) {
        self.display_model = model;
    }

    /// An example was picked: hide the settings folders until it loads.
    pub fn select_example(&mut self, path: &str) {
        self.example = Some(path.to_owned());
        self.hide_settings();
    }

    /// A model finished loading: show the folders that apply to it.
    pub fn model_loaded(&mut self, format: ModelFormat) {
        self.hide_settings();
        if format.is_molecular() {
            self.models_visible = true;
            self.atom_search_visible = true;
        }
    }

    /// Loading failed or the model was dropped.
    pub fn model_cleared(&mut self) {
        self.hide_settings();
    }

    /// Back to the state right after start-up.
    pub fn reset(&mut self) {
        let examples = std::mem::take(&mut self.examples);
        *self = Self::new(examples);
    }

    /// The state as JSON, for web hosts.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(map) = value.as_object_mut() {
            let _ = map.insert(
                "visible_folders".into(),
                serde_json::to_value(self.visible_folders()).unwrap_or_default(),
            );
        }
        value
    }
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new(ExampleOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_start_hidden() {
        let panel = PanelState::default();
        assert_eq!(
            panel.visible_folders(),
            vec![Folder::LoadModel, Folder::Misc, Folder::Debug]
        );
        assert_eq!(panel.atom_color, 0x00aa_bbcc);
        assert_eq!(panel.display_model, DisplayModel::BallsAndSticks);
    }

    #[test]
    fn pdb_shows_models_and_search() {
        let mut panel = PanelState::default();
        panel.model_loaded(ModelFormat::Pdb);
        assert!(panel.is_visible(Folder::Models));
        assert!(panel.is_visible(Folder::AtomSearch));
        panel.model_loaded(ModelFormat::Stl);
        assert!(!panel.is_visible(Folder::Models));
        panel.model_loaded(ModelFormat::Json);
        assert!(!panel.is_visible(Folder::AtomSearch));
    }

    #[test]
    fn picking_an_example_hides_settings() {
        let mut panel = PanelState::default();
        panel.model_loaded(ModelFormat::Pdb);
        panel.select_example("models/obj/2ptc-74k.obj");
        assert!(!panel.is_visible(Folder::Models));
        assert_eq!(panel.example.as_deref(), Some("models/obj/2ptc-74k.obj"));
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut panel = PanelState::default();
        panel.model_loaded(ModelFormat::Pdb);
        panel.select_display_model(DisplayModel::Wireframe);
        panel.search_field = "C".into();
        panel.atom_color = 0x00ff_0000;
        panel.reset();
        assert_eq!(panel, PanelState::default());
    }

    #[test]
    fn json_lists_visible_folders() {
        let mut panel = PanelState::default();
        panel.model_loaded(ModelFormat::Pdb);
        let json = panel.to_json();
        assert_eq!(json["display_model"], "balls_and_sticks");
        assert_eq!(json["visible_folders"].as_array().map(Vec::len), Some(5));
        assert_eq!(Folder::AtomSearch.title(), "Search for Atoms");
    }
}
