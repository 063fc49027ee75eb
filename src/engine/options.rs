//! Options methods for ViewerState

use std::path::Path;

use super::ViewerState;
use crate::options::Options;

impl ViewerState {
    /// Replace options and apply all changes to subsystems.
    pub fn set_options(&mut self, new: Options) {
        self.options = new;
        self.apply_options();
    }

    /// Push current option values to the camera, input and scene.
    /// Lighting and background are read by the renderer every frame.
    pub fn apply_options(&mut self) {
        self.camera.apply_options(&self.options.camera);
        self.input
            .apply_options(&self.options.picking, &self.options.keybindings);

        let display = self.options.display.display_model;
        if display == self.scene.display_model() {
            self.scene.rebuild(&self.options);
        } else {
            self.panel.select_display_model(display);
            self.scene.set_display_model(display, &self.options);
        }
        self.picker.set_enabled(self.scene.picking_enabled());
        self.request_redraw();
    }

    /// Load a named view preset from the presets directory.
    /// Returns true on success.
    pub fn load_preset(&mut self, name: &str, presets_dir: &Path) -> bool {
        let path = presets_dir.join(format!("{name}.toml"));
        match Options::load(&path) {
            Ok(opts) => {
                log::info!("Loaded view preset '{name}'");
                self.set_options(opts);
                self.active_preset = Some(name.to_owned());
                true
            }
            Err(e) => {
                log::error!("Failed to load view preset '{name}': {e}");
                false
            }
        }
    }

    /// Save the current options as a named view preset.
    /// Returns true on success.
    pub fn save_preset(&mut self, name: &str, presets_dir: &Path) -> bool {
        let path = presets_dir.join(format!("{name}.toml"));
        match self.options.save(&path) {
            Ok(()) => {
                log::info!("Saved view preset '{name}'");
                self.active_preset = Some(name.to_owned());
                true
            }
            Err(e) => {
                log::error!("Failed to save view preset '{name}': {e}");
                false
            }
        }
    }

    /// Name of the last loaded or saved preset.
    #[must_use]
    pub fn active_preset(&self) -> Option<&str> {
        self.active_preset.as_deref()
    }

    /// Toggle the bounding-box outline
    pub fn toggle_bounds(&mut self) {
        self.options.display.show_bounds = !self.options.display.show_bounds;
        self.scene.rebuild(&self.options);
        self.request_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MolvisCommand;
    use crate::options::DisplayModel;

    const PAIR: &str = "\
ATOM      1  C   GLY A   1       0.000   0.000   0.000  1.00  0.00           C
ATOM      2  O   GLY A   1       1.200   0.000   0.000  1.00  0.00           O
END
";

    fn loaded() -> ViewerState {
        let mut s = ViewerState::new(Options::default(), 640, 480);
        let _ = s.execute(MolvisCommand::LoadBytes {
            name: "pair.pdb".into(),
            bytes: PAIR.as_bytes().to_vec(),
        });
        s
    }

    #[test]
    fn presets_round_trip_through_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = loaded();
        s.options.display.display_model = DisplayModel::VanDerWaals;
        assert!(s.save_preset("big", dir.path()));
        assert_eq!(s.active_preset(), Some("big"));

        let mut other = loaded();
        assert!(other.load_preset("big", dir.path()));
        assert_eq!(other.scene().display_model(), DisplayModel::VanDerWaals);
        assert_eq!(other.panel().display_model, DisplayModel::VanDerWaals);
        assert!(!other.load_preset("missing", dir.path()));
        assert_eq!(Options::list_presets(dir.path()), vec!["big".to_owned()]);
    }

    #[test]
    fn geometry_changes_keep_search_highlights() {
        let mut s = loaded();
        let _ = s.execute(MolvisCommand::SearchAtoms("O".into()));
        let mut opts = s.options().clone();
        opts.geometry.ball_scale *= 2.0;
        s.set_options(opts);
        assert_eq!(s.scene().colors().selected_count(), 1);
    }

    #[test]
    fn toggling_bounds_adds_edges() {
        let mut s = loaded();
        let before = s.scene().geometry().cylinders.len();
        s.toggle_bounds();
        let after = s.scene().geometry().cylinders.len();
        assert_eq!(before.abs_diff(after), 12);
    }
}
