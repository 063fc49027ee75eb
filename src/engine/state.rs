//! Everything the viewer knows apart from GPU resources.
//!
//! [`ViewerState`] executes [`MolvisCommand`]s against the scene, camera,
//! picker, panel and VR session, and reports what the host has to do in
//! response as [`Effect`]s. It never touches the GPU, so it runs the same
//! in tests, natively and in the browser.

use std::path::Path;

use glam::Vec2;

use super::command::MolvisCommand;
use crate::camera::{screen_to_ndc, CameraController};
use crate::gui::PanelState;
use crate::input::{InputEvent, InputProcessor};
use crate::options::Options;
use crate::picking::ObjectPicker;
use crate::scene::{AtomInfo, Pointer, Scene};
use crate::structure::{self, LoadedModel, ModelFormat};
use crate::xr::{HapticPulse, XrFrame, XrSession};

/// Something the host has to do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Show the info panel for a clicked atom.
    ShowAtomInfo(AtomInfo),
    /// Hide the info panel.
    HideAtomInfo,
    /// Save a screenshot of the next frame.
    CaptureScreenshot,
    /// Show a file picker and send back `LoadPath` or `LoadBytes`.
    OpenFileDialog,
    /// Download `url` and send it back as `LoadBytes` named `name`.
    FetchModel {
        /// File name to load the bytes as.
        name: String,
        /// Where to get them.
        url: String,
    },
    /// Vibrate a VR controller.
    Haptic(HapticPulse),
    /// Length of a VR controller's pointer line this frame.
    XrPointer {
        /// Input-source index.
        controller: u8,
        /// Line length in meters.
        length: f32,
    },
    /// Something failed; tell the user.
    Error(String),
}

impl Effect {
    /// `{"effect": "...", ...}` message for hosts talking JSON.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        match self {
            Self::ShowAtomInfo(info) => {
                json!({"effect": "show_atom_info", "rows": info.to_json()})
            }
            Self::HideAtomInfo => json!({"effect": "hide_atom_info"}),
            Self::CaptureScreenshot => json!({"effect": "capture_screenshot"}),
            Self::OpenFileDialog => json!({"effect": "open_file_dialog"}),
            Self::FetchModel { name, url } => {
                json!({"effect": "fetch_model", "name": name, "url": url})
            }
            Self::Haptic(pulse) => json!({
                "effect": "haptic",
                "controller": pulse.controller,
                "strength": pulse.strength,
                "duration_ms": pulse.duration_ms,
            }),
            Self::XrPointer { controller, length } => json!({
                "effect": "xr_pointer",
                "controller": controller,
                "length": length,
            }),
            Self::Error(message) => json!({"effect": "error", "message": message}),
        }
    }
}

/// CPU-side viewer state.
#[derive(Debug)]
pub struct ViewerState {
    pub(crate) options: Options,
    pub(crate) scene: Scene,
    pub(crate) camera: CameraController,
    pub(crate) picker: ObjectPicker,
    pub(crate) input: InputProcessor,
    pub(crate) panel: PanelState,
    pub(crate) xr: XrSession,
    pub(crate) active_preset: Option<String>,
    viewport: (u32, u32),
    info_open: bool,
    redraw: bool,
}

fn is_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

impl ViewerState {
    /// Empty viewer for a `width` × `height` viewport.
    #[must_use]
    pub fn new(options: Options, width: u32, height: u32) -> Self {
        let camera = CameraController::new(&options.camera, width, height);
        let input = InputProcessor::with_options(
            &options.picking,
            options.keybindings.clone(),
        );
        let panel = PanelState::new(options.examples.clone());
        Self {
            options,
            scene: Scene::new(),
            camera,
            picker: ObjectPicker::new(),
            input,
            panel,
            xr: XrSession::new(),
            active_preset: None,
            viewport: (width.max(1), height.max(1)),
            info_open: false,
            redraw: true,
        }
    }

    // -- Accessors --

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access for renderers that consume dirty flags.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The camera controller.
    #[must_use]
    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// The picker.
    #[must_use]
    pub fn picker(&self) -> &ObjectPicker {
        &self.picker
    }

    /// The settings-panel state.
    #[must_use]
    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    /// The VR session.
    #[must_use]
    pub fn xr(&self) -> &XrSession {
        &self.xr
    }

    /// Viewport size in physical pixels.
    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Whether the atom info panel is open.
    #[must_use]
    pub fn info_open(&self) -> bool {
        self.info_open
    }

    /// Ask for a frame.
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Whether a frame was requested; clears the request.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    // -- Input --

    /// Route a raw input event through the input processor.
    pub fn handle_input(&mut self, event: InputEvent) -> Vec<Effect> {
        self.input
            .handle_event(event)
            .map(|cmd| self.execute(cmd))
            .unwrap_or_default()
    }

    /// Route a key press through the key bindings.
    pub fn handle_key(&mut self, key: &str) -> Vec<Effect> {
        self.input
            .handle_key_press(key)
            .map(|cmd| self.execute(cmd))
            .unwrap_or_default()
    }

    // -- Commands --

    /// Execute one command.
    pub fn execute(&mut self, command: MolvisCommand) -> Vec<Effect> {
        let mut effects = Vec::new();
        match command {
            MolvisCommand::LoadPath(path) => self.load_path(&path, &mut effects),
            MolvisCommand::LoadBytes { name, bytes } => {
                self.load_bytes(&name, &bytes, &mut effects);
            }
            MolvisCommand::LoadExample(path) => {
                self.load_example(&path, &mut effects);
            }
            MolvisCommand::OpenFileDialog => effects.push(Effect::OpenFileDialog),

            MolvisCommand::SetDisplayModel(model) => self.set_display_model(model),
            MolvisCommand::CycleDisplayModel => {
                if self.scene.model().is_some_and(|m| m.as_molecule().is_some()) {
                    self.set_display_model(self.scene.display_model().next());
                }
            }

            MolvisCommand::SearchAtoms(query) => {
                let count = self.scene.select_atoms(&query);
                log::info!("atom search {query:?}: {count} atoms highlighted");
                self.panel.search_field = query;
                self.redraw_if_colors_changed();
            }
            MolvisCommand::SetAtomColor(color) => {
                self.panel.atom_color = color;
                let _ = self.scene.recolor_selection(color);
                self.redraw_if_colors_changed();
            }
            MolvisCommand::ResetAtomColor => {
                self.scene.reset_atom_colors();
                self.redraw_if_colors_changed();
            }
            MolvisCommand::ResetSelection => {
                self.scene.reset_selection();
                self.redraw_if_colors_changed();
            }

            MolvisCommand::RotateCamera { delta } => {
                self.camera.rotate(delta);
                self.redraw = true;
            }
            MolvisCommand::PanCamera { delta } => {
                self.camera.pan(delta);
                self.redraw = true;
            }
            MolvisCommand::Zoom { delta } => {
                self.camera.zoom(delta);
                self.redraw = true;
            }
            MolvisCommand::ResetCamera => {
                self.camera.reset();
                self.redraw = true;
            }
            MolvisCommand::Resize { width, height } => {
                if width > 0 && height > 0 {
                    self.viewport = (width, height);
                    self.camera.resize(width, height);
                    self.redraw = true;
                }
            }

            MolvisCommand::PickAt { x, y } => self.pick_at(x, y),
            MolvisCommand::ClearPick => {
                if self.picker.clear_pointer(&mut self.scene) {
                    self.redraw = true;
                }
            }
            MolvisCommand::ShowAtomInfo => {
                if let Some(info) = self.hovered_info() {
                    self.info_open = true;
                    effects.push(Effect::ShowAtomInfo(info));
                }
            }
            MolvisCommand::CloseAtomInfo => self.close_info(&mut effects),

            MolvisCommand::ResetViewer => self.reset_viewer(&mut effects),
            MolvisCommand::TakeScreenshot => {
                self.redraw = true;
                effects.push(Effect::CaptureScreenshot);
            }
            MolvisCommand::SetOption {
                section,
                field,
                value,
            } => {
                let mut options = self.options.clone();
                match options.set_field(&section, &field, value) {
                    Ok(()) => self.set_options(options),
                    Err(e) => {
                        log::warn!("{e}");
                        effects.push(Effect::Error(e.to_string()));
                    }
                }
            }

            MolvisCommand::StartXr => {
                self.xr.start(&self.options.xr);
                self.redraw = true;
            }
            MolvisCommand::EndXr => {
                self.xr.end();
                self.picker.clear_controllers(&mut self.scene);
                effects.push(Effect::HideAtomInfo);
                self.redraw = true;
            }
            MolvisCommand::XrSelectEnd { controller } => {
                self.xr_select_end(controller, &mut effects);
            }
            MolvisCommand::XrFrame(frame) => self.xr_frame(&frame, &mut effects),
        }
        effects
    }

    /// Request a frame when a color layer changed. The flag itself stays
    /// set for the renderer, which clears it on upload.
    fn redraw_if_colors_changed(&mut self) {
        if self.scene.colors_changed() {
            self.redraw = true;
        }
    }

    // -- Loading --

    fn load_path(&mut self, path: &Path, effects: &mut Vec<Effect>) {
        self.unload(effects);
        let result = ModelFormat::from_path(path).and_then(|format| {
            structure::load_path(path, &self.options.structure.load_settings())
                .map(|model| (format, model))
        });
        match result {
            Ok((format, model)) => self.install_model(format, model),
            Err(e) => self.load_failed(&path.display().to_string(), &e, effects),
        }
    }

    fn load_bytes(&mut self, name: &str, bytes: &[u8], effects: &mut Vec<Effect>) {
        self.unload(effects);
        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name);
        let settings = self.options.structure.load_settings();
        let result = ModelFormat::from_name(name).and_then(|format| {
            structure::parse_bytes(format, stem, bytes, &settings)
                .map(|model| (format, model))
        });
        match result {
            Ok((format, model)) => self.install_model(format, model),
            Err(e) => self.load_failed(name, &e, effects),
        }
    }

    fn load_example(&mut self, path: &str, effects: &mut Vec<Effect>) {
        if !self.options.examples.contains(path) {
            log::warn!("{path} is not a listed example");
        }
        self.panel.select_example(path);
        let resolved = self.options.examples.resolve(path);
        if is_url(&resolved) || cfg!(target_arch = "wasm32") {
            self.unload(effects);
            let name = Path::new(path)
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or(path)
                .to_owned();
            effects.push(Effect::FetchModel {
                name,
                url: resolved,
            });
        } else {
            self.load_path(Path::new(&resolved), effects);
        }
    }

    /// Drop the current model before loading another one.
    fn unload(&mut self, effects: &mut Vec<Effect>) {
        self.close_info(effects);
        self.scene.clear();
        self.picker.set_enabled(false);
        self.redraw = true;
    }

    fn install_model(&mut self, format: ModelFormat, model: LoadedModel) {
        self.scene.set_model(model, &self.options);
        self.picker.set_enabled(self.scene.picking_enabled());
        self.panel.model_loaded(format);
        self.panel.select_display_model(self.scene.display_model());
        self.camera.fit_to_bounds(&self.scene.bounds());
        self.redraw = true;
    }

    fn load_failed(
        &mut self,
        what: &str,
        error: &crate::error::MolvisError,
        effects: &mut Vec<Effect>,
    ) {
        log::error!("failed to load {what}: {error}");
        self.panel.model_cleared();
        effects.push(Effect::Error(format!("Could not load {what}: {error}")));
    }

    // -- Display --

    fn set_display_model(&mut self, model: crate::options::DisplayModel) {
        self.options.display.display_model = model;
        self.panel.select_display_model(model);
        self.scene.set_display_model(model, &self.options);
        self.picker.set_enabled(self.scene.picking_enabled());
        self.redraw = true;
    }

    // -- Picking --

    fn pick_at(&mut self, x: f32, y: f32) {
        if !self.picker.enabled() {
            return;
        }
        let (w, h) = self.viewport;
        let ndc: Vec2 = screen_to_ndc(x, y, w as f32, h as f32);
        if self
            .picker
            .pick_screen(&mut self.scene, &self.camera.camera, ndc)
        {
            self.redraw = true;
        }
    }

    fn hovered_info(&self) -> Option<AtomInfo> {
        if !self.picker.enabled() {
            return None;
        }
        let instance = self.scene.hovered(Pointer::Mouse)?;
        self.scene.atom_info(instance)
    }

    fn close_info(&mut self, effects: &mut Vec<Effect>) {
        if std::mem::take(&mut self.info_open) {
            effects.push(Effect::HideAtomInfo);
        }
    }

    // -- Viewer --

    fn reset_viewer(&mut self, effects: &mut Vec<Effect>) {
        log::info!("resetting viewer");
        self.unload(effects);
        self.options.display.display_model = Default::default();
        self.panel.reset();
        self.camera.clear(&self.options.camera);
    }

    // -- VR --

    fn xr_select_end(&mut self, controller: u8, effects: &mut Vec<Effect>) {
        let picked = self.picker.controller_hit(controller).map(|h| h.instance);
        let was_open = self.xr.info_panel().is_some();
        match self.xr.select_end(controller, picked) {
            Some(instance) => {
                if let Some(info) = self.scene.atom_info(instance) {
                    effects.push(Effect::ShowAtomInfo(info));
                }
            }
            None if was_open => effects.push(Effect::HideAtomInfo),
            None => {}
        }
        self.redraw = true;
    }

    fn xr_frame(&mut self, frame: &XrFrame, effects: &mut Vec<Effect>) {
        if !self.xr.is_active() {
            return;
        }
        let pulses = self.xr.locomotion.update(
            &mut self.xr.rig,
            frame.view_dir,
            &frame.sources,
            &self.options.xr,
        );
        effects.extend(pulses.into_iter().map(Effect::Haptic));

        for source in &frame.sources {
            let Some(pose) = &source.pose else {
                continue;
            };
            let length = self.picker.pick_controller(
                &mut self.scene,
                source.index,
                pose,
                self.options.xr.pointer_length,
            );
            effects.push(Effect::XrPointer {
                controller: source.index,
                length,
            });
        }
        self.redraw = true;
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::*;
    use crate::options::DisplayModel;
    use crate::xr::{ControllerPose, GamepadSnapshot, Handedness, XrInputSource};

    const WATER: &str = "\
HETATM    1  O   HOH A   1       0.000   0.000   0.000  1.00  0.00           O
HETATM    2  H1  HOH A   1       0.957   0.000   0.000  1.00  0.00           H
HETATM    3  H2  HOH A   1      -0.240   0.927   0.000  1.00  0.00           H
END
";

    fn state() -> ViewerState {
        let mut options = Options::default();
        options.display.show_bounds = false;
        ViewerState::new(options, 800, 600)
    }

    fn loaded() -> ViewerState {
        let mut s = state();
        let effects = s.execute(MolvisCommand::LoadBytes {
            name: "water.pdb".into(),
            bytes: WATER.as_bytes().to_vec(),
        });
        assert!(effects.is_empty(), "{effects:?}");
        s
    }

    /// Screen position of sphere instance `i` under the current camera.
    fn screen_pos(s: &ViewerState, i: usize) -> (f32, f32) {
        let p = s.scene.geometry().spheres[i].position();
        let clip = s.camera.camera.build_matrix() * p.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        let (w, h) = s.viewport();
        ((ndc.x + 1.0) * 0.5 * w as f32, (1.0 - ndc.y) * 0.5 * h as f32)
    }

    #[test]
    fn loading_fits_camera_and_shows_settings() {
        let mut s = loaded();
        assert!(s.take_redraw());
        assert!(s.picker().enabled());
        assert!(s.panel().is_visible(crate::gui::Folder::AtomSearch));
        assert_eq!(s.camera().camera.target, s.scene().bounds().center());
    }

    #[test]
    fn failed_load_reports_an_error_and_stays_empty() {
        let mut s = loaded();
        let effects = s.execute(MolvisCommand::LoadBytes {
            name: "broken.pdb".into(),
            bytes: b"nothing here".to_vec(),
        });
        assert!(matches!(effects.as_slice(), [Effect::Error(_)]));
        assert!(!s.scene().has_model());
        assert!(!s.picker().enabled());

        let effects = s.execute(MolvisCommand::LoadBytes {
            name: "mol.xyz".into(),
            bytes: vec![],
        });
        assert!(matches!(effects.as_slice(), [Effect::Error(_)]));
    }

    #[test]
    fn hover_then_click_shows_info() {
        let mut s = loaded();
        let (x, y) = screen_pos(&s, 0);
        let _ = s.execute(MolvisCommand::PickAt { x, y });
        assert_eq!(s.scene().hovered(Pointer::Mouse), Some(0));
        let effects = s.execute(MolvisCommand::ShowAtomInfo);
        let [Effect::ShowAtomInfo(info)] = effects.as_slice() else {
            panic!("expected info, got {effects:?}");
        };
        assert_eq!(info.symbol.as_deref(), Some("O"));
        assert!(s.info_open());
        assert_eq!(s.execute(MolvisCommand::CloseAtomInfo), vec![Effect::HideAtomInfo]);
        assert_eq!(s.execute(MolvisCommand::CloseAtomInfo), vec![]);
    }

    #[test]
    fn click_on_empty_space_shows_nothing() {
        let mut s = loaded();
        let _ = s.execute(MolvisCommand::PickAt { x: 1.0, y: 1.0 });
        assert!(s.execute(MolvisCommand::ShowAtomInfo).is_empty());
        let _ = s.execute(MolvisCommand::ClearPick);
        assert_eq!(s.scene().hovered(Pointer::Mouse), None);
    }

    #[test]
    fn search_recolor_and_reset() {
        let mut s = loaded();
        let _ = s.execute(MolvisCommand::SearchAtoms("h".into()));
        assert_eq!(s.scene().colors().selected_count(), 2);
        assert_eq!(s.panel().search_field, "h");
        let _ = s.execute(MolvisCommand::SetAtomColor(0x0000_ff00));
        assert_eq!(s.scene().sphere_instances()[1].color, [0.0, 1.0, 0.0, 1.0]);
        let _ = s.execute(MolvisCommand::ResetAtomColor);
        assert_ne!(s.scene().sphere_instances()[1].color, [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn display_model_changes_follow_the_panel() {
        let mut s = loaded();
        let _ = s.execute(MolvisCommand::SetDisplayModel(DisplayModel::Wireframe));
        assert_eq!(s.panel().display_model, DisplayModel::Wireframe);
        assert!(!s.picker().enabled());
        let _ = s.execute(MolvisCommand::CycleDisplayModel);
        assert_eq!(s.scene().display_model(), DisplayModel::VanDerWaals);
        assert!(s.picker().enabled());
    }

    #[test]
    fn reset_viewer_returns_to_start_up() {
        let mut s = loaded();
        let _ = s.execute(MolvisCommand::SetDisplayModel(DisplayModel::VanDerWaals));
        let _ = s.execute(MolvisCommand::ResetViewer);
        assert!(!s.scene().has_model());
        assert_eq!(s.panel(), &PanelState::new(s.options().examples.clone()));
        assert_eq!(s.options().display.display_model, DisplayModel::BallsAndSticks);
        assert_eq!(s.camera().focus_point(), Vec3::ZERO);
    }

    #[test]
    fn set_option_applies_or_reports() {
        let mut s = loaded();
        let effects = s.execute(MolvisCommand::SetOption {
            section: "camera".into(),
            field: "fovy".into(),
            value: serde_json::json!(60.0),
        });
        assert!(effects.is_empty());
        assert_eq!(s.camera().camera.fovy, 60.0);
        let effects = s.execute(MolvisCommand::SetOption {
            section: "camera".into(),
            field: "nope".into(),
            value: serde_json::json!(1),
        });
        assert!(matches!(effects.as_slice(), [Effect::Error(_)]));
    }

    #[test]
    fn screenshot_and_file_dialog_are_host_effects() {
        let mut s = state();
        assert_eq!(s.execute(MolvisCommand::TakeScreenshot), vec![Effect::CaptureScreenshot]);
        assert_eq!(s.execute(MolvisCommand::OpenFileDialog), vec![Effect::OpenFileDialog]);
    }

    #[test]
    fn url_examples_are_fetched_by_the_host() {
        let mut options = Options::default();
        options.examples.base = "https://example.org/assets".into();
        let mut s = ViewerState::new(options, 100, 100);
        let effects = s.execute(MolvisCommand::LoadExample("models/pdb/1wxr.pdb".into()));
        assert_eq!(
            effects,
            vec![Effect::FetchModel {
                name: "1wxr.pdb".into(),
                url: "https://example.org/assets/models/pdb/1wxr.pdb".into(),
            }]
        );
    }

    #[test]
    fn example_files_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("models/pdb")).unwrap();
        std::fs::write(dir.path().join("models/pdb/caffeine.pdb"), WATER).unwrap();
        let mut options = Options::default();
        options.examples.base = dir.path().display().to_string();
        let mut s = ViewerState::new(options, 100, 100);
        let effects = s.execute(MolvisCommand::LoadExample("models/pdb/caffeine.pdb".into()));
        assert!(effects.is_empty(), "{effects:?}");
        assert_eq!(s.scene().model().map(LoadedModel::name), Some("caffeine"));
    }

    #[test]
    fn vr_pointer_picks_and_select_toggles_the_panel() {
        let mut s = loaded();
        let _ = s.execute(MolvisCommand::StartXr);
        let target = s.scene().geometry().spheres[0].position();
        let origin = target + Vec3::new(0.0, 0.0, 5.0);
        let frame = XrFrame {
            view_dir: Vec3::NEG_Z,
            sources: vec![XrInputSource {
                index: 0,
                handedness: Handedness::Right,
                pose: Some(ControllerPose {
                    position: origin,
                    orientation: Quat::IDENTITY,
                }),
                gamepad: Some(GamepadSnapshot::default()),
            }],
        };
        let effects = s.execute(MolvisCommand::XrFrame(frame));
        let Some(Effect::XrPointer { length, .. }) = effects.last() else {
            panic!("expected pointer length, got {effects:?}");
        };
        assert!(*length < 10.0);

        let effects = s.execute(MolvisCommand::XrSelectEnd { controller: 0 });
        assert!(matches!(effects.as_slice(), [Effect::ShowAtomInfo(_)]));
        let effects = s.execute(MolvisCommand::XrSelectEnd { controller: 0 });
        assert_eq!(effects, vec![Effect::HideAtomInfo]);

        let effects = s.execute(MolvisCommand::EndXr);
        assert_eq!(effects, vec![Effect::HideAtomInfo]);
        assert_eq!(s.xr().rig.position, Vec3::ZERO);
        assert_eq!(s.scene().hovered(Pointer::Controller(0)), None);
    }

    #[test]
    fn xr_frames_are_ignored_outside_a_session() {
        let mut s = loaded();
        assert!(s.execute(MolvisCommand::XrFrame(XrFrame::default())).is_empty());
    }

    #[test]
    fn input_events_drive_commands() {
        let mut s = loaded();
        let before = s.camera().camera.eye;
        assert!(s.take_redraw());
        let _ = s.handle_input(InputEvent::MouseButton {
            button: crate::input::MouseButton::Left,
            pressed: true,
        });
        let _ = s.handle_input(InputEvent::CursorMoved { x: 40.0, y: 0.0 });
        assert_ne!(s.camera().camera.eye, before);
        assert!(s.take_redraw());
        let _ = s.handle_key("KeyR");
        assert!(s.take_redraw());
    }

    #[test]
    fn effects_serialize_for_json_hosts() {
        let fetch = Effect::FetchModel {
            name: "a.pdb".into(),
            url: "https://example.org/a.pdb".into(),
        };
        assert_eq!(fetch.to_json()["effect"], "fetch_model");
        assert_eq!(fetch.to_json()["name"], "a.pdb");

        let info = Effect::ShowAtomInfo(AtomInfo {
            position: Vec3::new(1.0, 2.0, 3.0),
            color: [255, 13, 13],
            symbol: Some("O".into()),
            name: "O".into(),
            residue: String::new(),
        });
        let json = info.to_json();
        assert_eq!(json["rows"]["Position"], "( 1, 2, 3 )");
        assert_eq!(json["rows"]["Periodic Table Symbol"], "O");
        assert_eq!(
            Effect::Error("boom".into()).to_json()["message"],
            "boom"
        );
    }

    #[test]
    fn color_commands_without_changes_do_not_redraw() {
        let mut s = loaded();
        let _ = s.take_redraw();
        let _ = s.scene_mut().take_colors_changed();

        let _ = s.execute(MolvisCommand::ResetSelection);
        let _ = s.execute(MolvisCommand::ResetAtomColor);
        let _ = s.execute(MolvisCommand::SetAtomColor(0x00ff_0000));
        assert!(!s.take_redraw());

        let _ = s.execute(MolvisCommand::SearchAtoms("O".into()));
        assert!(s.take_redraw());
        assert!(s.scene().colors_changed());
    }
}
