//! VR session lifecycle and the in-headset info panel.

use glam::Vec3;

use super::locomotion::{CameraRig, Locomotion};
use crate::options::XrOptions;

/// State that only exists while a VR session runs.
#[derive(Debug, Default)]
pub struct XrSession {
    active: bool,
    /// Camera rig the headset and controllers hang from.
    pub rig: CameraRig,
    /// Gamepad processing.
    pub locomotion: Locomotion,
    /// Controller and sphere instance the info panel shows.
    info_panel: Option<(u8, u32)>,
}

impl XrSession {
    /// An inactive session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a session runs.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enter VR: the rig moves to the home position.
    pub fn start(&mut self, options: &XrOptions) {
        log::info!("entered VR");
        self.active = true;
        self.rig = CameraRig::at(Vec3::from(options.home_position));
        self.locomotion.reset();
        self.info_panel = None;
    }

    /// Leave VR: the rig returns to the origin, the panel closes and all
    /// controllers are forgotten.
    pub fn end(&mut self) {
        log::info!("exit VR");
        self.active = false;
        self.rig = CameraRig::default();
        self.locomotion.reset();
        self.info_panel = None;
    }

    /// A controller released its trigger while pointing at `picked`.
    ///
    /// Opens the panel when the controller has a pick and no panel is
    /// shown; otherwise closes any open panel. Returns the instance the
    /// panel now shows.
    pub fn select_end(&mut self, controller: u8, picked: Option<u32>) -> Option<u32> {
        match (picked, self.info_panel) {
            (Some(instance), None) => {
                self.info_panel = Some((controller, instance));
                Some(instance)
            }
            (_, Some(_)) => {
                self.info_panel = None;
                None
            }
            (None, None) => None,
        }
    }

    /// Instance shown in the panel.
    #[must_use]
    pub fn info_panel(&self) -> Option<u32> {
        self.info_panel.map(|(_, instance)| instance)
    }
}
