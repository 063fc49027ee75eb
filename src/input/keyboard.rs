use serde::{Deserialize, Serialize};

use crate::engine::command::MolvisCommand;

/// Viewer actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// reset_camera = "KeyR"
/// screenshot = "KeyP"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Fit the camera to the loaded model again.
    ResetCamera,
    /// Unload the model and restore the initial panel.
    ResetViewer,
    /// Save a PNG of the current view.
    Screenshot,
    /// Switch to the next display model.
    CycleDisplayModel,
    /// Remove search highlights.
    ResetSelection,
    /// Hide the atom info panel.
    CloseInfo,
}

impl KeyAction {
    /// The parameterless command this action triggers.
    #[must_use]
    pub fn to_command(self) -> MolvisCommand {
        match self {
            Self::ResetCamera => MolvisCommand::ResetCamera,
            Self::ResetViewer => MolvisCommand::ResetViewer,
            Self::Screenshot => MolvisCommand::TakeScreenshot,
            Self::CycleDisplayModel => MolvisCommand::CycleDisplayModel,
            Self::ResetSelection => MolvisCommand::ResetSelection,
            Self::CloseInfo => MolvisCommand::CloseAtomInfo,
        }
    }
}
