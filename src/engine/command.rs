//! The viewer's complete interactive vocabulary.
//!
//! Every user-facing operation (key press, mouse gesture, panel button,
//! VR controller or programmatic call) is represented as a
//! `MolvisCommand`. Consumers construct commands and pass them to
//! [`ViewerState::execute`](super::ViewerState::execute).

use std::path::PathBuf;

use glam::Vec2;

use crate::options::DisplayModel;
use crate::xr::XrFrame;

/// A discrete or parameterized operation the viewer can perform.
///
/// ```ignore
/// state.execute(MolvisCommand::SetDisplayModel(DisplayModel::Wireframe));
/// state.execute(MolvisCommand::Zoom { delta: 1.0 });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum MolvisCommand {
    // ── Loading ─────────────────────────────────────────────────────
    /// Load a model file from disk.
    LoadPath(PathBuf),

    /// Load a model from memory (dropped or uploaded file, download).
    LoadBytes {
        /// File name; its extension picks the parser.
        name: String,
        /// File contents.
        bytes: Vec<u8>,
    },

    /// Load one of the configured example models.
    LoadExample(String),

    /// Ask the host to show a file picker.
    OpenFileDialog,

    // ── Display ─────────────────────────────────────────────────────
    /// Switch the molecule display model.
    SetDisplayModel(DisplayModel),

    /// Switch to the next display model.
    CycleDisplayModel,

    // ── Atom search ─────────────────────────────────────────────────
    /// Highlight atoms by comma-separated element symbols.
    SearchAtoms(String),

    /// Recolor the highlighted atoms (`0xRRGGBB`).
    SetAtomColor(u32),

    /// Undo every recolor.
    ResetAtomColor,

    /// Remove search highlights.
    ResetSelection,

    // ── Camera ──────────────────────────────────────────────────────
    /// Rotate the camera by `delta` pixels of pointer movement.
    RotateCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Pan the camera by `delta` pixels of pointer movement.
    PanCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Zoom the camera (positive = zoom in, negative = zoom out).
    Zoom {
        /// Scroll amount.
        delta: f32,
    },

    /// Fit the camera to the loaded model again.
    ResetCamera,

    /// The drawing surface changed size.
    Resize {
        /// Width in physical pixels.
        width: u32,
        /// Height in physical pixels.
        height: u32,
    },

    // ── Picking ─────────────────────────────────────────────────────
    /// Hover-pick at a screen position.
    PickAt {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },

    /// The pointer left: drop the hover highlight.
    ClearPick,

    /// Show the info panel for the hovered atom.
    ShowAtomInfo,

    /// Hide the info panel.
    CloseAtomInfo,

    // ── Viewer ──────────────────────────────────────────────────────
    /// Unload the model and restore the initial panel and camera.
    ResetViewer,

    /// Save a PNG of the current view.
    TakeScreenshot,

    /// Patch one option from the panel.
    SetOption {
        /// Options section, e.g. `"lighting"`.
        section: String,
        /// Field inside the section.
        field: String,
        /// New value.
        value: serde_json::Value,
    },

    // ── VR ──────────────────────────────────────────────────────────
    /// A VR session started.
    StartXr,

    /// The VR session ended.
    EndXr,

    /// A controller's select (trigger) was released.
    XrSelectEnd {
        /// Input-source index.
        controller: u8,
    },

    /// Per-frame controller poses and gamepad state.
    XrFrame(XrFrame),
}

impl MolvisCommand {
    /// Whether the command only moves the pointer.
    ///
    /// Hover picks redraw only if the highlight changed, so hosts may
    /// coalesce them.
    #[must_use]
    pub fn is_hover(&self) -> bool {
        matches!(self, Self::PickAt { .. } | Self::ClearPick)
    }
}
