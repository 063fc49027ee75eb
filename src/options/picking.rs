use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Picking", inline)]
#[serde(default)]
/// Mouse and touch picking behavior.
pub struct PickingOptions {
    /// Longest press (ms) that still counts as a click.
    #[schemars(title = "Click Time (ms)", range(min = 50, max = 1000), extend("step" = 5))]
    pub click_max_ms: u64,
    /// Cursor movement (px) after which a press becomes a drag.
    #[schemars(skip)]
    pub drag_threshold: f32,
    /// Whether hovering highlights atoms.
    #[schemars(title = "Hover Highlight")]
    pub hover_highlight: bool,
}

impl Default for PickingOptions {
    fn default() -> Self {
        Self {
            click_max_ms: 125,
            drag_threshold: 1.0,
            hover_highlight: true,
        }
    }
}
