use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a molecule is drawn. Exactly one model is active at a time.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DisplayModel {
    /// Atoms as spheres, bonds as uniform sticks.
    #[default]
    BallsAndSticks,
    /// Bonds only, each half colored like its atom.
    Wireframe,
    /// Atoms as van der Waals spheres, no bonds.
    VanDerWaals,
    /// Tube along the alpha-carbon trace (work in progress).
    Cartoon,
}

impl DisplayModel {
    /// All models in panel order.
    pub const ALL: [Self; 4] = [
        Self::BallsAndSticks,
        Self::Wireframe,
        Self::VanDerWaals,
        Self::Cartoon,
    ];

    /// Panel label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::BallsAndSticks => "Balls and Sticks",
            Self::Wireframe => "Wireframe",
            Self::VanDerWaals => "Van der Waals",
            Self::Cartoon => "Cartoon (WIP)",
        }
    }

    /// The model after this one, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::BallsAndSticks => Self::Wireframe,
            Self::Wireframe => Self::VanDerWaals,
            Self::VanDerWaals => Self::Cartoon,
            Self::Cartoon => Self::BallsAndSticks,
        }
    }

    /// Whether the model draws atom spheres (and can therefore be picked).
    #[must_use]
    pub fn has_atoms(self) -> bool {
        matches!(self, Self::BallsAndSticks | Self::VanDerWaals)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Display model selection and scene toggles.
pub struct DisplayOptions {
    /// Active molecule display model.
    #[schemars(title = "Model")]
    pub display_model: DisplayModel,
    /// Clear color (linear RGB).
    #[schemars(skip)]
    pub background: [f32; 3],
    /// Whether to draw the scene bounding box.
    #[schemars(title = "Show Bounds")]
    pub show_bounds: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            display_model: DisplayModel::BallsAndSticks,
            // #505050
            background: [0.3137, 0.3137, 0.3137],
            show_bounds: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_cycles_through_every_model() {
        let mut model = DisplayModel::default();
        for expected in DisplayModel::ALL.iter().cycle().skip(1).take(4) {
            model = model.next();
            assert_eq!(model, *expected);
        }
        assert_eq!(model, DisplayModel::BallsAndSticks);
    }
}
