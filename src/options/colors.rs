use serde::{Deserialize, Serialize};

/// Color palette for everything not colored by element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorOptions {
    /// RGB color of balls-and-sticks bonds.
    pub bond: [f32; 3],
    /// RGBA color of the cartoon tube.
    pub cartoon: [f32; 4],
    /// RGBA color of OBJ/STL surfaces.
    pub surface: [f32; 4],
    /// RGB color of the bounding-box helper.
    pub bounds: [f32; 3],
    /// Added to each channel of hovered or searched instances.
    pub highlight_boost: f32,
    /// Initial recolor color in the search panel (`0xRRGGBB`).
    pub selection_color: u32,
}

impl Default for ColorOptions {
    fn default() -> Self {
        Self {
            bond: [0.85, 0.85, 0.85],
            cartoon: [0.45, 0.75, 0.45, 1.0],
            surface: [0.7, 0.7, 0.75, 1.0],
            bounds: [1.0, 1.0, 0.0],
            highlight_boost: 0.5,
            selection_color: 0x00aa_bbcc,
        }
    }
}

/// Split `0xRRGGBB` into an opaque RGBA color.
#[must_use]
pub fn rgb_hex_to_rgba(hex: u32) -> [f32; 4] {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_splits_channels() {
        assert_eq!(rgb_hex_to_rgba(0xff_00_00), [1.0, 0.0, 0.0, 1.0]);
        let c = rgb_hex_to_rgba(0xaa_bb_cc);
        assert_eq!(c[1], f32::from(0xbb_u8) / 255.0);
    }
}
