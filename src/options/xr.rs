use serde::{Deserialize, Serialize};

/// VR locomotion and pointer tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct XrOptions {
    /// Rig position on session start and on left-stick click.
    pub home_position: [f32; 3],
    /// Stick deflection below which an axis is ignored.
    pub deadzone: f32,
    /// Stick deflection below which an axis counts as released.
    pub rest_threshold: f32,
    /// Per-axis speed after an axis returns to rest.
    pub rest_speed: f32,
    /// Per-axis speed when the session starts.
    pub initial_speed: f32,
    /// Per-frame speed multiplier while an axis is held.
    pub speed_ramp: f32,
    /// Upper bound of the per-axis speed.
    pub max_speed: f32,
    /// Button value below which a button is handled every frame.
    pub press_threshold: f32,
    /// Upper bound of a haptic pulse.
    pub max_pulse: f32,
    /// Haptic pulse length in milliseconds.
    pub pulse_ms: u32,
    /// Controller pointer length when nothing is hit.
    pub pointer_length: f32,
}

impl Default for XrOptions {
    fn default() -> Self {
        Self {
            home_position: [0.0, 1.6, 10.0],
            deadzone: 0.2,
            rest_threshold: 0.025,
            rest_speed: 0.025,
            initial_speed: 0.1,
            speed_ramp: 1.001,
            max_speed: 1.0,
            press_threshold: 0.8,
            max_pulse: 0.75,
            pulse_ms: 100,
            pointer_length: 10.0,
        }
    }
}
