//! Platform-neutral VR controller state, as reported by the host each
//! frame.

use glam::{Quat, Vec3, Vec4};

use crate::picking::Ray;

/// Which hand holds a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handedness {
    /// Left hand.
    Left,
    /// Right hand.
    Right,
    /// Not reported. Handled like the right hand.
    #[default]
    Unknown,
}

impl Handedness {
    /// Parse a WebXR `handedness` string.
    #[must_use]
    pub fn from_web(s: &str) -> Self {
        match s {
            "left" => Self::Left,
            "right" => Self::Right,
            _ => Self::Unknown,
        }
    }

    /// Whether this is the left hand.
    #[must_use]
    pub fn is_left(self) -> bool {
        self == Self::Left
    }
}

/// World-space pose of a controller's target ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerPose {
    /// Ray origin.
    pub position: Vec3,
    /// Orientation; the pointer runs along local -Z.
    pub orientation: Quat,
}

impl ControllerPose {
    /// The pointer ray.
    #[must_use]
    pub fn pointer_ray(&self) -> Ray {
        Ray::new(self.position, self.orientation * Vec3::NEG_Z)
    }
}

/// Button and axis values of one gamepad at one frame.
///
/// Indices follow the `xr-standard` mapping: button 1 is the grip
/// paddle, button 3 the thumbstick click, axes 2 and 3 the thumbstick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamepadSnapshot {
    /// Hand holding the gamepad.
    pub handedness: Handedness,
    /// Button values in `[0, 1]`.
    pub buttons: Vec<f32>,
    /// Axis values in `[-1, 1]`.
    pub axes: Vec<f32>,
}

/// One input source of a VR session.
#[derive(Debug, Clone, PartialEq)]
pub struct XrInputSource {
    /// Stable index of the source within the session.
    pub index: u8,
    /// Hand holding it.
    pub handedness: Handedness,
    /// Pointer pose, if tracked this frame.
    pub pose: Option<ControllerPose>,
    /// Gamepad values, if the source has a gamepad.
    pub gamepad: Option<GamepadSnapshot>,
}

/// Everything the host reports for one VR frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XrFrame {
    /// World-space direction the headset looks at.
    pub view_dir: Vec3,
    /// Active input sources.
    pub sources: Vec<XrInputSource>,
}

fn vec3(value: &serde_json::Value) -> Option<Vec3> {
    match floats(value)?.as_slice() {
        &[x, y, z] => Some(Vec3::new(x, y, z)),
        _ => None,
    }
}

fn floats(value: &serde_json::Value) -> Option<Vec<f32>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_f64().map(|f| f as f32))
        .collect()
}

impl ControllerPose {
    /// Parse `{"position": [x, y, z], "orientation": [x, y, z, w]}`.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let position = vec3(value.get("position")?)?;
        match floats(value.get("orientation")?)?.as_slice() {
            // A degenerate orientation reads as "no rotation".
            &[x, y, z, w] => Some(Self {
                position,
                orientation: Vec4::new(x, y, z, w)
                    .try_normalize()
                    .map_or(Quat::IDENTITY, Quat::from_vec4),
            }),
            _ => None,
        }
    }
}

impl XrFrame {
    /// Parse a frame reported by a WebXR page:
    ///
    /// ```json
    /// {"view_dir": [0, 0, -1],
    ///  "sources": [{"index": 0, "handedness": "left",
    ///               "pose": {"position": [..], "orientation": [..]},
    ///               "gamepad": {"buttons": [..], "axes": [..]}}]}
    /// ```
    ///
    /// Malformed sources are skipped; a missing `view_dir` is `-Z`.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        let view_dir = value
            .get("view_dir")
            .and_then(vec3)
            .unwrap_or(Vec3::NEG_Z);
        let sources = value
            .get("sources")
            .and_then(serde_json::Value::as_array)
            .map(|sources| sources.iter().filter_map(source_from_json).collect())
            .unwrap_or_default();
        Self { view_dir, sources }
    }
}

fn source_from_json(value: &serde_json::Value) -> Option<XrInputSource> {
    let index = u8::try_from(value.get("index")?.as_u64()?).ok()?;
    let handedness = value
        .get("handedness")
        .and_then(serde_json::Value::as_str)
        .map_or(Handedness::Unknown, Handedness::from_web);
    let pose = value.get("pose").and_then(ControllerPose::from_json);
    let gamepad = value.get("gamepad").map(|pad| GamepadSnapshot {
        handedness,
        buttons: pad.get("buttons").and_then(floats).unwrap_or_default(),
        axes: pad.get("axes").and_then(floats).unwrap_or_default(),
    });
    Some(XrInputSource {
        index,
        handedness,
        pose,
        gamepad,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_runs_along_negative_z() {
        let pose = ControllerPose {
            position: Vec3::new(0.0, 1.0, 0.0),
            orientation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        };
        let ray = pose.pointer_ray();
        assert_eq!(ray.origin, Vec3::new(0.0, 1.0, 0.0));
        assert!((ray.dir - Vec3::NEG_X).length() < 1e-6);
    }

    #[test]
    fn handedness_from_web_strings() {
        assert_eq!(Handedness::from_web("left"), Handedness::Left);
        assert_eq!(Handedness::from_web("right"), Handedness::Right);
        assert_eq!(Handedness::from_web("none"), Handedness::Unknown);
        assert!(!Handedness::Unknown.is_left());
    }

    #[test]
    fn frame_parses_from_web_json() {
        let frame = XrFrame::from_json(&serde_json::json!({
            "view_dir": [1, 0, 0],
            "sources": [
                {
                    "index": 1,
                    "handedness": "left",
                    "pose": {
                        "position": [0, 1.5, 0],
                        "orientation": [0, 0, 0, 1]
                    },
                    "gamepad": {"buttons": [0, 1], "axes": [0, 0, 0.5, -1]}
                },
                {"handedness": "right"},
                {"index": 2, "pose": {"position": [0, 0]}}
            ]
        }));
        assert_eq!(frame.view_dir, Vec3::X);
        assert_eq!(frame.sources.len(), 2);

        let left = &frame.sources[0];
        assert!(left.handedness.is_left());
        assert_eq!(left.pose.unwrap().position, Vec3::new(0.0, 1.5, 0.0));
        let pad = left.gamepad.as_ref().unwrap();
        assert_eq!(pad.axes, vec![0.0, 0.0, 0.5, -1.0]);
        assert!(pad.handedness.is_left());

        let other = &frame.sources[1];
        assert_eq!(other.handedness, Handedness::Unknown);
        assert!(other.pose.is_none());
        assert!(other.gamepad.is_none());
    }

    #[test]
    fn empty_json_is_an_idle_frame() {
        let frame = XrFrame::from_json(&serde_json::json!({}));
        assert_eq!(frame.view_dir, Vec3::NEG_Z);
        assert!(frame.sources.is_empty());
    }

    #[test]
    fn zero_orientation_points_forward() {
        let pose = ControllerPose::from_json(&serde_json::json!({
            "position": [0, 1, 0],
            "orientation": [0, 0, 0, 0]
        }))
        .unwrap();
        assert_eq!(pose.orientation, Quat::IDENTITY);
        let ray = pose.pointer_ray();
        assert!(ray.dir.is_finite());
        assert!((ray.dir - Vec3::NEG_Z).length() < 1e-6);
    }
}
