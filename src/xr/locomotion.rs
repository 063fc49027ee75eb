//! Thumbstick and paddle locomotion of the VR camera rig.

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use super::controller::{GamepadSnapshot, XrInputSource};
use crate::options::XrOptions;

const PADDLE: usize = 1;
const STICK_CLICK: usize = 3;
const STICK_X: usize = 2;
const STICK_Y: usize = 3;

/// The group the headset camera and controllers are parented to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    /// World position.
    pub position: Vec3,
    /// World rotation.
    pub rotation: Quat,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl CameraRig {
    /// Rig at `position` with no rotation.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Rotate around the rig's own Y axis.
    pub fn rotate_local_y(&mut self, radians: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_y(radians)).normalize();
    }

    /// Rotate around the rig's own X axis.
    pub fn rotate_local_x(&mut self, radians: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_x(radians)).normalize();
    }
}

/// A vibration request for one controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HapticPulse {
    /// Input-source index.
    pub controller: u8,
    /// Strength in `[0, 1]`.
    pub strength: f32,
    /// Duration in milliseconds.
    pub duration_ms: u32,
}

/// Per-frame gamepad processing.
///
/// Speed factors are shared by all controllers and indexed like the
/// gamepad's buttons and axes.
#[derive(Debug, Default)]
pub struct Locomotion {
    previous: FxHashMap<u8, GamepadSnapshot>,
    speed: Vec<f32>,
}

impl Locomotion {
    /// Fresh state: no controller seen yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every controller.
    pub fn reset(&mut self) {
        self.previous.clear();
        self.speed.clear();
    }

    /// Current speed factor of button/axis `index`.
    #[must_use]
    pub fn speed(&self, index: usize) -> Option<f32> {
        self.speed.get(index).copied()
    }

    fn ensure_speed(&mut self, len: usize, initial: f32) {
        if self.speed.len() < len {
            self.speed.resize(len, initial);
        }
    }

    /// Move `rig` from this frame's gamepads.
    ///
    /// A source is only acted on once a snapshot from an earlier frame
    /// exists for it. `view_dir` is the headset's world direction.
    pub fn update(
        &mut self,
        rig: &mut CameraRig,
        view_dir: Vec3,
        sources: &[XrInputSource],
        options: &XrOptions,
    ) -> Vec<HapticPulse> {
        let mut pulses = Vec::new();
        for source in sources {
            let Some(pad) = &source.gamepad else {
                continue;
            };
            let mut pad = pad.clone();
            if pad.handedness == super::Handedness::Unknown {
                pad.handedness = source.handedness;
            }
            if let Some(old) = self.previous.get(&source.index).cloned() {
                self.ensure_speed(
                    pad.buttons.len().max(pad.axes.len()),
                    options.initial_speed,
                );
                self.apply_buttons(rig, &pad, &old, options);
                self.apply_axes(rig, view_dir, source.index, &pad, options, &mut pulses);
            }
            let _ = self.previous.insert(source.index, pad);
        }
        pulses
    }

    fn apply_buttons(
        &self,
        rig: &mut CameraRig,
        pad: &GamepadSnapshot,
        old: &GamepadSnapshot,
        options: &XrOptions,
    ) {
        let left = pad.handedness.is_left();
        for (i, &value) in pad.buttons.iter().enumerate() {
            let changed = old.buttons.get(i) != Some(&value);
            if !changed && value.abs() >= options.press_threshold {
                continue;
            }
            let step = self.speed[i] * value;
            match i {
                PADDLE if left => rig.position.y -= step,
                PADDLE => rig.position.y += step,
                STICK_CLICK if left && value == 1.0 => {
                    *rig = CameraRig::at(Vec3::from(options.home_position));
                }
                _ => {}
            }
        }
    }

    fn apply_axes(
        &mut self,
        rig: &mut CameraRig,
        view_dir: Vec3,
        controller: u8,
        pad: &GamepadSnapshot,
        options: &XrOptions,
        pulses: &mut Vec<HapticPulse>,
    ) {
        let left = pad.handedness.is_left();
        let ax = pad.axes.get(STICK_X).copied().unwrap_or(0.0);
        let ay = pad.axes.get(STICK_Y).copied().unwrap_or(0.0);
        let mut pulse = |strength: f32| {
            pulses.push(HapticPulse {
                controller,
                strength: strength.min(options.max_pulse),
                duration_ms: options.pulse_ms,
            });
        };

        for (i, &value) in pad.axes.iter().enumerate() {
            if value.abs() <= options.deadzone {
                if value.abs() > options.rest_threshold {
                    self.speed[i] = options.rest_speed;
                }
                continue;
            }
            self.speed[i] = (self.speed[i] * options.speed_ramp).min(options.max_speed);
            let s = self.speed[i];

            match (i, left) {
                (STICK_X, true) => {
                    rig.position.x -= view_dir.z * s * ax;
                    rig.position.z += view_dir.x * s * ax;
                    pulse(ax.abs() + ay.abs());
                }
                (STICK_X, false) => rig.rotate_local_y(-ax.to_radians()),
                (STICK_Y, true) => {
                    rig.position.x -= view_dir.x * s * ay;
                    rig.position.z -= view_dir.z * s * ay;
                    pulse(ay.abs());
                }
                (STICK_Y, false) => {
                    rig.rotate_local_x(ay.to_radians());
                    pulse(ax.abs() + ay.abs());
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xr::Handedness;

    fn source(index: u8, handedness: Handedness, buttons: &[f32], axes: &[f32]) -> XrInputSource {
        XrInputSource {
            index,
            handedness,
            pose: None,
            gamepad: Some(GamepadSnapshot {
                handedness,
                buttons: buttons.to_vec(),
                axes: axes.to_vec(),
            }),
        }
    }

    fn step(
        loco: &mut Locomotion,
        rig: &mut CameraRig,
        src: &XrInputSource,
    ) -> Vec<HapticPulse> {
        loco.update(rig, Vec3::NEG_Z, std::slice::from_ref(src), &XrOptions::default())
    }

    #[test]
    fn first_snapshot_only_registers() {
        let mut loco = Locomotion::new();
        let mut rig = CameraRig::at(Vec3::new(0.0, 1.6, 10.0));
        let src = source(0, Handedness::Left, &[0.0; 4], &[0.0, 0.0, 0.0, -1.0]);
        assert!(step(&mut loco, &mut rig, &src).is_empty());
        assert_eq!(rig.position, Vec3::new(0.0, 1.6, 10.0));
    }

    #[test]
    fn left_stick_forward_moves_along_view() {
        let mut loco = Locomotion::new();
        let mut rig = CameraRig::default();
        let src = source(0, Handedness::Left, &[0.0; 4], &[0.0, 0.0, 0.0, -1.0]);
        let _ = step(&mut loco, &mut rig, &src);
        let pulses = step(&mut loco, &mut rig, &src);
        // Pushing forward (negative Y) moves along the view direction.
        assert!(rig.position.z < 0.0);
        assert!(rig.position.x.abs() < 1e-6);
        assert_eq!(pulses.len(), 1);
        assert_eq!(pulses[0].strength, 0.75);
        assert_eq!(pulses[0].duration_ms, 100);
    }

    #[test]
    fn speed_ramps_up_to_the_limit() {
        let mut loco = Locomotion::new();
        let mut rig = CameraRig::default();
        let src = source(0, Handedness::Left, &[0.0; 4], &[0.0, 0.0, 0.9, 0.0]);
        let _ = step(&mut loco, &mut rig, &src);
        let _ = step(&mut loco, &mut rig, &src);
        let first = loco.speed(STICK_X).unwrap();
        assert!((first - 0.1 * 1.001).abs() < 1e-6);
        for _ in 0..10_000 {
            let _ = step(&mut loco, &mut rig, &src);
        }
        assert_eq!(loco.speed(STICK_X), Some(1.0));
    }

    #[test]
    fn resting_stick_resets_speed() {
        let mut loco = Locomotion::new();
        let mut rig = CameraRig::default();
        let moving = source(0, Handedness::Left, &[0.0; 4], &[0.0, 0.0, 0.9, 0.0]);
        let resting = source(0, Handedness::Left, &[0.0; 4], &[0.0, 0.0, 0.1, 0.0]);
        let _ = step(&mut loco, &mut rig, &moving);
        let _ = step(&mut loco, &mut rig, &moving);
        let _ = step(&mut loco, &mut rig, &resting);
        assert_eq!(loco.speed(STICK_X), Some(0.025));
    }

    #[test]
    fn paddles_move_vertically() {
        let mut loco = Locomotion::new();
        let mut rig = CameraRig::default();
        let idle = source(0, Handedness::Left, &[0.0; 4], &[]);
        let pressed = source(0, Handedness::Left, &[0.0, 1.0, 0.0, 0.0], &[]);
        let _ = step(&mut loco, &mut rig, &idle);
        let _ = step(&mut loco, &mut rig, &pressed);
        assert!((rig.position.y + 0.1).abs() < 1e-6);
        // Held fully pressed: unchanged and above the press threshold.
        let _ = step(&mut loco, &mut rig, &pressed);
        assert!((rig.position.y + 0.1).abs() < 1e-6);

        let mut rig = CameraRig::default();
        let half = source(1, Handedness::Right, &[0.0, 0.5, 0.0, 0.0], &[]);
        let _ = step(&mut loco, &mut rig, &half);
        let _ = step(&mut loco, &mut rig, &half);
        assert!((rig.position.y - 0.05).abs() < 1e-6);
    }

    #[test]
    fn left_stick_click_returns_home() {
        let mut loco = Locomotion::new();
        let mut rig = CameraRig::default();
        rig.rotate_local_y(1.0);
        let idle = source(0, Handedness::Left, &[0.0; 4], &[]);
        let click = source(0, Handedness::Left, &[0.0, 0.0, 0.0, 1.0], &[]);
        let _ = step(&mut loco, &mut rig, &idle);
        let _ = step(&mut loco, &mut rig, &click);
        assert_eq!(rig, CameraRig::at(Vec3::new(0.0, 1.6, 10.0)));
    }

    #[test]
    fn right_stick_turns_the_rig() {
        let mut loco = Locomotion::new();
        let mut rig = CameraRig::default();
        let src = source(1, Handedness::Right, &[], &[0.0, 0.0, 1.0, 0.0]);
        let _ = step(&mut loco, &mut rig, &src);
        let pulses = step(&mut loco, &mut rig, &src);
        assert!(pulses.is_empty());
        let expected = Quat::from_rotation_y(-1.0_f32.to_radians());
        assert!(rig.rotation.angle_between(expected) < 1e-5);
        assert_eq!(rig.position, Vec3::ZERO);
    }
}
