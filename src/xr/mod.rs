//! VR support: controller model, rig locomotion and session state.
//!
//! The host (a WebXR page or an OpenXR runtime) feeds an [`XrFrame`] of
//! poses and gamepad values each frame; nothing here talks to a device.

pub mod controller;
pub mod locomotion;
pub mod session;

pub use controller::{
    ControllerPose, GamepadSnapshot, Handedness, XrFrame, XrInputSource,
};
pub use locomotion::{CameraRig, HapticPulse, Locomotion};
pub use session::XrSession;
