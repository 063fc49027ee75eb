//! Camera system for 3D scene viewing.
//!
//! Provides a perspective camera with its GPU uniform, a trackball-style
//! orbit controller that frames loaded models, and screen-to-ray mapping
//! for picking.

/// Orbit controller: rotation, pan, zoom and model framing.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;

pub use self::controller::CameraController;
pub use self::core::{screen_to_ndc, Camera, CameraUniform};
