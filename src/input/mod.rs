//! Input handling: event types, the click state machine, and the input
//! processor that converts raw window events into viewer commands.

/// Platform-agnostic input events.
pub mod event;
/// Bindable key actions.
pub mod keyboard;
/// Click timing and pointer tracking.
pub(crate) mod mouse;
/// Converts raw events into viewer commands.
pub mod processor;

pub use event::{InputEvent, MouseButton, TouchPhase};
pub use keyboard::KeyAction;
pub use processor::InputProcessor;
