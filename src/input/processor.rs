//! Converts raw platform events into viewer commands.
//!
//! The `InputProcessor` owns all transient input state (pointer tracking,
//! drag detection, click timing, modifier keys) and the key-binding map.
//! It is the only thing that sits between raw window events and
//! [`ViewerState::execute`](crate::engine::ViewerState::execute).

use std::time::Duration;

use glam::Vec2;
use web_time::Instant;

use super::event::{InputEvent, MouseButton, TouchPhase};
use super::mouse::{ClickResult, InputState};
use crate::engine::command::MolvisCommand;
use crate::options::{KeybindingOptions, PickingOptions};

/// Converts raw window events into [`MolvisCommand`]s.
///
/// Hover picking runs on every cursor move that is not part of a drag;
/// dragging with the left button rotates, with shift or the right button
/// pans. A quick left click without movement shows the hovered atom.
///
/// # Usage
///
/// ```ignore
/// if let Some(cmd) = input_processor.handle_event(event) {
///     state.execute(cmd);
/// }
///
/// if let Some(cmd) = input_processor.handle_key_press("KeyR") {
///     state.execute(cmd);
/// }
/// ```
#[derive(Debug)]
pub struct InputProcessor {
    /// Pointer tracking and click timing.
    state: InputState,
    /// Button that started the current press.
    pressed_button: Option<MouseButton>,
    /// Whether the shift modifier is currently held.
    shift_pressed: bool,
    /// Key string → action mapping.
    key_bindings: KeybindingOptions,
}

impl InputProcessor {
    /// Create a processor with default key bindings and click timing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(&PickingOptions::default(), KeybindingOptions::default())
    }

    /// Create a processor from picking options and key bindings.
    #[must_use]
    pub fn with_options(picking: &PickingOptions, key_bindings: KeybindingOptions) -> Self {
        Self {
            state: InputState::new(
                Duration::from_millis(picking.click_max_ms),
                picking.drag_threshold,
            ),
            pressed_button: None,
            shift_pressed: false,
            key_bindings,
        }
    }

    /// Apply changed options without losing pointer state.
    pub fn apply_options(&mut self, picking: &PickingOptions, key_bindings: &KeybindingOptions) {
        self.state.configure(
            Duration::from_millis(picking.click_max_ms),
            picking.drag_threshold,
        );
        self.key_bindings.clone_from(key_bindings);
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn mouse_pos(&self) -> (f32, f32) {
        self.state.mouse_pos
    }

    /// Whether a mouse button or touch is held.
    #[must_use]
    pub fn mouse_pressed(&self) -> bool {
        self.state.is_pressed()
    }

    /// Whether the shift modifier is held.
    #[must_use]
    pub fn shift_pressed(&self) -> bool {
        self.shift_pressed
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeybindingOptions {
        &self.key_bindings
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<MolvisCommand> {
        self.key_bindings.lookup(key).map(|action| action.to_command())
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<MolvisCommand> {
        self.handle_event_at(event, Instant::now())
    }

    pub(crate) fn handle_event_at(
        &mut self,
        event: InputEvent,
        now: Instant,
    ) -> Option<MolvisCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed, now)
            }
            InputEvent::Scroll { delta } => Some(MolvisCommand::Zoom { delta }),
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
            InputEvent::CursorLeft => {
                self.state.cancel();
                self.pressed_button = None;
                Some(MolvisCommand::ClearPick)
            }
            InputEvent::Touch { phase, x, y } => self.handle_touch(phase, x, y, now),
        }
    }

    /// Cursor moved: drag the camera or hover-pick.
    fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Option<MolvisCommand> {
        let (dx, dy) = self.state.handle_mouse_position(x, y);

        match self.pressed_button {
            Some(button) if self.state.is_dragging => {
                let delta = Vec2::new(dx, dy);
                if button == MouseButton::Right || self.shift_pressed {
                    Some(MolvisCommand::PanCamera { delta })
                } else {
                    Some(MolvisCommand::RotateCamera { delta })
                }
            }
            Some(_) => None,
            None => Some(MolvisCommand::PickAt { x, y }),
        }
    }

    /// Mouse button press/release: track the press, report clicks.
    fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
        now: Instant,
    ) -> Option<MolvisCommand> {
        if button == MouseButton::Middle {
            return None;
        }

        if pressed {
            self.state.handle_mouse_down(now);
            self.pressed_button = Some(button);
            return None;
        }

        let started_by = self.pressed_button.take();
        let click = self.state.process_mouse_up(now);
        match (started_by, click) {
            (Some(MouseButton::Left), ClickResult::Click) if button == MouseButton::Left => {
                Some(MolvisCommand::ShowAtomInfo)
            }
            _ => None,
        }
    }

    /// Single-finger touch: start picks, drag rotates, lift clears.
    fn handle_touch(
        &mut self,
        phase: TouchPhase,
        x: f32,
        y: f32,
        now: Instant,
    ) -> Option<MolvisCommand> {
        match phase {
            TouchPhase::Started => {
                let _ = self.state.handle_mouse_position(x, y);
                self.state.handle_mouse_down(now);
                self.pressed_button = Some(MouseButton::Left);
                Some(MolvisCommand::PickAt { x, y })
            }
            TouchPhase::Moved => {
                let (dx, dy) = self.state.handle_mouse_position(x, y);
                if self.state.is_dragging {
                    Some(MolvisCommand::RotateCamera {
                        delta: Vec2::new(dx, dy),
                    })
                } else {
                    Some(MolvisCommand::PickAt { x, y })
                }
            }
            TouchPhase::Ended => {
                self.state.cancel();
                self.pressed_button = None;
                Some(MolvisCommand::ClearPick)
            }
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(p: &mut InputProcessor, button: MouseButton, pressed: bool, at: Instant) -> Option<MolvisCommand> {
        p.handle_event_at(InputEvent::MouseButton { button, pressed }, at)
    }

    fn move_to(p: &mut InputProcessor, x: f32, y: f32) -> Option<MolvisCommand> {
        p.handle_event(InputEvent::CursorMoved { x, y })
    }

    #[test]
    fn hover_moves_pick() {
        let mut p = InputProcessor::new();
        assert_eq!(move_to(&mut p, 5.0, 6.0), Some(MolvisCommand::PickAt { x: 5.0, y: 6.0 }));
    }

    #[test]
    fn quick_click_shows_info() {
        let mut p = InputProcessor::new();
        let t0 = Instant::now();
        assert_eq!(press(&mut p, MouseButton::Left, true, t0), None);
        assert_eq!(
            press(&mut p, MouseButton::Left, false, t0 + Duration::from_millis(50)),
            Some(MolvisCommand::ShowAtomInfo)
        );
    }

    #[test]
    fn long_press_does_not_show_info() {
        let mut p = InputProcessor::new();
        let t0 = Instant::now();
        let _ = press(&mut p, MouseButton::Left, true, t0);
        assert_eq!(
            press(&mut p, MouseButton::Left, false, t0 + Duration::from_millis(300)),
            None
        );
    }

    #[test]
    fn drag_rotates_and_shift_drag_pans() {
        let mut p = InputProcessor::new();
        let _ = move_to(&mut p, 0.0, 0.0);
        let _ = press(&mut p, MouseButton::Left, true, Instant::now());
        assert_eq!(
            move_to(&mut p, 10.0, 0.0),
            Some(MolvisCommand::RotateCamera { delta: Vec2::new(10.0, 0.0) })
        );
        let _ = p.handle_event(InputEvent::ModifiersChanged { shift: true });
        assert_eq!(
            move_to(&mut p, 10.0, 4.0),
            Some(MolvisCommand::PanCamera { delta: Vec2::new(0.0, 4.0) })
        );
        assert_eq!(press(&mut p, MouseButton::Left, false, Instant::now()), None);
    }

    #[test]
    fn right_drag_pans() {
        let mut p = InputProcessor::new();
        let _ = press(&mut p, MouseButton::Right, true, Instant::now());
        assert!(matches!(
            move_to(&mut p, 20.0, 0.0),
            Some(MolvisCommand::PanCamera { .. })
        ));
    }

    #[test]
    fn leaving_the_canvas_clears_the_pick() {
        let mut p = InputProcessor::new();
        assert_eq!(p.handle_event(InputEvent::CursorLeft), Some(MolvisCommand::ClearPick));
        assert!(!p.mouse_pressed());
    }

    #[test]
    fn touch_picks_then_clears() {
        let mut p = InputProcessor::new();
        let touch = |phase, x| InputEvent::Touch { phase, x, y: 0.0 };
        assert_eq!(
            p.handle_event(touch(TouchPhase::Started, 3.0)),
            Some(MolvisCommand::PickAt { x: 3.0, y: 0.0 })
        );
        assert!(matches!(
            p.handle_event(touch(TouchPhase::Moved, 30.0)),
            Some(MolvisCommand::RotateCamera { .. })
        ));
        assert_eq!(p.handle_event(touch(TouchPhase::Ended, 30.0)), Some(MolvisCommand::ClearPick));
    }

    #[test]
    fn scroll_zooms() {
        let mut p = InputProcessor::new();
        assert_eq!(
            p.handle_event(InputEvent::Scroll { delta: 1.5 }),
            Some(MolvisCommand::Zoom { delta: 1.5 })
        );
    }

    #[test]
    fn bound_keys_produce_commands() {
        let p = InputProcessor::new();
        assert_eq!(p.handle_key_press("KeyR"), Some(MolvisCommand::ResetCamera));
        assert_eq!(p.handle_key_press("KeyP"), Some(MolvisCommand::TakeScreenshot));
        assert_eq!(p.handle_key_press("KeyQ"), None);
    }
}
