//! Mouse button state: drag detection and click timing.

use std::time::Duration;

use web_time::Instant;

/// Result of processing a mouse-up event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickResult {
    /// Drag, slow press, or release without a matching press.
    NoAction,
    /// Quick press and release without movement.
    Click,
}

/// Tracks pointer position, drag state and press timing.
#[derive(Debug)]
pub struct InputState {
    pub mouse_pos: (f32, f32),
    pub is_dragging: bool,
    pressed_at: Option<Instant>,
    press_pos: (f32, f32),
    click_max: Duration,
    drag_threshold: f32,
}

impl InputState {
    /// Create a new input state with no active press.
    pub fn new(click_max: Duration, drag_threshold: f32) -> Self {
        Self {
            mouse_pos: (0.0, 0.0),
            is_dragging: false,
            pressed_at: None,
            press_pos: (0.0, 0.0),
            click_max,
            drag_threshold,
        }
    }

    /// Change the click timing and drag distance.
    pub fn configure(&mut self, click_max: Duration, drag_threshold: f32) {
        self.click_max = click_max;
        self.drag_threshold = drag_threshold;
    }

    /// Whether a press is in progress.
    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }

    /// Record a press at `now`.
    pub fn handle_mouse_down(&mut self, now: Instant) {
        self.pressed_at = Some(now);
        self.press_pos = self.mouse_pos;
        self.is_dragging = false;
    }

    /// Update the cursor position and return the movement delta.
    ///
    /// While pressed, moving farther than the drag threshold from the
    /// press position turns the press into a drag.
    pub fn handle_mouse_position(&mut self, x: f32, y: f32) -> (f32, f32) {
        let delta = (x - self.mouse_pos.0, y - self.mouse_pos.1);
        self.mouse_pos = (x, y);
        if self.pressed_at.is_some() && !self.is_dragging {
            let (dx, dy) = (x - self.press_pos.0, y - self.press_pos.1);
            if dx * dx + dy * dy > self.drag_threshold * self.drag_threshold {
                self.is_dragging = true;
            }
        }
        delta
    }

    /// Finish a press at `now` and report whether it was a click.
    pub fn process_mouse_up(&mut self, now: Instant) -> ClickResult {
        let pressed_at = self.pressed_at.take();
        let was_dragging = std::mem::take(&mut self.is_dragging);
        match pressed_at {
            Some(at)
                if !was_dragging && now.saturating_duration_since(at) < self.click_max =>
            {
                ClickResult::Click
            }
            _ => ClickResult::NoAction,
        }
    }

    /// Forget any press in progress.
    pub fn cancel(&mut self) {
        self.pressed_at = None;
        self.is_dragging = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> InputState {
        InputState::new(Duration::from_millis(125), 1.0)
    }

    #[test]
    fn quick_press_is_a_click() {
        let mut s = state();
        let t0 = Instant::now();
        s.handle_mouse_down(t0);
        assert_eq!(
            s.process_mouse_up(t0 + Duration::from_millis(80)),
            ClickResult::Click
        );
    }

    #[test]
    fn slow_press_is_not_a_click() {
        let mut s = state();
        let t0 = Instant::now();
        s.handle_mouse_down(t0);
        assert_eq!(
            s.process_mouse_up(t0 + Duration::from_millis(125)),
            ClickResult::NoAction
        );
    }

    #[test]
    fn drag_is_not_a_click() {
        let mut s = state();
        let _ = s.handle_mouse_position(10.0, 10.0);
        let t0 = Instant::now();
        s.handle_mouse_down(t0);
        let _ = s.handle_mouse_position(10.5, 10.0);
        assert!(!s.is_dragging);
        let _ = s.handle_mouse_position(14.0, 10.0);
        assert!(s.is_dragging);
        assert_eq!(s.process_mouse_up(t0), ClickResult::NoAction);
        assert!(!s.is_dragging);
    }

    #[test]
    fn release_without_press_does_nothing() {
        let mut s = state();
        assert_eq!(s.process_mouse_up(Instant::now()), ClickResult::NoAction);
    }
}
