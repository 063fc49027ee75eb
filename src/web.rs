//! Browser entry point.
//!
//! A page creates a [`WebViewer`] on a `<canvas>`, forwards DOM and WebXR
//! events to it and calls [`WebViewer::render`] from
//! `requestAnimationFrame` whenever [`WebViewer::needs_redraw`] says so.
//! Every call that can produce host work returns a JSON array of effect
//! messages (`[{"effect": "show_atom_info", ...}]`); the page draws the
//! settings panel from [`WebViewer::panel`] and sends panel interactions
//! back through [`WebViewer::ui_action`]. A `capture_screenshot` effect
//! is served by the page itself (`canvas.toBlob`).
//!
//! Instanced drawing reads instances from storage buffers, so the page
//! needs a WebGPU-capable browser.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::engine::{Effect, MolvisCommand, MolvisEngine};
use crate::gui::parse_action_str;
use crate::input::{InputEvent, MouseButton, TouchPhase};
use crate::options::Options;
use crate::xr::XrFrame;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn effects_json(effects: &[Effect]) -> String {
    serde_json::Value::Array(effects.iter().map(Effect::to_json).collect())
        .to_string()
}

/// Install the panic hook and route `log` to the browser console.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// A viewer drawing into one canvas.
#[wasm_bindgen]
pub struct WebViewer {
    engine: MolvisEngine,
}

#[wasm_bindgen]
impl WebViewer {
    /// Attach to the canvas with id `canvas_id`. `options_toml` overrides
    /// the default options.
    ///
    /// # Errors
    ///
    /// Rejects when the canvas is missing, the options do not parse or
    /// WebGPU is unavailable.
    pub async fn create(
        canvas_id: String,
        options_toml: Option<String>,
    ) -> Result<WebViewer, JsValue> {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(&canvas_id))
            .ok_or_else(|| js_error(format!("no element #{canvas_id}")))?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(|_| js_error(format!("#{canvas_id} is not a canvas")))?;

        let options = match options_toml {
            Some(toml) => Options::from_toml(&toml).map_err(js_error)?,
            None => Options::default(),
        };
        let size = (canvas.width().max(1), canvas.height().max(1));
        let engine = MolvisEngine::new(
            wgpu::SurfaceTarget::Canvas(canvas),
            size,
            options,
        )
        .await
        .map_err(js_error)?;
        log::info!("molvis attached to #{canvas_id}");
        Ok(Self { engine })
    }

    /// Whether the page should schedule a frame.
    pub fn needs_redraw(&mut self) -> bool {
        self.engine.needs_redraw()
    }

    /// Draw one frame.
    pub fn render(&mut self) {
        match self.engine.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                let (w, h) = self.engine.context.size();
                self.engine.resize(w, h);
                self.engine.request_redraw();
            }
            Err(e) => log::error!("render error: {e:?}"),
        }
    }

    /// The canvas changed size (physical pixels).
    pub fn resize(&mut self, width: u32, height: u32) {
        self.engine.resize(width.max(1), height.max(1));
    }

    // -- DOM input --

    /// `mousemove` / `pointermove`, canvas-relative physical pixels.
    pub fn mouse_move(&mut self, x: f32, y: f32) -> String {
        self.input(InputEvent::CursorMoved { x, y })
    }

    /// `mousedown` / `mouseup`. `button` is `MouseEvent.button`.
    pub fn mouse_button(&mut self, button: i16, pressed: bool) -> String {
        let button = match button {
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::Left,
        };
        self.input(InputEvent::MouseButton { button, pressed })
    }

    /// `mouseleave`.
    pub fn mouse_leave(&mut self) -> String {
        self.input(InputEvent::CursorLeft)
    }

    /// `wheel`. Pass `-deltaY` scaled to lines; positive zooms in.
    pub fn wheel(&mut self, delta: f32) -> String {
        self.input(InputEvent::Scroll { delta })
    }

    /// Shift key state from any keyboard or mouse event.
    pub fn modifiers(&mut self, shift: bool) -> String {
        self.input(InputEvent::ModifiersChanged { shift })
    }

    /// `touchstart` / `touchmove` / `touchend` for the first touch point.
    pub fn touch(&mut self, phase: &str, x: f32, y: f32) -> String {
        let phase = match phase {
            "start" => TouchPhase::Started,
            "move" => TouchPhase::Moved,
            _ => TouchPhase::Ended,
        };
        self.input(InputEvent::Touch { phase, x, y })
    }

    /// `keydown` with `KeyboardEvent.code` (e.g. `"KeyR"`).
    pub fn key(&mut self, code: &str) -> String {
        effects_json(&self.engine.handle_key(code))
    }

    // -- Panel and loading --

    /// Current panel state as JSON.
    pub fn panel(&self) -> String {
        self.engine.state().panel().to_json().to_string()
    }

    /// JSON schema of the options, for building option widgets.
    pub fn options_schema() -> String {
        serde_json::to_value(Options::json_schema())
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    /// A panel interaction, e.g. `{"action": "search_atoms", "query": "C"}`.
    pub fn ui_action(&mut self, json: &str) -> String {
        match parse_action_str(json) {
            Some(action) => self.execute(action.into_command()),
            None => "[]".to_owned(),
        }
    }

    /// Load a model from bytes the page read or downloaded. The format
    /// comes from `name`'s extension.
    pub fn load_bytes(&mut self, name: String, bytes: Vec<u8>) -> String {
        self.execute(MolvisCommand::LoadBytes { name, bytes })
    }

    // -- WebXR --

    /// The page entered an immersive session.
    pub fn xr_start(&mut self) -> String {
        self.execute(MolvisCommand::StartXr)
    }

    /// The immersive session ended.
    pub fn xr_end(&mut self) -> String {
        self.execute(MolvisCommand::EndXr)
    }

    /// `selectend` on input source `controller`.
    pub fn xr_select_end(&mut self, controller: u8) -> String {
        self.execute(MolvisCommand::XrSelectEnd { controller })
    }

    /// One XR frame of poses and gamepads, see [`XrFrame::from_json`].
    pub fn xr_frame(&mut self, json: &str) -> String {
        match serde_json::from_str::<serde_json::Value>(json) {
            Ok(value) => {
                self.execute(MolvisCommand::XrFrame(XrFrame::from_json(&value)))
            }
            Err(e) => {
                log::warn!("ignoring malformed XR frame: {e}");
                "[]".to_owned()
            }
        }
    }
}

impl WebViewer {
    fn input(&mut self, event: InputEvent) -> String {
        effects_json(&self.engine.handle_input(event))
    }

    fn execute(&mut self, command: MolvisCommand) -> String {
        effects_json(&self.engine.execute(command))
    }
}
