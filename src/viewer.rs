//! Standalone visualization window backed by winit.
//!
//! The window only redraws when something changed. Host-side effects
//! (file dialogs, downloads, screenshots) are served here; the file dialog
//! needs the `gui` feature and URL examples need the `fetch` feature.
//!
//! ```no_run
//! # use molvis::Viewer;
//! Viewer::builder()
//!     .with_path("assets/models/pdb/caffeine.pdb")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    engine::{Effect, MolvisCommand, MolvisEngine},
    error::MolvisError,
    input::{InputEvent, MouseButton, TouchPhase},
    options::Options,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    path: Option<PathBuf>,
    options: Option<Options>,
    title: String,
    screenshot_dir: PathBuf,
}

impl ViewerBuilder {
    /// Create a builder with sensible defaults (title "molvis", no path,
    /// default options, screenshots in the working directory).
    fn new() -> Self {
        Self {
            path: None,
            options: None,
            title: "molvis".into(),
            screenshot_dir: PathBuf::from("."),
        }
    }

    /// Set the model file to open (`.pdb`, `.obj`, `.stl` or `.json`).
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Directory screenshots are written to.
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            path: self.path,
            options: self.options,
            title: self.title,
            screenshot_dir: self.screenshot_dir,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays one model at a time.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    path: Option<PathBuf>,
    options: Option<Options>,
    title: String,
    screenshot_dir: PathBuf,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::Viewer`] if the event loop fails.
    pub fn run(self) -> Result<(), MolvisError> {
        let event_loop =
            EventLoop::new().map_err(|e| MolvisError::Viewer(e.to_string()))?;
        // Render on demand.
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            path: self.path,
            options: self.options,
            title: self.title,
            screenshot_dir: self.screenshot_dir,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| MolvisError::Viewer(e.to_string()))
    }
}

// ── Host effects ─────────────────────────────────────────────────────────

#[cfg(feature = "gui")]
fn pick_model_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Load Model")
        .add_filter("Models", &["pdb", "obj", "stl", "json"])
        .pick_file()
}

#[cfg(feature = "fetch")]
fn fetch(url: &str) -> Result<Vec<u8>, MolvisError> {
    let mut response = ureq::get(url)
        .call()
        .map_err(|e| MolvisError::StructureLoad(format!("{url}: {e}")))?;
    response
        .body_mut()
        .read_to_vec()
        .map_err(|e| MolvisError::StructureLoad(format!("{url}: {e}")))
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<MolvisEngine>,
    path: Option<PathBuf>,
    options: Option<Options>,
    title: String,
    screenshot_dir: PathBuf,
}

/// Compute the wgpu surface size: the full window, never zero.
fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    /// Serve effects until none are left; serving one may produce more.
    fn apply_effects(&mut self, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            let Some(engine) = &mut self.engine else {
                return;
            };
            match effect {
                Effect::ShowAtomInfo(info) => {
                    for (label, value) in info.rows() {
                        log::info!("{label}: {value}");
                    }
                    if let Some(w) = &self.window {
                        let what = info.symbol.as_deref().unwrap_or(&info.name);
                        w.set_title(&format!("{} | {what}", self.title));
                    }
                }
                Effect::HideAtomInfo => {
                    if let Some(w) = &self.window {
                        w.set_title(&self.title);
                    }
                }
                Effect::CaptureScreenshot => {
                    let dir = &self.screenshot_dir;
                    if let Err(e) = engine.capture_screenshot(dir) {
                        log::error!("{e}");
                    }
                }
                Effect::OpenFileDialog => {
                    #[cfg(feature = "gui")]
                    if let Some(path) = pick_model_file() {
                        queue.extend(engine.execute(MolvisCommand::LoadPath(path)));
                    }
                    #[cfg(not(feature = "gui"))]
                    log::warn!("file dialog needs the `gui` feature");
                }
                Effect::FetchModel { name, url } => {
                    #[cfg(feature = "fetch")]
                    match fetch(&url) {
                        Ok(bytes) => queue.extend(
                            engine.execute(MolvisCommand::LoadBytes { name, bytes }),
                        ),
                        Err(e) => log::error!("{e}"),
                    }
                    #[cfg(not(feature = "fetch"))]
                    log::error!(
                        "cannot fetch {name} from {url} without the `fetch` \
                         feature"
                    );
                }
                Effect::Haptic(_) | Effect::XrPointer { .. } => {}
                Effect::Error(message) => log::error!("{message}"),
            }
        }
    }

    /// Feed one input event to the engine.
    fn input(&mut self, event: InputEvent) {
        let effects = match &mut self.engine {
            Some(engine) => engine.handle_input(event),
            None => return,
        };
        self.apply_effects(effects);
    }

    fn redraw_if_needed(&mut self) {
        if let (Some(engine), Some(window)) = (&mut self.engine, &self.window) {
            if engine.needs_redraw() {
                window.request_redraw();
            }
        }
    }

    fn render(&mut self) {
        let (Some(engine), Some(window)) = (&mut self.engine, &self.window)
        else {
            return;
        };
        match engine.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                let (w, h) = viewport_size(window.inner_size());
                engine.resize(w, h);
                window.request_redraw();
            }
            Err(e) => log::error!("render error: {e:?}"),
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            let logical_w = (f64::from(mon_size.width) / scale * 0.75) as u32;
            let logical_h = (f64::from(mon_size.height) / scale * 0.75) as u32;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = viewport_size(window.inner_size());
        let options = self.options.take().unwrap_or_default();
        let engine = match pollster::block_on(MolvisEngine::new(
            window.clone(),
            size,
            options,
        )) {
            Ok(e) => e,
            Err(e) => {
                log::error!("Failed to initialize engine: {e}");
                event_loop.exit();
                return;
            }
        };

        self.window = Some(window);
        self.engine = Some(engine);

        if let Some(path) = self.path.take() {
            let effects = self
                .engine
                .as_mut()
                .map(|e| e.execute(MolvisCommand::LoadPath(path)))
                .unwrap_or_default();
            self.apply_effects(effects);
        }
        self.redraw_if_needed();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        // Guard: both window and engine must be initialised.
        if self.window.is_none() || self.engine.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                let (w, h) = viewport_size(size);
                if let Some(engine) = &mut self.engine {
                    engine.resize(w, h);
                }
            }

            WindowEvent::RedrawRequested => self.render(),

            WindowEvent::MouseInput { button, state, .. } => {
                self.input(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.input(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::CursorLeft { .. } => self.input(InputEvent::CursorLeft),

            WindowEvent::Touch(touch) => {
                self.input(InputEvent::Touch {
                    phase: TouchPhase::from(touch.phase),
                    x: touch.location.x as f32,
                    y: touch.location.y as f32,
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.input(InputEvent::Scroll { delta });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.input(InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                });
            }

            WindowEvent::DroppedFile(path) => {
                let effects = self
                    .engine
                    .as_mut()
                    .map(|e| e.execute(MolvisCommand::LoadPath(path)))
                    .unwrap_or_default();
                self.apply_effects(effects);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let Some(engine) = &mut self.engine else {
                    return;
                };
                let effects = match code {
                    KeyCode::KeyO => engine.execute(MolvisCommand::OpenFileDialog),
                    KeyCode::KeyB => {
                        engine.state_mut().toggle_bounds();
                        Vec::new()
                    }
                    _ => engine.handle_key(&format!("{code:?}")),
                };
                self.apply_effects(effects);
            }

            _ => (),
        }

        self.redraw_if_needed();
    }
}
