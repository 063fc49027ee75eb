//! The viewer engine.
//!
//! [`ViewerState`] holds everything the viewer knows and executes
//! [`MolvisCommand`]s without a GPU. [`MolvisEngine`] adds the render
//! context and the [`Renderer`] on top and draws on demand.

pub mod command;
mod options;
mod state;

use std::path::{Path, PathBuf};

pub use self::command::MolvisCommand;
pub use self::state::{Effect, ViewerState};
use crate::error::MolvisError;
use crate::gpu::render_context::RenderContext;
use crate::options::Options;
use crate::renderer::screenshot::CaptureTarget;
use crate::renderer::Renderer;
pub use crate::scene::AtomInfo;

/// Seconds since the Unix epoch, 0 if the clock is before it.
fn unix_seconds() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Viewer state plus the GPU resources to draw it.
pub struct MolvisEngine {
    /// Device, queue and surface.
    pub context: RenderContext,
    renderer: Renderer,
    state: ViewerState,
}

impl MolvisEngine {
    /// Engine drawing into a window.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError`] if GPU initialization or shader
    /// composition fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: Options,
    ) -> Result<Self, MolvisError> {
        let context = RenderContext::new(window, size).await?;
        Self::new_from_context(context, options)
    }

    /// Engine from a pre-built [`RenderContext`] (headless rendering,
    /// embedding).
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::Shader`] if shader composition fails.
    pub fn new_from_context(
        context: RenderContext,
        options: Options,
    ) -> Result<Self, MolvisError> {
        let (width, height) = context.size();
        let state = ViewerState::new(options, width, height);
        let renderer = Renderer::new(&context, &state)?;
        Ok(Self {
            context,
            renderer,
            state,
        })
    }

    /// The CPU-side state.
    #[must_use]
    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Mutable CPU-side state (presets, option changes).
    pub fn state_mut(&mut self) -> &mut ViewerState {
        &mut self.state
    }

    /// Execute one command. The returned effects are for the host.
    pub fn execute(&mut self, command: MolvisCommand) -> Vec<Effect> {
        if let MolvisCommand::Resize { width, height } = command {
            self.context.resize(width, height);
        }
        self.state.execute(command)
    }

    /// Route a raw input event through the input processor.
    pub fn handle_input(&mut self, event: crate::input::InputEvent) -> Vec<Effect> {
        self.state.handle_input(event)
    }

    /// Route a key press (winit `KeyCode` debug name) through the key
    /// bindings.
    pub fn handle_key(&mut self, key: &str) -> Vec<Effect> {
        self.state.handle_key(key)
    }

    /// Resize the surface and the camera projection.
    pub fn resize(&mut self, width: u32, height: u32) {
        let _ = self.execute(MolvisCommand::Resize { width, height });
    }

    /// Whether a frame was requested since the last [`Self::render`].
    #[must_use]
    pub fn needs_redraw(&mut self) -> bool {
        self.state.take_redraw()
    }

    /// Ask for a frame regardless of state changes.
    pub fn request_redraw(&mut self) {
        self.state.request_redraw();
    }

    fn prepare(&mut self) {
        if self.renderer.needs_rebuild(&self.state) {
            match Renderer::new(&self.context, &self.state) {
                Ok(renderer) => {
                    self.renderer = renderer;
                    // Fresh buffers are empty.
                    self.state.scene_mut().mark_dirty();
                }
                Err(e) => log::error!("keeping old renderer: {e}"),
            }
        }
        self.renderer.prepare(&self.context, &mut self.state);
    }

    /// Draw one frame to the window surface.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] when no frame could be acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.prepare();

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.render_to_view(&view);
        frame.present();
        Ok(())
    }

    /// Draw one frame into a caller-owned texture view.
    pub fn render_to_texture(&mut self, view: &wgpu::TextureView) {
        self.prepare();
        self.render_to_view(view);
    }

    fn render_to_view(&mut self, view: &wgpu::TextureView) {
        let mut encoder = self.context.create_encoder();
        let background = self.state.options().display.background;
        self.renderer
            .encode(&self.context, &mut encoder, view, background);
        self.context.submit(encoder);
    }

    /// Render the current view offscreen and save it as
    /// `screenshot-{w}x{h}-{unix_seconds}.png` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`MolvisError::Screenshot`] if readback or encoding fails.
    pub fn capture_screenshot(
        &mut self,
        dir: &Path,
    ) -> Result<PathBuf, MolvisError> {
        let target = CaptureTarget::new(&self.context);
        self.render_to_texture(&target.view);
        target.save(&self.context, dir, unix_seconds())
    }
}
