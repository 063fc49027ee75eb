// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! GPU-accelerated molecular structure viewer built on wgpu.
//!
//! Molvis shows PDB molecules as ball-and-stick, van der Waals, stick,
//! wireframe or cartoon models, OBJ/STL surfaces and JSON sphere/cylinder
//! primitives. Atoms can be hovered, clicked for details, searched by
//! element and recolored, from a mouse or a VR controller.
//!
//! # Key entry points
//!
//! - [`engine::ViewerState`] - everything the viewer knows, driven by
//!   [`engine::MolvisCommand`]s, without a GPU
//! - [`engine::MolvisEngine`] - the state plus the renderer
//! - [`options::Options`] - runtime configuration (display, geometry,
//!   lighting, camera, colors, picking, examples, VR)
//! - `Viewer` - a ready-made native window (feature `viewer`)
//! - `web::WebViewer` - the browser binding (feature `web`)
//!
//! # Architecture
//!
//! Input events become commands; executing a command mutates the scene,
//! camera, picker or settings panel and returns [`engine::Effect`]s that
//! only the host can serve (file dialogs, downloads, screenshots,
//! haptics). Scene mutations bump a generation counter and the renderer
//! re-uploads instance buffers only when it changed. Frames are drawn on
//! demand.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod gui;
pub mod input;
pub mod options;
pub mod picking;
pub mod renderer;
pub mod scene;
pub mod structure;
#[cfg(feature = "viewer")]
pub mod viewer;
#[cfg(feature = "web")]
pub mod web;
pub mod xr;

pub use engine::{Effect, MolvisCommand, MolvisEngine, ViewerState};
pub use error::MolvisError;
pub use input::{InputEvent, MouseButton};
pub use options::Options;
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
