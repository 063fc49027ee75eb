//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the molvis crate.
#[derive(Debug)]
pub enum MolvisError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Failed to parse a structure, surface or primitives file.
    StructureLoad(String),
    /// File extension is not one of the supported model formats.
    UnsupportedFormat(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML/JSON options parsing or serialization failure.
    OptionsParse(String),
    /// WGSL composition or validation failure.
    Shader(String),
    /// Screenshot readback or encoding failure.
    Screenshot(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for MolvisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::StructureLoad(msg) => {
                write!(f, "structure load error: {msg}")
            }
            Self::UnsupportedFormat(ext) => {
                write!(f, "unsupported model format: {ext}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Screenshot(msg) => write!(f, "screenshot error: {msg}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for MolvisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for MolvisError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for MolvisError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for MolvisError {
    fn from(e: serde_json::Error) -> Self {
        Self::StructureLoad(e.to_string())
    }
}
