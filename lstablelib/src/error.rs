//! Error types for lstablelib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while listing or exporting
#[derive(Error, Debug)]
pub enum LstableError {
    /// Failed to write the export document
    #[error("failed to write export to '{path}': {source}")]
    Export {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An export was requested from a console that does not record
    #[error("cannot export: the console was created without recording")]
    NotRecording,

    /// Failed to render output
    #[error("render error: {0}")]
    Render(#[from] standout_render::RenderError),

    /// Failed to read a directory
    #[error("failed to read directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// No color theme with this name
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
