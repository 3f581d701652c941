//! Error types for snapshot rendering and export

use thiserror::Error;

/// Result type alias for codecanvas operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering or exporting a snapshot
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to turn the render tree into pixels
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to hand the encoded image to its destination
    #[error("Export failed: {0}")]
    ExportError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
