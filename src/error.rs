//! Error types for thumbnail generation

use thiserror::Error;

/// Result type alias for generation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, rendering or capturing a thumbnail
///
/// Asset lookups are deliberately absent: a missing asset degrades to a
/// skipped element and a logged warning, never to an error.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem error (reading a template, writing a PNG, ...)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Template JSON is malformed or violates a geometry constraint
    #[error("Invalid template: {0}")]
    TemplateError(String),

    /// Thumbnail config file could not be parsed
    #[error("Invalid config: {0}")]
    ConfigError(String),

    /// No template matched any of the lookup strategies
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// The headless browser could not be started
    #[error("Browser launch failed: {0}")]
    LaunchError(String),

    /// Navigation, idle wait or screenshot failed
    #[error("Capture failed: {0}")]
    CaptureError(String),

    /// Editor server could not bind or respond
    #[error("Server error: {0}")]
    ServerError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::TemplateError(err.to_string())
    }
}

#[cfg(feature = "cdp")]
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::CaptureError(err.to_string())
    }
}
