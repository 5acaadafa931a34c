//! Error types for the platform and application layers.

use thiserror::Error;

/// Errors raised outside the RHI proper (windowing, IO, app wiring).
#[derive(Error, Debug)]
pub enum Error {
    /// Vulkan-related errors surfaced through the platform layer
    #[error("Vulkan error: {0}")]
    Vulkan(String),

    /// Window creation or management errors
    #[error("Window error: {0}")]
    Window(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
