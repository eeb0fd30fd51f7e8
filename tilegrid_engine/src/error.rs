//! Error types for the tilegrid engine
//!
//! This module defines the error types used throughout the engine,
//! covering driver-level failures, resource construction, and asset
//! loading.

use std::fmt;

/// Result type for tilegrid engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Tilegrid engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backend-specific error (OpenGL, mock device, etc.)
    BackendError(String),

    /// Initialization failed (device, pipeline, subsystems)
    InitializationFailed(String),

    /// Invalid resource or invalid use of a resource (unbound handle,
    /// missing attachment, stale id, etc.)
    InvalidResource(String),

    /// A buffer write exceeded the storage allocated at init time
    WriteOutOfBounds {
        /// Bytes the caller attempted to write
        requested: u64,
        /// Bytes allocated for the buffer
        capacity: u64,
    },

    /// A render target failed its completeness check after construction
    IncompleteRenderTarget {
        /// Declared target width in pixels
        width: u32,
        /// Declared target height in pixels
        height: u32,
    },

    /// A raster asset could not be decoded or read
    AssetLoadFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::WriteOutOfBounds { requested, capacity } => write!(
                f,
                "Buffer write out of bounds: {} bytes requested, {} bytes allocated",
                requested, capacity
            ),
            Error::IncompleteRenderTarget { width, height } => write!(
                f,
                "Render target {}x{} is incomplete",
                width, height
            ),
            Error::AssetLoadFailed(msg) => write!(f, "Asset load failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
