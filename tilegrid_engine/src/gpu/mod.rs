//! GPU resource wrappers
//!
//! Each wrapper owns exactly one driver handle, acquired at construction
//! and released exactly once at drop. All state mutation goes through the
//! device's global binding points, so every operation rebinds what it
//! needs before acting.

// Module declarations
pub mod buffer;
pub mod texture;
pub mod render_target;
pub mod geometry;

// Re-export from other modules
pub use buffer::*;
pub use texture::*;
pub use render_target::*;
pub use geometry::*;
