//! Driver-binding module - the thin layer between resource wrappers and
//! the graphics driver
//!
//! The driver exposes one global binding state per target (buffer targets,
//! the active texture unit, the draw framebuffer, the vertex array). Every
//! operation here acts on whatever is currently bound, so callers must
//! rebind before use and never assume a previous binder's state persists.

// Module declarations
pub mod graphics_device;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_device;
