/*!
# Tilegrid Engine - OpenGL Device Backend

OpenGL implementation of the tilegrid_engine `GraphicsDevice` trait.

This crate binds the engine's driver-facing operations to an OpenGL 3.3+
context through the glow bindings. The caller owns context creation (and
the windowing layer that goes with it) and hands the loaded `glow::Context`
to [`GlGraphicsDevice::new`]; everything after that point goes through the
trait.
*/

mod gl_device;
mod gl_enums;

pub use gl_device::GlGraphicsDevice;
