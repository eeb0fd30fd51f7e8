/// Shader trait - contract required of externally compiled programs
///
/// Shader compilation, linking, and uniform-location caching live outside
/// this engine. The pipeline only needs a handful of operations from a
/// linked program, and depends on exact name-matching between these calls
/// and the program's declared uniforms.

use glam::{UVec2, UVec4, Vec2};

use crate::error::Result;

/// A linked, usable shader program
pub trait Shader {
    /// Activate this program for subsequent draw calls
    fn activate(&mut self) -> Result<()>;

    /// Set a named 2D unsigned-integer vector uniform
    fn set_uniform_uvec2(&mut self, name: &str, value: UVec2) -> Result<()>;

    /// Set a named 4D unsigned-integer vector uniform
    fn set_uniform_uvec4(&mut self, name: &str, value: UVec4) -> Result<()>;

    /// Set a named 2D float vector uniform
    fn set_uniform_vec2(&mut self, name: &str, value: Vec2) -> Result<()>;

    /// Associate a named uniform block in the program with a numeric
    /// binding point
    fn bind_uniform_block(&mut self, name: &str, binding: u32) -> Result<()>;

    /// Driver-reported byte size of the uniform block at a binding point
    /// (used for diagnostic validation against the host-side layout)
    fn uniform_block_size(&self, binding: u32) -> Result<u32>;
}
