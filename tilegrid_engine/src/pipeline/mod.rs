//! Tile render pipeline module
//!
//! Hosts the two-pass mask/composite orchestrator, the mask and tile-table
//! mathematics it uploads, and the contract it requires of externally
//! compiled shader programs.

// Module declarations
pub mod mask;
pub mod shader;
pub mod tile_pipeline;

// Re-export from other modules
pub use mask::*;
pub use shader::*;
pub use tile_pipeline::*;
