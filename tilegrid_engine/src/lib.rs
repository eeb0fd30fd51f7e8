/*!
# Tilegrid Engine

Core types for a two-pass, tile-based 2D rendering engine.

This crate provides the platform-agnostic API: GPU resource wrappers with
deterministic create/bind/destroy semantics, and the tile render pipeline
that drives an off-screen mask pass followed by a full-screen composite
pass. Backend implementations (OpenGL via `tilegrid_engine_device_gl`)
supply the concrete driver calls behind the `GraphicsDevice` trait.

## Architecture

- **GraphicsDevice**: thin driver-binding trait over the GL-shaped global
  binding model (explicit rebinding, opaque handles)
- **GpuBuffer / Texture2D / RenderTarget / GeometryBatch**: resource
  wrappers, each owning exactly one driver handle
- **TileRenderPipeline**: the two-pass mask/composite orchestrator
- **Shader / ImageDecoder**: contracts the pipeline requires of its
  external collaborators (shader programs, raster decoding)

All operations are single-threaded, synchronous calls into the graphics
driver; correctness is achieved by sequencing, never by caching "currently
bound" assumptions across calls.
*/

// Internal modules
mod error;
pub mod log;
pub mod asset;
pub mod device;
pub mod gpu;
pub mod pipeline;

// Error types
pub use crate::error::{Error, Result};

// Re-export math library at crate root
pub use glam;
