/// GraphicsDevice trait - thin binding layer over the graphics driver

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;

// ============================================================================
// Opaque driver handles
// ============================================================================

slotmap::new_key_type! {
    /// Opaque handle to a driver buffer object
    pub struct BufferId;

    /// Opaque handle to a driver image object
    pub struct TextureId;

    /// Opaque handle to a driver framebuffer object
    pub struct FramebufferId;

    /// Opaque handle to a driver vertex-array object
    pub struct VertexArrayId;
}

// ============================================================================
// Common types
// ============================================================================

/// Buffer binding target kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data
    Vertex,
    /// Triangle-list index data
    Index,
    /// Uniform-block data
    Uniform,
}

/// Buffer usage hint handed to the driver at storage allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Written once, drawn many times
    Static,
    /// Rewritten frequently (potentially every frame)
    Stream,
}

/// Pixel format for texture storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// 8-bit RGB, 3 bytes per pixel
    Rgb8,
    /// 8-bit RGBA, 4 bytes per pixel
    Rgba8,
}

impl TextureFormat {
    /// Bytes per pixel for this format
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::Rgb8 => 3,
            TextureFormat::Rgba8 => 4,
        }
    }
}

/// Texture coordinate wrap mode (per axis)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    /// Clamp coordinates to the edge texel
    ClampToEdge,
    /// Repeat the texture
    Repeat,
}

/// Texture sampling filter (min/mag)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Nearest-neighbor sampling
    Nearest,
    /// Linear interpolation
    Linear,
}

/// Sampler parameters applied to the currently bound texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Wrap mode along U
    pub wrap_u: WrapMode,
    /// Wrap mode along V
    pub wrap_v: WrapMode,
    /// Minification filter
    pub min_filter: FilterMode,
    /// Magnification filter
    pub mag_filter: FilterMode,
}

impl SamplerConfig {
    /// Clamped, nearest-neighbor sampling (the pipeline's default for
    /// pixel-art tilesets and render-target attachments)
    pub fn clamped_nearest() -> Self {
        Self {
            wrap_u: WrapMode::ClampToEdge,
            wrap_v: WrapMode::ClampToEdge,
            min_filter: FilterMode::Nearest,
            mag_filter: FilterMode::Nearest,
        }
    }
}

/// Element type of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    /// 32-bit float components
    Float,
    /// 32-bit unsigned integer components
    UnsignedInt,
}

/// One entry of a vertex-attribute layout
///
/// Describes how the driver reads a single attribute slot out of the
/// currently bound vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Attribute slot (shader location)
    pub location: u32,
    /// Component count (1..=4)
    pub components: u32,
    /// Element type of each component
    pub attribute_type: AttributeType,
    /// Normalize integer data to [0,1] / [-1,1]
    pub normalized: bool,
    /// Byte stride between consecutive vertices
    pub stride: u32,
    /// Byte offset of this attribute within a vertex
    pub offset: u32,
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Shared handle to the graphics device
///
/// The whole engine is single-threaded and synchronous (one render thread,
/// blocking driver calls), so resources share the device via `Rc<RefCell>`
/// rather than a locking wrapper.
pub type DeviceHandle = Rc<RefCell<dyn GraphicsDevice>>;

/// Thin driver-binding trait
///
/// Implemented by backend-specific devices (e.g., `GlGraphicsDevice`) and
/// by the in-crate mock for tests. Operations that take no handle act on
/// the object currently bound to the relevant binding point; binding a
/// resource and issuing a dependent operation must happen in the same
/// unbroken sequence.
pub trait GraphicsDevice {
    // ----- buffers -----

    /// Allocate a buffer handle (no storage yet)
    fn create_buffer(&mut self) -> Result<BufferId>;

    /// Release a buffer handle unconditionally
    fn delete_buffer(&mut self, buffer: BufferId);

    /// Bind a buffer to a target (None detaches the target)
    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) -> Result<()>;

    /// Allocate storage of `size` bytes for the buffer bound to `target`,
    /// copying `data` into it when provided
    ///
    /// Re-calling reallocates storage and invalidates prior contents.
    fn buffer_data(
        &mut self,
        target: BufferTarget,
        size: u64,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Result<()>;

    /// Map the buffer bound to `target` and copy `data` over its start
    fn write_buffer(&mut self, target: BufferTarget, data: &[u8]) -> Result<()>;

    /// Read bytes back out of the buffer bound to `target`
    fn read_buffer(&mut self, target: BufferTarget, offset: u64, out: &mut [u8]) -> Result<()>;

    /// Attach a buffer to an indexed uniform-block binding point
    /// (whole-buffer binding only)
    fn bind_buffer_base(&mut self, index: u32, buffer: BufferId) -> Result<()>;

    // ----- textures -----

    /// Allocate a texture handle
    fn create_texture(&mut self) -> Result<TextureId>;

    /// Release a texture handle unconditionally
    fn delete_texture(&mut self, texture: TextureId);

    /// Bind a texture to the active texture unit (None detaches)
    fn bind_texture(&mut self, texture: Option<TextureId>) -> Result<()>;

    /// Upload (or allocate, when `data` is None) the image store of the
    /// currently bound texture
    fn tex_image_2d(
        &mut self,
        width: u32,
        height: u32,
        format: TextureFormat,
        data: Option<&[u8]>,
    ) -> Result<()>;

    /// Apply sampler parameters to the currently bound texture
    fn set_sampler(&mut self, sampler: SamplerConfig) -> Result<()>;

    // ----- framebuffers -----

    /// Allocate a framebuffer handle
    fn create_framebuffer(&mut self) -> Result<FramebufferId>;

    /// Release a framebuffer handle unconditionally
    fn delete_framebuffer(&mut self, framebuffer: FramebufferId);

    /// Redirect draw calls to a framebuffer (None = default display surface)
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>) -> Result<()>;

    /// Attach a texture as the single color attachment of the currently
    /// bound framebuffer
    fn attach_color_texture(&mut self, texture: TextureId) -> Result<()>;

    /// Completeness status of the currently bound framebuffer
    fn framebuffer_complete(&mut self) -> Result<bool>;

    // ----- vertex arrays -----

    /// Allocate a vertex-array handle
    fn create_vertex_array(&mut self) -> Result<VertexArrayId>;

    /// Release a vertex-array handle unconditionally
    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId);

    /// Bind a vertex array (None detaches)
    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>) -> Result<()>;

    /// Install one attribute of the vertex layout on the currently bound
    /// vertex array, reading from the currently bound vertex buffer
    fn set_vertex_attribute(&mut self, attribute: &VertexAttribute) -> Result<()>;

    /// Issue an indexed triangle-list draw call using the currently bound
    /// vertex array
    fn draw_indexed_triangles(&mut self, index_count: u32) -> Result<()>;

    // ----- global -----

    /// Clear the color buffer of the current draw target
    fn clear_color_buffer(&mut self);
}
