/// Mock graphics device for unit tests (no GPU required)
///
/// The mock keeps real state behind every binding point: buffer storage is
/// held as byte vectors, framebuffer completeness is derived from the
/// attachment, and every call is appended to an ordered command log so
/// tests can assert on binding sequences.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::device::{
    BufferId, BufferTarget, BufferUsage, FramebufferId, GraphicsDevice,
    SamplerConfig, TextureFormat, TextureId, VertexArrayId, VertexAttribute,
};
use crate::error::{Error, Result};

// ============================================================================
// Per-object state
// ============================================================================

#[derive(Debug, Default)]
struct MockBufferState {
    /// None until buffer_data allocates storage
    storage: Option<Vec<u8>>,
    usage: Option<BufferUsage>,
}

#[derive(Debug, Default)]
struct MockTextureState {
    width: u32,
    height: u32,
    format: Option<TextureFormat>,
    sampler: Option<SamplerConfig>,
    /// Number of tex_image_2d uploads (re-upload tracking)
    uploads: u32,
}

#[derive(Debug, Default)]
struct MockFramebufferState {
    color_attachment: Option<TextureId>,
}

#[derive(Debug, Default)]
struct MockVertexArrayState {
    attributes: Vec<VertexAttribute>,
}

// ============================================================================
// Mock device
// ============================================================================

/// Stateful mock implementation of `GraphicsDevice`
pub struct MockGraphicsDevice {
    buffers: SlotMap<BufferId, MockBufferState>,
    textures: SlotMap<TextureId, MockTextureState>,
    framebuffers: SlotMap<FramebufferId, MockFramebufferState>,
    vertex_arrays: SlotMap<VertexArrayId, MockVertexArrayState>,

    bound_vertex_buffer: Option<BufferId>,
    bound_index_buffer: Option<BufferId>,
    bound_uniform_buffer: Option<BufferId>,
    uniform_binding_points: FxHashMap<u32, BufferId>,
    bound_texture: Option<TextureId>,
    bound_framebuffer: Option<FramebufferId>,
    bound_vertex_array: Option<VertexArrayId>,

    commands: Vec<String>,
    draw_calls: u32,

    /// When set, the next create_* call fails (fatal allocation testing)
    fail_next_allocation: bool,

    /// When set, completeness checks always report false
    force_incomplete: bool,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            buffers: SlotMap::with_key(),
            textures: SlotMap::with_key(),
            framebuffers: SlotMap::with_key(),
            vertex_arrays: SlotMap::with_key(),
            bound_vertex_buffer: None,
            bound_index_buffer: None,
            bound_uniform_buffer: None,
            uniform_binding_points: FxHashMap::default(),
            bound_texture: None,
            bound_framebuffer: None,
            bound_vertex_array: None,
            commands: Vec::new(),
            draw_calls: 0,
            fail_next_allocation: false,
            force_incomplete: false,
        }
    }

    /// Make the next create_* call fail with a backend error
    pub fn fail_next_allocation(&mut self) {
        self.fail_next_allocation = true;
    }

    /// Make every completeness check report an incomplete framebuffer
    pub fn force_incomplete(&mut self) {
        self.force_incomplete = true;
    }

    fn take_allocation_failure(&mut self) -> Result<()> {
        if self.fail_next_allocation {
            self.fail_next_allocation = false;
            return Err(Error::BackendError("handle allocation failed".to_string()));
        }
        Ok(())
    }

    fn binding_slot(&mut self, target: BufferTarget) -> &mut Option<BufferId> {
        match target {
            BufferTarget::Vertex => &mut self.bound_vertex_buffer,
            BufferTarget::Index => &mut self.bound_index_buffer,
            BufferTarget::Uniform => &mut self.bound_uniform_buffer,
        }
    }

    fn bound_buffer(&mut self, target: BufferTarget) -> Result<BufferId> {
        self.binding_slot(target).ok_or_else(|| {
            Error::InvalidResource(format!("no buffer bound to {:?}", target))
        })
    }

    fn record(&mut self, command: String) {
        self.commands.push(command);
    }

    // ----- test inspection API -----

    /// Ordered log of every device call
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Clear the command log (between test phases)
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Currently bound draw framebuffer (None = default surface)
    pub fn bound_framebuffer(&self) -> Option<FramebufferId> {
        self.bound_framebuffer
    }

    /// Currently bound buffer for a target
    pub fn bound_buffer_at(&self, target: BufferTarget) -> Option<BufferId> {
        match target {
            BufferTarget::Vertex => self.bound_vertex_buffer,
            BufferTarget::Index => self.bound_index_buffer,
            BufferTarget::Uniform => self.bound_uniform_buffer,
        }
    }

    /// Buffer attached to an indexed uniform binding point
    pub fn uniform_binding(&self, index: u32) -> Option<BufferId> {
        self.uniform_binding_points.get(&index).copied()
    }

    /// Storage contents of a buffer (None if never allocated)
    pub fn buffer_contents(&self, buffer: BufferId) -> Option<&[u8]> {
        self.buffers.get(buffer)?.storage.as_deref()
    }

    /// Usage hint a buffer was allocated with
    pub fn buffer_usage(&self, buffer: BufferId) -> Option<BufferUsage> {
        self.buffers.get(buffer)?.usage
    }

    /// Dimensions of a texture's image store
    pub fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        let state = self.textures.get(texture)?;
        Some((state.width, state.height))
    }

    /// Storage format of a texture
    pub fn texture_format(&self, texture: TextureId) -> Option<TextureFormat> {
        self.textures.get(texture)?.format
    }

    /// Number of image uploads a texture has received
    pub fn texture_uploads(&self, texture: TextureId) -> u32 {
        self.textures.get(texture).map_or(0, |state| state.uploads)
    }

    /// Sampler parameters applied to a texture
    pub fn texture_sampler(&self, texture: TextureId) -> Option<SamplerConfig> {
        self.textures.get(texture)?.sampler
    }

    /// Color attachment of a framebuffer
    pub fn color_attachment(&self, framebuffer: FramebufferId) -> Option<TextureId> {
        self.framebuffers.get(framebuffer)?.color_attachment
    }

    /// Attribute layout installed on a vertex array
    pub fn vertex_attributes(&self, vertex_array: VertexArrayId) -> &[VertexAttribute] {
        self.vertex_arrays
            .get(vertex_array)
            .map_or(&[], |state| state.attributes.as_slice())
    }

    /// Total draw calls issued
    pub fn draw_call_count(&self) -> u32 {
        self.draw_calls
    }

    /// Live handle counts (buffers, textures, framebuffers, vertex arrays)
    pub fn live_handles(&self) -> (usize, usize, usize, usize) {
        (
            self.buffers.len(),
            self.textures.len(),
            self.framebuffers.len(),
            self.vertex_arrays.len(),
        )
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    // ----- buffers -----

    fn create_buffer(&mut self) -> Result<BufferId> {
        self.take_allocation_failure()?;
        let id = self.buffers.insert(MockBufferState::default());
        self.record(format!("create_buffer -> {:?}", id));
        Ok(id)
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(buffer);
        self.record(format!("delete_buffer {:?}", buffer));
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) -> Result<()> {
        if let Some(id) = buffer {
            if !self.buffers.contains_key(id) {
                return Err(Error::InvalidResource(format!("stale buffer {:?}", id)));
            }
        }
        *self.binding_slot(target) = buffer;
        self.record(format!("bind_buffer {:?} {:?}", target, buffer));
        Ok(())
    }

    fn buffer_data(
        &mut self,
        target: BufferTarget,
        size: u64,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Result<()> {
        let id = self.bound_buffer(target)?;
        let mut storage = vec![0u8; size as usize];
        if let Some(bytes) = data {
            if bytes.len() as u64 != size {
                return Err(Error::BackendError(format!(
                    "buffer_data size mismatch: {} declared, {} provided",
                    size,
                    bytes.len()
                )));
            }
            storage.copy_from_slice(bytes);
        }
        let state = &mut self.buffers[id];
        state.storage = Some(storage);
        state.usage = Some(usage);
        self.record(format!("buffer_data {:?} {} bytes {:?}", target, size, usage));
        Ok(())
    }

    fn write_buffer(&mut self, target: BufferTarget, data: &[u8]) -> Result<()> {
        let id = self.bound_buffer(target)?;
        let storage = self.buffers[id].storage.as_mut().ok_or_else(|| {
            Error::InvalidResource(format!("buffer {:?} has no storage", id))
        })?;
        if data.len() > storage.len() {
            return Err(Error::WriteOutOfBounds {
                requested: data.len() as u64,
                capacity: storage.len() as u64,
            });
        }
        storage[..data.len()].copy_from_slice(data);
        self.record(format!("write_buffer {:?} {} bytes", target, data.len()));
        Ok(())
    }

    fn read_buffer(&mut self, target: BufferTarget, offset: u64, out: &mut [u8]) -> Result<()> {
        let id = self.bound_buffer(target)?;
        let storage = self.buffers[id].storage.as_ref().ok_or_else(|| {
            Error::InvalidResource(format!("buffer {:?} has no storage", id))
        })?;
        let start = offset as usize;
        let end = start + out.len();
        if end > storage.len() {
            return Err(Error::InvalidResource(format!(
                "readback past end of buffer {:?} ({} > {})",
                id,
                end,
                storage.len()
            )));
        }
        out.copy_from_slice(&storage[start..end]);
        self.record(format!("read_buffer {:?} {} bytes", target, out.len()));
        Ok(())
    }

    fn bind_buffer_base(&mut self, index: u32, buffer: BufferId) -> Result<()> {
        if !self.buffers.contains_key(buffer) {
            return Err(Error::InvalidResource(format!("stale buffer {:?}", buffer)));
        }
        self.uniform_binding_points.insert(index, buffer);
        self.record(format!("bind_buffer_base {} {:?}", index, buffer));
        Ok(())
    }

    // ----- textures -----

    fn create_texture(&mut self) -> Result<TextureId> {
        self.take_allocation_failure()?;
        let id = self.textures.insert(MockTextureState::default());
        self.record(format!("create_texture -> {:?}", id));
        Ok(id)
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.textures.remove(texture);
        self.record(format!("delete_texture {:?}", texture));
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) -> Result<()> {
        if let Some(id) = texture {
            if !self.textures.contains_key(id) {
                return Err(Error::InvalidResource(format!("stale texture {:?}", id)));
            }
        }
        self.bound_texture = texture;
        self.record(format!("bind_texture {:?}", texture));
        Ok(())
    }

    fn tex_image_2d(
        &mut self,
        width: u32,
        height: u32,
        format: TextureFormat,
        data: Option<&[u8]>,
    ) -> Result<()> {
        let id = self.bound_texture.ok_or_else(|| {
            Error::InvalidResource("no texture bound".to_string())
        })?;
        if let Some(bytes) = data {
            let expected = (width * height * format.bytes_per_pixel()) as usize;
            if bytes.len() != expected {
                return Err(Error::BackendError(format!(
                    "tex_image_2d pixel data mismatch: {} expected, {} provided",
                    expected,
                    bytes.len()
                )));
            }
        }
        let state = &mut self.textures[id];
        state.width = width;
        state.height = height;
        state.format = Some(format);
        state.uploads += 1;
        self.record(format!("tex_image_2d {}x{} {:?}", width, height, format));
        Ok(())
    }

    fn set_sampler(&mut self, sampler: SamplerConfig) -> Result<()> {
        let id = self.bound_texture.ok_or_else(|| {
            Error::InvalidResource("no texture bound".to_string())
        })?;
        self.textures[id].sampler = Some(sampler);
        self.record("set_sampler".to_string());
        Ok(())
    }

    // ----- framebuffers -----

    fn create_framebuffer(&mut self) -> Result<FramebufferId> {
        self.take_allocation_failure()?;
        let id = self.framebuffers.insert(MockFramebufferState::default());
        self.record(format!("create_framebuffer -> {:?}", id));
        Ok(id)
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferId) {
        self.framebuffers.remove(framebuffer);
        self.record(format!("delete_framebuffer {:?}", framebuffer));
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>) -> Result<()> {
        if let Some(id) = framebuffer {
            if !self.framebuffers.contains_key(id) {
                return Err(Error::InvalidResource(format!("stale framebuffer {:?}", id)));
            }
        }
        self.bound_framebuffer = framebuffer;
        match framebuffer {
            Some(id) => self.record(format!("bind_framebuffer {:?}", id)),
            None => self.record("bind_framebuffer default".to_string()),
        }
        Ok(())
    }

    fn attach_color_texture(&mut self, texture: TextureId) -> Result<()> {
        let fb = self.bound_framebuffer.ok_or_else(|| {
            Error::InvalidResource("no framebuffer bound".to_string())
        })?;
        if !self.textures.contains_key(texture) {
            return Err(Error::InvalidResource(format!("stale texture {:?}", texture)));
        }
        self.framebuffers[fb].color_attachment = Some(texture);
        self.record(format!("attach_color_texture {:?}", texture));
        Ok(())
    }

    fn framebuffer_complete(&mut self) -> Result<bool> {
        let fb = self.bound_framebuffer.ok_or_else(|| {
            Error::InvalidResource("no framebuffer bound".to_string())
        })?;
        // Complete iff the single color attachment exists and has a
        // non-empty image store
        let complete = !self.force_incomplete
            && match self.framebuffers[fb].color_attachment {
            Some(tex) => self
                .textures
                .get(tex)
                .is_some_and(|state| state.width > 0 && state.height > 0),
            None => false,
        };
        self.record(format!("framebuffer_complete -> {}", complete));
        Ok(complete)
    }

    // ----- vertex arrays -----

    fn create_vertex_array(&mut self) -> Result<VertexArrayId> {
        self.take_allocation_failure()?;
        let id = self.vertex_arrays.insert(MockVertexArrayState::default());
        self.record(format!("create_vertex_array -> {:?}", id));
        Ok(id)
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId) {
        self.vertex_arrays.remove(vertex_array);
        self.record(format!("delete_vertex_array {:?}", vertex_array));
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>) -> Result<()> {
        if let Some(id) = vertex_array {
            if !self.vertex_arrays.contains_key(id) {
                return Err(Error::InvalidResource(format!("stale vertex array {:?}", id)));
            }
        }
        self.bound_vertex_array = vertex_array;
        self.record(format!("bind_vertex_array {:?}", vertex_array));
        Ok(())
    }

    fn set_vertex_attribute(&mut self, attribute: &VertexAttribute) -> Result<()> {
        let vao = self.bound_vertex_array.ok_or_else(|| {
            Error::InvalidResource("no vertex array bound".to_string())
        })?;
        if self.bound_vertex_buffer.is_none() {
            return Err(Error::InvalidResource(
                "no vertex buffer bound while installing attribute".to_string(),
            ));
        }
        if attribute.components == 0 || attribute.components > 4 {
            return Err(Error::InvalidResource(format!(
                "attribute component count {} out of range",
                attribute.components
            )));
        }
        self.vertex_arrays[vao].attributes.push(*attribute);
        self.record(format!(
            "set_vertex_attribute loc={} x{} {:?}",
            attribute.location, attribute.components, attribute.attribute_type
        ));
        Ok(())
    }

    fn draw_indexed_triangles(&mut self, index_count: u32) -> Result<()> {
        let vao = self.bound_vertex_array.ok_or_else(|| {
            Error::InvalidResource("no vertex array bound for draw".to_string())
        })?;
        if self.vertex_arrays[vao].attributes.is_empty() {
            return Err(Error::InvalidResource(
                "vertex array has no attribute layout".to_string(),
            ));
        }
        self.draw_calls += 1;
        self.record(format!("draw_indexed_triangles {}", index_count));
        Ok(())
    }

    // ----- global -----

    fn clear_color_buffer(&mut self) {
        self.record("clear_color_buffer".to_string());
    }
}

#[cfg(test)]
#[path = "mock_device_tests.rs"]
mod tests;
