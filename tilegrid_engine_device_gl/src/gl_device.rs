/// GlGraphicsDevice - OpenGL implementation of the GraphicsDevice trait

use glow::HasContext;
use slotmap::SlotMap;

use tilegrid_engine::device::{
    BufferId, BufferTarget, BufferUsage, FramebufferId, GraphicsDevice, SamplerConfig,
    TextureFormat, TextureId, VertexArrayId, VertexAttribute,
};
use tilegrid_engine::{render_error, render_trace, Error, Result};

use crate::gl_enums;

/// OpenGL device
///
/// Owns the glow context plus the handle tables mapping the engine's opaque
/// ids onto native GL object names. All trait operations assume the context
/// is current on the calling thread; the engine is single-threaded so this
/// holds for the thread that constructed the device.
pub struct GlGraphicsDevice {
    gl: glow::Context,
    buffers: SlotMap<BufferId, glow::Buffer>,
    textures: SlotMap<TextureId, glow::Texture>,
    framebuffers: SlotMap<FramebufferId, glow::Framebuffer>,
    vertex_arrays: SlotMap<VertexArrayId, glow::VertexArray>,
}

impl GlGraphicsDevice {
    /// Wrap an already-loaded OpenGL context
    ///
    /// # Arguments
    ///
    /// * `gl` - Context with function pointers loaded (GL 3.3 core or later)
    pub fn new(gl: glow::Context) -> Self {
        unsafe {
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
        }
        render_trace!("tilegrid::gl", "OpenGL device created");
        Self {
            gl,
            buffers: SlotMap::with_key(),
            textures: SlotMap::with_key(),
            framebuffers: SlotMap::with_key(),
            vertex_arrays: SlotMap::with_key(),
        }
    }

    fn buffer(&self, id: BufferId) -> Result<glow::Buffer> {
        self.buffers
            .get(id)
            .copied()
            .ok_or_else(|| Error::InvalidResource(format!("unknown buffer {:?}", id)))
    }

    fn texture(&self, id: TextureId) -> Result<glow::Texture> {
        self.textures
            .get(id)
            .copied()
            .ok_or_else(|| Error::InvalidResource(format!("unknown texture {:?}", id)))
    }

    fn framebuffer(&self, id: FramebufferId) -> Result<glow::Framebuffer> {
        self.framebuffers
            .get(id)
            .copied()
            .ok_or_else(|| Error::InvalidResource(format!("unknown framebuffer {:?}", id)))
    }

    fn vertex_array(&self, id: VertexArrayId) -> Result<glow::VertexArray> {
        self.vertex_arrays
            .get(id)
            .copied()
            .ok_or_else(|| Error::InvalidResource(format!("unknown vertex array {:?}", id)))
    }
}

impl GraphicsDevice for GlGraphicsDevice {
    // ========================================================================
    // Buffers
    // ========================================================================

    fn create_buffer(&mut self) -> Result<BufferId> {
        let native = unsafe { self.gl.create_buffer() }.map_err(|e| {
            render_error!("tilegrid::gl", "glGenBuffers failed: {}", e);
            Error::BackendError(e)
        })?;
        Ok(self.buffers.insert(native))
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        if let Some(native) = self.buffers.remove(buffer) {
            unsafe { self.gl.delete_buffer(native) };
        }
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) -> Result<()> {
        let native = buffer.map(|id| self.buffer(id)).transpose()?;
        unsafe {
            self.gl.bind_buffer(gl_enums::buffer_target(target), native);
        }
        Ok(())
    }

    fn buffer_data(
        &mut self,
        target: BufferTarget,
        size: u64,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Result<()> {
        let gl_target = gl_enums::buffer_target(target);
        let gl_usage = gl_enums::buffer_usage(usage);
        unsafe {
            match data {
                Some(bytes) => self.gl.buffer_data_u8_slice(gl_target, bytes, gl_usage),
                None => self.gl.buffer_data_size(gl_target, size as i32, gl_usage),
            }
        }
        Ok(())
    }

    fn write_buffer(&mut self, target: BufferTarget, data: &[u8]) -> Result<()> {
        unsafe {
            self.gl
                .buffer_sub_data_u8_slice(gl_enums::buffer_target(target), 0, data);
        }
        Ok(())
    }

    fn read_buffer(&mut self, target: BufferTarget, offset: u64, out: &mut [u8]) -> Result<()> {
        unsafe {
            self.gl
                .get_buffer_sub_data(gl_enums::buffer_target(target), offset as i32, out);
        }
        Ok(())
    }

    fn bind_buffer_base(&mut self, index: u32, buffer: BufferId) -> Result<()> {
        let native = self.buffer(buffer)?;
        unsafe {
            self.gl
                .bind_buffer_base(glow::UNIFORM_BUFFER, index, Some(native));
        }
        Ok(())
    }

    // ========================================================================
    // Textures
    // ========================================================================

    fn create_texture(&mut self) -> Result<TextureId> {
        let native = unsafe { self.gl.create_texture() }.map_err(|e| {
            render_error!("tilegrid::gl", "glGenTextures failed: {}", e);
            Error::BackendError(e)
        })?;
        Ok(self.textures.insert(native))
    }

    fn delete_texture(&mut self, texture: TextureId) {
        if let Some(native) = self.textures.remove(texture) {
            unsafe { self.gl.delete_texture(native) };
        }
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) -> Result<()> {
        let native = texture.map(|id| self.texture(id)).transpose()?;
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, native);
        }
        Ok(())
    }

    fn tex_image_2d(
        &mut self,
        width: u32,
        height: u32,
        format: TextureFormat,
        data: Option<&[u8]>,
    ) -> Result<()> {
        unsafe {
            // 3-byte pixels break the default 4-byte row alignment
            if format == TextureFormat::Rgb8 {
                self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            }
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                gl_enums::internal_format(format),
                width as i32,
                height as i32,
                0,
                gl_enums::pixel_format(format),
                glow::UNSIGNED_BYTE,
                data,
            );
            if format == TextureFormat::Rgb8 {
                self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 4);
            }
        }
        Ok(())
    }

    fn set_sampler(&mut self, sampler: SamplerConfig) -> Result<()> {
        unsafe {
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                gl_enums::wrap_mode(sampler.wrap_u),
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                gl_enums::wrap_mode(sampler.wrap_v),
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                gl_enums::filter_mode(sampler.min_filter),
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                gl_enums::filter_mode(sampler.mag_filter),
            );
        }
        Ok(())
    }

    // ========================================================================
    // Framebuffers
    // ========================================================================

    fn create_framebuffer(&mut self) -> Result<FramebufferId> {
        let native = unsafe { self.gl.create_framebuffer() }.map_err(|e| {
            render_error!("tilegrid::gl", "glGenFramebuffers failed: {}", e);
            Error::BackendError(e)
        })?;
        Ok(self.framebuffers.insert(native))
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferId) {
        if let Some(native) = self.framebuffers.remove(framebuffer) {
            unsafe { self.gl.delete_framebuffer(native) };
        }
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>) -> Result<()> {
        let native = framebuffer.map(|id| self.framebuffer(id)).transpose()?;
        unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, native);
        }
        Ok(())
    }

    fn attach_color_texture(&mut self, texture: TextureId) -> Result<()> {
        let native = self.texture(texture)?;
        unsafe {
            self.gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(native),
                0,
            );
        }
        Ok(())
    }

    fn framebuffer_complete(&mut self) -> Result<bool> {
        let status = unsafe { self.gl.check_framebuffer_status(glow::FRAMEBUFFER) };
        Ok(status == glow::FRAMEBUFFER_COMPLETE)
    }

    // ========================================================================
    // Vertex arrays
    // ========================================================================

    fn create_vertex_array(&mut self) -> Result<VertexArrayId> {
        let native = unsafe { self.gl.create_vertex_array() }.map_err(|e| {
            render_error!("tilegrid::gl", "glGenVertexArrays failed: {}", e);
            Error::BackendError(e)
        })?;
        Ok(self.vertex_arrays.insert(native))
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId) {
        if let Some(native) = self.vertex_arrays.remove(vertex_array) {
            unsafe { self.gl.delete_vertex_array(native) };
        }
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>) -> Result<()> {
        let native = vertex_array.map(|id| self.vertex_array(id)).transpose()?;
        unsafe {
            self.gl.bind_vertex_array(native);
        }
        Ok(())
    }

    fn set_vertex_attribute(&mut self, attribute: &VertexAttribute) -> Result<()> {
        unsafe {
            self.gl.enable_vertex_attrib_array(attribute.location);
            self.gl.vertex_attrib_pointer_f32(
                attribute.location,
                attribute.components as i32,
                gl_enums::attribute_type(attribute.attribute_type),
                attribute.normalized,
                attribute.stride as i32,
                attribute.offset as i32,
            );
        }
        Ok(())
    }

    fn draw_indexed_triangles(&mut self, index_count: u32) -> Result<()> {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, index_count as i32, glow::UNSIGNED_INT, 0);
        }
        Ok(())
    }

    // ========================================================================
    // Global
    // ========================================================================

    fn clear_color_buffer(&mut self) {
        unsafe {
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }
}

impl Drop for GlGraphicsDevice {
    fn drop(&mut self) {
        unsafe {
            for (_, native) in self.buffers.drain() {
                self.gl.delete_buffer(native);
            }
            for (_, native) in self.textures.drain() {
                self.gl.delete_texture(native);
            }
            for (_, native) in self.framebuffers.drain() {
                self.gl.delete_framebuffer(native);
            }
            for (_, native) in self.vertex_arrays.drain() {
                self.gl.delete_vertex_array(native);
            }
        }
        render_trace!("tilegrid::gl", "OpenGL device destroyed");
    }
}
