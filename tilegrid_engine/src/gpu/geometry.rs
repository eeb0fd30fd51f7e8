/// GeometryBatch - vertex array with owned vertex and index buffers

use crate::device::{BufferTarget, BufferUsage, DeviceHandle, VertexArrayId, VertexAttribute};
use crate::error::Result;
use crate::gpu::GpuBuffer;
use crate::{render_error, render_trace, render_warn};

/// One driver vertex-array handle plus exactly one vertex and one index
/// buffer
///
/// The vertex-attribute layout is caller-specified at load time and must be
/// fully installed before any draw call. `draw` issues an indexed
/// triangle-list draw using the stored index count (a true count of
/// indices, not a byte size).
pub struct GeometryBatch {
    device: DeviceHandle,
    id: VertexArrayId,
    vertex_buffer: GpuBuffer,
    index_buffer: GpuBuffer,
    index_count: u32,
    layout: Vec<VertexAttribute>,
}

impl GeometryBatch {
    /// Acquire the vertex-array handle and its two buffer handles
    pub fn new(device: DeviceHandle) -> Result<Self> {
        let id = device.borrow_mut().create_vertex_array().map_err(|e| {
            render_error!("tilegrid::GeometryBatch", "handle allocation failed: {}", e);
            e
        })?;
        let vertex_buffer = GpuBuffer::new(device.clone(), BufferTarget::Vertex)?;
        let index_buffer = GpuBuffer::new(device.clone(), BufferTarget::Index)?;
        render_trace!("tilegrid::GeometryBatch", "acquired vertex array handle {:?}", id);
        Ok(Self {
            device,
            id,
            vertex_buffer,
            index_buffer,
            index_count: 0,
            layout: Vec::new(),
        })
    }

    /// Upload vertex and index data and install the attribute layout
    ///
    /// `usage` is caller-selected per use case: static for content that
    /// never changes post-load, stream for data rewritten every frame.
    pub fn load<V: bytemuck::Pod>(
        &mut self,
        vertices: &[V],
        indices: &[u32],
        layout: &[VertexAttribute],
        usage: BufferUsage,
    ) -> Result<()> {
        self.device.borrow_mut().bind_vertex_array(Some(self.id))?;

        // Vertex data first; init leaves the buffer bound so the attribute
        // installs read from it
        self.vertex_buffer.init_from(vertices, usage)?;
        for attribute in layout {
            self.device.borrow_mut().set_vertex_attribute(attribute)?;
        }

        self.index_buffer.init_from(indices, usage)?;

        self.device.borrow_mut().bind_vertex_array(None)?;
        self.vertex_buffer.unbind()?;
        self.index_buffer.unbind()?;

        self.index_count = indices.len() as u32;
        self.layout = layout.to_vec();
        Ok(())
    }

    /// Bind the vertex array and issue an indexed triangle-list draw call
    pub fn draw(&self) -> Result<()> {
        let mut device = self.device.borrow_mut();
        device.bind_vertex_array(Some(self.id))?;
        device.draw_indexed_triangles(self.index_count)
    }

    /// Driver handle
    pub fn id(&self) -> VertexArrayId {
        self.id
    }

    /// Number of indices uploaded by the last `load`
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Attribute layout installed by the last `load`
    pub fn layout(&self) -> &[VertexAttribute] {
        &self.layout
    }

    /// Owned vertex buffer (read-only access for diagnostics)
    pub fn vertex_buffer(&self) -> &GpuBuffer {
        &self.vertex_buffer
    }

    /// Owned index buffer (read-only access for diagnostics)
    pub fn index_buffer(&self) -> &GpuBuffer {
        &self.index_buffer
    }
}

impl Drop for GeometryBatch {
    fn drop(&mut self) {
        match self.device.try_borrow_mut() {
            Ok(mut device) => {
                device.delete_vertex_array(self.id);
                render_trace!(
                    "tilegrid::GeometryBatch",
                    "released vertex array handle {:?}",
                    self.id
                );
            }
            Err(_) => render_warn!(
                "tilegrid::GeometryBatch",
                "device busy, leaking vertex array handle {:?}",
                self.id
            ),
        }
        // Owned buffers drop with us
    }
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
