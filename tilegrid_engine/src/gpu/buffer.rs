/// GpuBuffer - owning wrapper around one driver buffer handle

use crate::device::{BufferId, BufferTarget, BufferUsage, DeviceHandle};
use crate::error::{Error, Result};
use crate::{render_error, render_trace, render_warn};

/// One driver buffer object
///
/// The handle is acquired at construction and stays valid for the whole
/// lifetime of the object; storage is allocated by `init` (re-calling
/// reallocates and invalidates prior contents). The bound-target kind is
/// fixed at construction.
pub struct GpuBuffer {
    device: DeviceHandle,
    id: BufferId,
    target: BufferTarget,
    /// Bytes allocated by the last `init` (0 before the first)
    size: u64,
    usage: Option<BufferUsage>,
}

impl GpuBuffer {
    /// Acquire a buffer handle (no storage yet)
    pub fn new(device: DeviceHandle, target: BufferTarget) -> Result<Self> {
        let id = device.borrow_mut().create_buffer().map_err(|e| {
            render_error!("tilegrid::GpuBuffer", "handle allocation failed: {}", e);
            e
        })?;
        render_trace!("tilegrid::GpuBuffer", "acquired buffer handle {:?} ({:?})", id, target);
        Ok(Self {
            device,
            id,
            target,
            size: 0,
            usage: None,
        })
    }

    /// Allocate backing storage of `size` bytes and copy `data` into it
    /// (uninitialized storage when `data` is None)
    ///
    /// Leaves the buffer bound to its target so a follow-up attribute
    /// install can read from it; callers that need a clean binding state
    /// call `unbind` afterwards.
    pub fn init(&mut self, data: Option<&[u8]>, size: u64, usage: BufferUsage) -> Result<()> {
        let mut device = self.device.borrow_mut();
        device.bind_buffer(self.target, Some(self.id))?;
        device.buffer_data(self.target, size, data, usage)?;
        self.size = size;
        self.usage = Some(usage);
        Ok(())
    }

    /// Typed `init`: upload a slice of plain-old-data values
    pub fn init_from<T: bytemuck::Pod>(&mut self, data: &[T], usage: BufferUsage) -> Result<()> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        self.init(Some(bytes), bytes.len() as u64, usage)
    }

    /// Map the existing storage and overwrite its start with `data`
    ///
    /// Bounds-checked: writing more bytes than `init` allocated is a
    /// reported error, never a silent overrun.
    pub fn write(&self, data: &[u8]) -> Result<()> {
        if data.len() as u64 > self.size {
            return Err(Error::WriteOutOfBounds {
                requested: data.len() as u64,
                capacity: self.size,
            });
        }
        let mut device = self.device.borrow_mut();
        device.bind_buffer(self.target, Some(self.id))?;
        device.write_buffer(self.target, data)?;
        device.bind_buffer(self.target, None)?;
        Ok(())
    }

    /// Read `out.len()` bytes back starting at `offset`
    pub fn read(&self, offset: u64, out: &mut [u8]) -> Result<()> {
        let mut device = self.device.borrow_mut();
        device.bind_buffer(self.target, Some(self.id))?;
        device.read_buffer(self.target, offset, out)?;
        device.bind_buffer(self.target, None)?;
        Ok(())
    }

    /// Bind to the stored target kind
    pub fn bind(&self) -> Result<()> {
        self.device.borrow_mut().bind_buffer(self.target, Some(self.id))
    }

    /// Detach the stored target kind
    pub fn unbind(&self) -> Result<()> {
        self.device.borrow_mut().bind_buffer(self.target, None)
    }

    /// Attach the whole buffer to an indexed uniform-block binding point
    pub fn bind_uniform_block(&self, index: u32) -> Result<()> {
        self.device.borrow_mut().bind_buffer_base(index, self.id)
    }

    /// Driver handle
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Target kind fixed at construction
    pub fn target(&self) -> BufferTarget {
        self.target
    }

    /// Bytes allocated by the last `init`
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Usage hint of the last `init`
    pub fn usage(&self) -> Option<BufferUsage> {
        self.usage
    }
}

impl Drop for GpuBuffer {
    fn drop(&mut self) {
        // Don't panic if the device is already borrowed
        match self.device.try_borrow_mut() {
            Ok(mut device) => {
                device.delete_buffer(self.id);
                render_trace!("tilegrid::GpuBuffer", "released buffer handle {:?}", self.id);
            }
            Err(_) => render_warn!(
                "tilegrid::GpuBuffer",
                "device busy, leaking buffer handle {:?}",
                self.id
            ),
        }
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
