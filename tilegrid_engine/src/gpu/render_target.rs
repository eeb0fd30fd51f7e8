/// RenderTarget - off-screen surface with one color attachment

use crate::device::{DeviceHandle, FramebufferId, SamplerConfig, TextureFormat, WrapMode, FilterMode};
use crate::error::{Error, Result};
use crate::gpu::{Texture2D, TextureConfig};
use crate::{render_error, render_trace, render_warn};

/// One driver framebuffer handle plus its owned color attachment
///
/// No depth or stencil attachment exists or can be added. Completeness is
/// validated at construction; an incomplete target is a fatal construction
/// error and the object is never handed out.
pub struct RenderTarget {
    device: DeviceHandle,
    id: FramebufferId,
    color: Texture2D,
    width: u32,
    height: u32,
}

impl RenderTarget {
    /// Construct a complete off-screen target of `width`x`height`
    ///
    /// The requested color format configures the attachment object, but the
    /// attachment's image store is always respecified as RGB with
    /// nearest-neighbor filtering before attachment.
    pub fn new(device: DeviceHandle, width: u32, height: u32, format: TextureFormat) -> Result<Self> {
        let mut color = Texture2D::new(
            device.clone(),
            width,
            height,
            TextureConfig::uniform(format, WrapMode::ClampToEdge, FilterMode::Nearest),
        )?;

        let id = device.borrow_mut().create_framebuffer().map_err(|e| {
            render_error!("tilegrid::RenderTarget", "handle allocation failed: {}", e);
            e
        })?;

        device.borrow_mut().bind_framebuffer(Some(id))?;
        color.respecify(TextureFormat::Rgb8, SamplerConfig::clamped_nearest())?;

        let complete = {
            let mut dev = device.borrow_mut();
            dev.attach_color_texture(color.id())?;
            dev.framebuffer_complete()?
        };

        if !complete {
            render_error!(
                "tilegrid::RenderTarget",
                "framebuffer {:?} incomplete ({}x{})",
                id,
                width,
                height
            );
            let mut dev = device.borrow_mut();
            dev.bind_framebuffer(None)?;
            dev.delete_framebuffer(id);
            return Err(Error::IncompleteRenderTarget { width, height });
        }

        device.borrow_mut().bind_framebuffer(None)?;
        render_trace!(
            "tilegrid::RenderTarget",
            "acquired framebuffer handle {:?} ({}x{})",
            id,
            width,
            height
        );

        Ok(Self {
            device,
            id,
            color,
            width,
            height,
        })
    }

    /// Redirect subsequent draw calls to this target
    pub fn bind(&self) -> Result<()> {
        self.device.borrow_mut().bind_framebuffer(Some(self.id))
    }

    /// Redirect subsequent draw calls back to the default display surface
    pub fn unbind(&self) -> Result<()> {
        self.device.borrow_mut().bind_framebuffer(None)
    }

    /// Expose the color attachment as a sampling source for a later pass
    ///
    /// Only yields meaningful pixels after a prior bind/draw cycle against
    /// this target has completed.
    pub fn bind_color_attachment(&self) -> Result<()> {
        self.color.bind()
    }

    /// Read-only view of the owned color attachment
    pub fn color_attachment(&self) -> &Texture2D {
        &self.color
    }

    /// Driver handle
    pub fn id(&self) -> FramebufferId {
        self.id
    }

    /// Declared width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Declared height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Drop for RenderTarget {
    fn drop(&mut self) {
        match self.device.try_borrow_mut() {
            Ok(mut device) => {
                device.delete_framebuffer(self.id);
                render_trace!(
                    "tilegrid::RenderTarget",
                    "released framebuffer handle {:?}",
                    self.id
                );
            }
            Err(_) => render_warn!(
                "tilegrid::RenderTarget",
                "device busy, leaking framebuffer handle {:?}",
                self.id
            ),
        }
        // The owned color attachment drops with us
    }
}

#[cfg(test)]
#[path = "render_target_tests.rs"]
mod tests;
