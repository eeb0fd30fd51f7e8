/// Texture2D - owning wrapper around one driver image handle

use std::path::Path;

use crate::asset::ImageDecoder;
use crate::device::{DeviceHandle, FilterMode, SamplerConfig, TextureFormat, TextureId, WrapMode};
use crate::error::Result;
use crate::{render_error, render_trace, render_warn};

/// Storage format and sampler parameters for a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureConfig {
    /// Color storage format
    pub color_format: TextureFormat,
    /// Wrap mode along U
    pub wrap_u: WrapMode,
    /// Wrap mode along V
    pub wrap_v: WrapMode,
    /// Minification filter
    pub min_filter: FilterMode,
    /// Magnification filter
    pub mag_filter: FilterMode,
}

impl TextureConfig {
    /// Uniform wrap and filter across both axes
    pub fn uniform(color_format: TextureFormat, wrap: WrapMode, filter: FilterMode) -> Self {
        Self {
            color_format,
            wrap_u: wrap,
            wrap_v: wrap,
            min_filter: filter,
            mag_filter: filter,
        }
    }

    fn sampler(&self) -> SamplerConfig {
        SamplerConfig {
            wrap_u: self.wrap_u,
            wrap_v: self.wrap_v,
            min_filter: self.min_filter,
            mag_filter: self.mag_filter,
        }
    }
}

/// One driver image object plus its sampler parameters
///
/// Exclusively owned by whichever RenderTarget or standalone holder created
/// it; immutable after construction except via explicit re-upload.
pub struct Texture2D {
    device: DeviceHandle,
    id: TextureId,
    width: u32,
    height: u32,
    config: TextureConfig,
}

impl Texture2D {
    /// Allocate an empty image store of `width`x`height` with the given
    /// format and sampler parameters
    pub fn new(device: DeviceHandle, width: u32, height: u32, config: TextureConfig) -> Result<Self> {
        let id = device.borrow_mut().create_texture().map_err(|e| {
            render_error!("tilegrid::Texture2D", "handle allocation failed: {}", e);
            e
        })?;
        {
            let mut dev = device.borrow_mut();
            dev.bind_texture(Some(id))?;
            dev.tex_image_2d(width, height, config.color_format, None)?;
            dev.set_sampler(config.sampler())?;
        }
        render_trace!(
            "tilegrid::Texture2D",
            "acquired texture handle {:?} ({}x{} {:?})",
            id,
            width,
            height,
            config.color_format
        );
        Ok(Self {
            device,
            id,
            width,
            height,
            config,
        })
    }

    /// Decode a raster file and construct a texture holding its pixels
    pub fn from_image(
        device: DeviceHandle,
        decoder: &dyn ImageDecoder,
        path: &Path,
        wrap: WrapMode,
        filter: FilterMode,
    ) -> Result<Self> {
        let image = decoder.decode(path).map_err(|e| {
            render_error!("tilegrid::Texture2D", "{}", e);
            e
        })?;
        let config = TextureConfig::uniform(image.format, wrap, filter);
        let mut texture = Self::new(device, image.width, image.height, config)?;
        texture.upload(image.width, image.height, image.format, &image.pixels)?;
        Ok(texture)
    }

    /// Decode a raster file and replace the image contents
    ///
    /// Fails loudly on decode failure; the previous contents are left in
    /// place and must not be sampled as if the load had succeeded.
    pub fn load_image(
        &mut self,
        decoder: &dyn ImageDecoder,
        path: &Path,
        wrap: WrapMode,
        filter: FilterMode,
    ) -> Result<()> {
        let image = decoder.decode(path).map_err(|e| {
            render_error!("tilegrid::Texture2D", "{}", e);
            e
        })?;
        self.config = TextureConfig::uniform(image.format, wrap, filter);
        self.upload(image.width, image.height, image.format, &image.pixels)
    }

    /// Attach to the active texture unit
    pub fn bind(&self) -> Result<()> {
        self.device.borrow_mut().bind_texture(Some(self.id))
    }

    /// Driver handle
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Storage format and sampler parameters
    pub fn config(&self) -> TextureConfig {
        self.config
    }

    fn upload(&mut self, width: u32, height: u32, format: TextureFormat, pixels: &[u8]) -> Result<()> {
        let mut device = self.device.borrow_mut();
        device.bind_texture(Some(self.id))?;
        device.tex_image_2d(width, height, format, Some(pixels))?;
        device.set_sampler(self.config.sampler())?;
        self.width = width;
        self.height = height;
        self.config.color_format = format;
        Ok(())
    }

    /// Respecify the image store with a fixed format and sampler without
    /// touching the recorded config (used by RenderTarget, which overrides
    /// the caller's format for the attachment upload)
    pub(crate) fn respecify(&mut self, format: TextureFormat, sampler: SamplerConfig) -> Result<()> {
        let mut device = self.device.borrow_mut();
        device.bind_texture(Some(self.id))?;
        device.tex_image_2d(self.width, self.height, format, None)?;
        device.set_sampler(sampler)?;
        Ok(())
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        match self.device.try_borrow_mut() {
            Ok(mut device) => {
                device.delete_texture(self.id);
                render_trace!("tilegrid::Texture2D", "released texture handle {:?}", self.id);
            }
            Err(_) => render_warn!(
                "tilegrid::Texture2D",
                "device busy, leaking texture handle {:?}",
                self.id
            ),
        }
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
