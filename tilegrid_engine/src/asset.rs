//! Raster asset decoding
//!
//! Image decoding is an external capability from the renderer's point of
//! view: the pipeline hands a path to a decoder and gets pixels back (or a
//! reported failure). `FileImageDecoder` is the production implementation
//! over the `image` crate; tests substitute their own decoders.

use std::path::Path;

use crate::device::TextureFormat;
use crate::error::{Error, Result};

/// Decoded raster image, ready for texture upload
#[derive(Debug, Clone)]
pub struct RasterImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format of `pixels`
    pub format: TextureFormat,
    /// Tightly packed pixel rows, top row first
    pub pixels: Vec<u8>,
}

/// Image decode capability
pub trait ImageDecoder {
    /// Decode the raster file at `path`
    ///
    /// Decode failure is a reported, recoverable error
    /// (`Error::AssetLoadFailed`), distinguishable from a texture that was
    /// never loaded.
    fn decode(&self, path: &Path) -> Result<RasterImage>;
}

/// Production decoder backed by the `image` crate (png/jpeg)
pub struct FileImageDecoder;

impl ImageDecoder for FileImageDecoder {
    fn decode(&self, path: &Path) -> Result<RasterImage> {
        let decoded = image::open(path)
            .map_err(|e| Error::AssetLoadFailed(format!("{}: {}", path.display(), e)))?;
        let rgba = decoded.to_rgba8();
        Ok(RasterImage {
            width: rgba.width(),
            height: rgba.height(),
            format: TextureFormat::Rgba8,
            pixels: rgba.into_raw(),
        })
    }
}

#[cfg(test)]
#[path = "asset_tests.rs"]
mod tests;
