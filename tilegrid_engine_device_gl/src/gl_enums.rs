/// Mappings from engine enums to OpenGL constants

use tilegrid_engine::device::{AttributeType, BufferTarget, BufferUsage, FilterMode, TextureFormat, WrapMode};

/// Buffer binding target
pub(crate) fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Vertex => glow::ARRAY_BUFFER,
        BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
        BufferTarget::Uniform => glow::UNIFORM_BUFFER,
    }
}

/// Storage usage hint
pub(crate) fn buffer_usage(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::Static => glow::STATIC_DRAW,
        BufferUsage::Stream => glow::STREAM_DRAW,
    }
}

/// Internal (GPU-side) texture format
pub(crate) fn internal_format(format: TextureFormat) -> i32 {
    match format {
        TextureFormat::Rgb8 => glow::RGB8 as i32,
        TextureFormat::Rgba8 => glow::RGBA8 as i32,
    }
}

/// Client (upload) pixel format
pub(crate) fn pixel_format(format: TextureFormat) -> u32 {
    match format {
        TextureFormat::Rgb8 => glow::RGB,
        TextureFormat::Rgba8 => glow::RGBA,
    }
}

/// Coordinate wrap parameter value
pub(crate) fn wrap_mode(mode: WrapMode) -> i32 {
    match mode {
        WrapMode::ClampToEdge => glow::CLAMP_TO_EDGE as i32,
        WrapMode::Repeat => glow::REPEAT as i32,
    }
}

/// Sampling filter parameter value
pub(crate) fn filter_mode(mode: FilterMode) -> i32 {
    match mode {
        FilterMode::Nearest => glow::NEAREST as i32,
        FilterMode::Linear => glow::LINEAR as i32,
    }
}

/// Vertex attribute element type
pub(crate) fn attribute_type(attribute_type: AttributeType) -> u32 {
    match attribute_type {
        AttributeType::Float => glow::FLOAT,
        AttributeType::UnsignedInt => glow::UNSIGNED_INT,
    }
}

#[cfg(test)]
#[path = "gl_enums_tests.rs"]
mod tests;
