/// TileRenderPipeline - the two-pass mask/composite orchestrator

use std::path::PathBuf;

use glam::{UVec2, UVec4, Vec2};

use crate::asset::ImageDecoder;
use crate::device::{
    AttributeType, BufferTarget, BufferUsage, DeviceHandle, FilterMode, TextureFormat,
    VertexAttribute, WrapMode,
};
use crate::error::Result;
use crate::gpu::{GeometryBatch, GpuBuffer, RenderTarget, Texture2D};
use crate::pipeline::mask;
use crate::pipeline::Shader;
use crate::{render_debug, render_info, render_warn};

/// Uniform-block binding point of the tile-origin table
pub const TILE_TABLE_BINDING: u32 = 0;

/// Mask rectangle handed to the mask pass each frame
///
/// A fixed 128x128 region at the origin; deliberately not derived from the
/// world position.
pub const MASK_RECT: UVec4 = UVec4::new(0, 0, 128, 128);

/// Construction-time configuration
///
/// Everything here is fixed for the lifetime of the pipeline; render
/// targets are never resized after creation.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Logical screen width in pixels
    pub screen_width: u32,
    /// Logical screen height in pixels
    pub screen_height: u32,
    /// Tileset image consumed at construction
    pub tileset_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            screen_width: mask::MAP_WIDTH,
            screen_height: mask::MAP_HEIGHT,
            tileset_path: PathBuf::from("resources/tileset.png"),
        }
    }
}

/// position.xy + uv.xy, tightly packed floats
fn quad_layout() -> [VertexAttribute; 2] {
    [
        VertexAttribute {
            location: 0,
            components: 2,
            attribute_type: AttributeType::Float,
            normalized: false,
            stride: 4 * 4,
            offset: 0,
        },
        VertexAttribute {
            location: 1,
            components: 2,
            attribute_type: AttributeType::Float,
            normalized: false,
            stride: 4 * 4,
            offset: 2 * 4,
        },
    ]
}

/// Two 3-component line-equation coefficient vectors per vertex
///
/// Declared float-typed although the uploaded coefficients are unsigned
/// integers; the shader reinterprets them.
fn mask_layout() -> [VertexAttribute; 2] {
    [
        VertexAttribute {
            location: 0,
            components: 3,
            attribute_type: AttributeType::Float,
            normalized: false,
            stride: 6 * 4,
            offset: 0,
        },
        VertexAttribute {
            location: 1,
            components: 3,
            attribute_type: AttributeType::Float,
            normalized: false,
            stride: 6 * 4,
            offset: 3 * 4,
        },
    ]
}

/// Two-pass tile renderer
///
/// Constructed once, acquiring every GPU resource it will ever use; then
/// `render` is invoked once per frame with the current world-space scroll
/// position. The mask pass draws the screen-mask geometry into the
/// off-screen target with the tile shader; the composite pass draws the
/// target's color attachment to the default surface with the display
/// shader.
pub struct TileRenderPipeline {
    device: DeviceHandle,
    tile_shader: Box<dyn Shader>,
    display_shader: Box<dyn Shader>,

    full_screen: GeometryBatch,
    screen_mask: GeometryBatch,
    tile_table: GpuBuffer,
    target: RenderTarget,
    tileset: Texture2D,

    screen_size: UVec2,
    /// Last rendered world position. Retained for potential delta
    /// rendering; no logic consumes it today.
    last_position: UVec2,
}

impl TileRenderPipeline {
    /// Acquire all GPU resources and upload the static tables
    pub fn new(
        device: DeviceHandle,
        mut tile_shader: Box<dyn Shader>,
        display_shader: Box<dyn Shader>,
        decoder: &dyn ImageDecoder,
        config: PipelineConfig,
    ) -> Result<Self> {
        let screen_size = UVec2::new(config.screen_width, config.screen_height);

        // Full-screen quad for the composite pass
        let full_screen_vertices: [f32; 16] = [
            // position        // UV
            1.0, 1.0, 1.0, 1.0, // top right
            1.0, -1.0, 1.0, 0.0, // bottom right
            -1.0, -1.0, 0.0, 0.0, // bottom left
            -1.0, 1.0, 0.0, 1.0, // top left
        ];
        let full_screen_indices: [u32; 6] = [0, 1, 3, 1, 2, 3];
        let mut full_screen = GeometryBatch::new(device.clone())?;
        full_screen.load(
            &full_screen_vertices,
            &full_screen_indices,
            &quad_layout(),
            BufferUsage::Static,
        )?;

        // Screen-mask geometry for the mask pass; stream usage because the
        // coefficients were once rewritten per frame on the CPU
        let mask_vertices = mask::screen_mask_vertices(config.screen_width, config.screen_height);
        let flat_mask: Vec<u32> = mask_vertices.iter().flatten().copied().collect();
        let mut screen_mask = GeometryBatch::new(device.clone())?;
        screen_mask.load(
            &flat_mask,
            &mask::SCREEN_MASK_INDICES,
            &mask_layout(),
            BufferUsage::Stream,
        )?;

        // Tile-origin table as a uniform block
        tile_shader.bind_uniform_block("tiles", TILE_TABLE_BINDING)?;
        let table = mask::tile_origin_table();
        let mut tile_table = GpuBuffer::new(device.clone(), BufferTarget::Uniform)?;
        tile_table.init_from(&table, BufferUsage::Static)?;
        tile_table.bind_uniform_block(TILE_TABLE_BINDING)?;
        tile_table.unbind()?;

        // Diagnostic: host-side table size versus the driver-reported block
        let host_size = tile_table.size();
        let block_size = tile_shader.uniform_block_size(TILE_TABLE_BINDING)?;
        render_info!(
            "tilegrid::TileRenderPipeline",
            "tile table: {} bytes host-side, {} bytes driver-reported",
            host_size,
            block_size
        );
        if (block_size as u64) < host_size {
            render_warn!(
                "tilegrid::TileRenderPipeline",
                "driver uniform block smaller than the tile table ({} < {})",
                block_size,
                host_size
            );
        }

        // Diagnostic: the reference tile mask must cover the tile center
        let center = (mask::TILE_SIZE / 2) as i64;
        if mask::tile_mask_contains(center, center) {
            render_debug!("tilegrid::TileRenderPipeline", "tile mask covers the tile center");
        } else {
            render_warn!(
                "tilegrid::TileRenderPipeline",
                "tile mask does not cover the tile center"
            );
        }

        let target = RenderTarget::new(
            device.clone(),
            config.screen_width,
            config.screen_height,
            TextureFormat::Rgba8,
        )?;

        // Construction aborts on a tileset decode failure rather than
        // rendering from an undefined texture
        let tileset = Texture2D::from_image(
            device.clone(),
            decoder,
            &config.tileset_path,
            WrapMode::ClampToEdge,
            FilterMode::Nearest,
        )?;

        render_info!(
            "tilegrid::TileRenderPipeline",
            "constructed for {}x{} screen",
            config.screen_width,
            config.screen_height
        );

        Ok(Self {
            device,
            tile_shader,
            display_shader,
            full_screen,
            screen_mask,
            tile_table,
            target,
            tileset,
            screen_size,
            last_position: screen_size,
        })
    }

    /// Render one frame: mask pass into the off-screen target, then
    /// composite pass to the default display surface
    pub fn render(&mut self, world_position: UVec2) -> Result<()> {
        // Mask pass
        self.tile_shader.activate()?;
        self.tile_shader.set_uniform_uvec2("screenSize", self.screen_size)?;
        self.tile_shader.set_uniform_uvec2("worldCoords", world_position)?;
        self.tile_shader.set_uniform_uvec4("maskCoords", MASK_RECT)?;
        self.tileset.bind()?;
        self.target.bind()?;
        self.screen_mask.draw()?;
        self.target.unbind()?;

        // Possibly redundant for this pipeline
        self.device.borrow_mut().clear_color_buffer();

        // Composite pass
        self.display_shader.activate()?;
        self.display_shader.set_uniform_vec2("offset", Vec2::ZERO)?;
        self.target.bind_color_attachment()?;
        self.full_screen.draw()?;

        self.last_position = world_position;
        Ok(())
    }

    /// Logical screen size
    pub fn screen_size(&self) -> UVec2 {
        self.screen_size
    }

    /// World position of the most recent `render` call
    pub fn last_position(&self) -> UVec2 {
        self.last_position
    }

    /// The off-screen target the mask pass renders into
    pub fn render_target(&self) -> &RenderTarget {
        &self.target
    }

    /// The uniform-block buffer holding the tile-origin table
    pub fn tile_table(&self) -> &GpuBuffer {
        &self.tile_table
    }
}

#[cfg(test)]
#[path = "tile_pipeline_tests.rs"]
mod tests;
