/// Mask and tile-table mathematics
///
/// Everything the mask pass reads from GPU memory is produced here: the
/// screen-mask vertex table (two line equations per vertex, evaluated
/// per-pixel in the shader), its triangle indices, the tile-origin lookup
/// table uploaded as a uniform block, and the reference tile-mask polygon
/// used for host-side validation.

use glam::UVec2;

/// Tile edge length in world units
pub const TILE_SIZE: u32 = 16;

/// Logical map width in tiles
pub const MAP_TILES_X: u32 = 20;

/// Logical map height in tiles
pub const MAP_TILES_Y: u32 = 19;

/// Logical map width in world units (320)
pub const MAP_WIDTH: u32 = MAP_TILES_X * TILE_SIZE;

/// Logical map height in world units (304)
pub const MAP_HEIGHT: u32 = MAP_TILES_Y * TILE_SIZE;

/// Number of entries in the tile-origin lookup table (380)
pub const TILE_COUNT: usize = (MAP_TILES_X * MAP_TILES_Y) as usize;

/// Triangle indices over the 12 mask vertices: three quads of two
/// triangles each
pub const SCREEN_MASK_INDICES: [u32; 18] = [
    0, 1, 3,
    1, 2, 3,
    4, 5, 7,
    5, 6, 7,
    8, 9, 11,
    9, 10, 11,
];

/// Screen-mask vertex table: 12 vertices of 6 unsigned coefficients each
///
/// Each vertex carries two line equations `a*x + b*y + c` (coefficients
/// interleaved as `a1,b1,c1,a2,b2,c2`); the shader interpolates them
/// across each quad and evaluates the inequalities per pixel. The table
/// depends only on the screen size, so it is built once at pipeline
/// construction and rebuilt never (the screen does not resize).
pub fn screen_mask_vertices(screen_width: u32, screen_height: u32) -> [[u32; 6]; 12] {
    let w = screen_width;
    let h = screen_height;
    [
        // left/right line       bottom/top line
        [0, 1, 0,    0, 0, h],
        [0, 1, 0,    0, 1, 0],
        [1, 0, 0,    0, 1, 0],
        [1, 0, 0,    0, 0, h],

        [0, 0, w,    0, 1, 0],
        [0, 0, w,    1, 0, 0],
        [0, 0, 0,    1, 0, 0],
        [0, 0, 0,    0, 1, 0],

        [0, 1, 0,    1, 0, 0],
        [0, 1, 0,    0, 0, 0],
        [1, 0, 0,    0, 0, 0],
        [1, 0, 0,    1, 0, 0],
    ]
}

/// Tile-origin lookup table: entry `i + MAP_TILES_X * j` is the
/// pixel-space origin `(TILE_SIZE * i, TILE_SIZE * j)`
///
/// Uploaded once into a uniform block and read-only on the GPU side
/// thereafter. The GPU addresses it by world position to select the tile
/// a pixel falls into.
pub fn tile_origin_table() -> Vec<UVec2> {
    let mut table = vec![UVec2::ZERO; TILE_COUNT];
    for j in 0..MAP_TILES_Y {
        for i in 0..MAP_TILES_X {
            table[(i + MAP_TILES_X * j) as usize] = UVec2::new(i * TILE_SIZE, j * TILE_SIZE);
        }
    }
    table
}

// ============================================================================
// Reference tile mask polygon
// ============================================================================

/// One line equation `a*x + b*y + c` with integer coefficients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEq {
    pub a: i64,
    pub b: i64,
    pub c: i64,
}

impl LineEq {
    /// Signed evaluation at a point; non-negative means the point lies on
    /// the interior side of (or on) the line
    pub fn eval(&self, x: i64, y: i64) -> i64 {
        self.a * x + self.b * y + self.c
    }
}

/// Edge lines of the reference tile-mask polygon: a convex dodecagon
/// inscribed in the `TILE_SIZE`-unit tile bounds
///
/// The twelve vertices sit on a radius-8 circle around the tile center
/// (8,8), rounded to lattice points; each edge's half-plane contains the
/// interior, so membership is the simultaneous non-negativity of all
/// twelve evaluations. The pipeline checks the tile center against this
/// at construction as a sanity diagnostic.
pub fn tile_mask_edges() -> [LineEq; 12] {
    // Edges walk the vertices counter-clockwise starting at (16,8):
    // (16,8) (15,12) (12,15) (8,16) (4,15) (1,12)
    // (0,8)  (1,4)   (4,1)   (8,0)  (12,1) (15,4)
    [
        LineEq { a: -4, b: -1, c: 72 },
        LineEq { a: -3, b: -3, c: 81 },
        LineEq { a: -1, b: -4, c: 72 },
        LineEq { a: 1, b: -4, c: 56 },
        LineEq { a: 3, b: -3, c: 33 },
        LineEq { a: 4, b: -1, c: 8 },
        LineEq { a: 4, b: 1, c: -8 },
        LineEq { a: 3, b: 3, c: -15 },
        LineEq { a: 1, b: 4, c: -8 },
        LineEq { a: -1, b: 4, c: 8 },
        LineEq { a: -3, b: 3, c: 33 },
        LineEq { a: -4, b: 1, c: 56 },
    ]
}

/// Membership test against the reference tile-mask polygon
/// (boundary points are members)
pub fn tile_mask_contains(x: i64, y: i64) -> bool {
    tile_mask_edges().iter().all(|edge| edge.eval(x, y) >= 0)
}

#[cfg(test)]
#[path = "mask_tests.rs"]
mod tests;
