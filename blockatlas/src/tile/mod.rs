//! Sparse block-tile storage for large raster maps.
//!
//! A map is published as a sparse set of square PNG tiles on a uniform
//! integer grid, one file per block coordinate. This module loads such a
//! directory into an in-memory [`TileStore`] that places every tile into
//! a single absolute pixel coordinate space and answers "which tiles
//! intersect this rectangle" lookups for the compositor.
//!
//! # Coordinate spaces
//!
//! - **Block coordinates** `(bx, by)` address tiles on the grid; block
//!   `(bx, by)` occupies the absolute pixel rect
//!   `(bx * 2048, by * 2048, 2048, 2048)`.
//! - **Absolute coordinates** are raw pixel positions in that space.
//! - **Logical coordinates** are what callers query with: they are
//!   translated through the store's origin mapping (a designated origin
//!   block's center plus a per-map origin offset) into absolute
//!   coordinates.

mod filename;
mod normalize;
mod store;

pub use filename::{ParseError, TileNamePattern};
pub use normalize::normalize_tile;
pub use store::TileStore;

use image::RgbaImage;

use crate::geom::Rect;

/// Edge length of every tile in pixels.
pub const TILE_EDGE: i32 = 2048;

/// Largest block coordinate magnitude whose placement rectangle stays
/// inside `i32` pixel space (including its far edge). Filenames with
/// coordinates beyond this are rejected at parse time.
pub const MAX_BLOCK_COORD: i32 = i32::MAX / TILE_EDGE - 1;

/// Sources with both dimensions at or below this threshold are upscaled
/// with cubic interpolation; anything larger uses nearest-neighbor to
/// avoid fading artifacts along tile edges.
pub const NEAREST_THRESHOLD: u32 = 512;

/// Grid address of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockCoord {
    pub bx: i32,
    pub by: i32,
}

impl BlockCoord {
    /// Create a new block coordinate.
    pub const fn new(bx: i32, by: i32) -> Self {
        Self { bx, by }
    }

    /// Absolute pixel rectangle occupied by this block.
    pub const fn rect(&self) -> Rect {
        Rect::new(self.bx * TILE_EDGE, self.by * TILE_EDGE, TILE_EDGE, TILE_EDGE)
    }

    /// The four edge-adjacent block coordinates.
    pub const fn neighbors(&self) -> [BlockCoord; 4] {
        [
            BlockCoord::new(self.bx - 1, self.by),
            BlockCoord::new(self.bx + 1, self.by),
            BlockCoord::new(self.bx, self.by - 1),
            BlockCoord::new(self.bx, self.by + 1),
        ]
    }

    /// Block coordinate containing the given absolute pixel position.
    pub fn containing(x: i32, y: i32) -> Self {
        Self::new(x.div_euclid(TILE_EDGE), y.div_euclid(TILE_EDGE))
    }
}

/// One loaded tile: a normalized raster plus its absolute placement.
///
/// Tiles are immutable once loaded; the compositor only ever reads from
/// them, which is what allows lock-free parallel composition.
#[derive(Debug, Clone)]
pub struct Tile {
    /// Grid address.
    pub block: BlockCoord,
    /// Raster data, always `TILE_EDGE` × `TILE_EDGE` after normalization.
    pub raster: RgbaImage,
    /// Placement rectangle in absolute map coordinates.
    pub rect: Rect,
}

impl Tile {
    /// Build a tile from an already-normalized raster.
    pub fn new(block: BlockCoord, raster: RgbaImage) -> Self {
        debug_assert_eq!(raster.width(), TILE_EDGE as u32);
        debug_assert_eq!(raster.height(), TILE_EDGE as u32);
        let rect = block.rect();
        Self {
            block,
            raster,
            rect,
        }
    }
}
