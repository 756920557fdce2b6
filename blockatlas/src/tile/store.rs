//! The tile store: owns all loaded tiles and serves composited views.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::compose;
use crate::geom::{Point, Rect};

use super::{normalize_tile, BlockCoord, Tile, TileNamePattern, TILE_EDGE};

/// Sparse collection of map tiles addressed by block coordinate.
///
/// Built once from a tile directory; tiles live for the lifetime of the
/// store and are never evicted or mutated. All query methods are
/// read-only, so a store may be shared freely across threads.
///
/// Queries come in logical and absolute flavors. Absolute coordinates
/// address the raw tile grid; logical coordinates are translated through
/// the origin mapping fixed at construction (see [`TileStore::load`]).
#[derive(Debug, Clone)]
pub struct TileStore {
    tiles: Vec<Tile>,
    index: HashMap<BlockCoord, usize>,
    bounding: Rect,
    /// Absolute position of the logical zero point.
    abs_origin: Point,
}

impl TileStore {
    /// Create an empty store with the given origin mapping.
    ///
    /// The logical zero point sits at the center of `origin_block`,
    /// shifted by `map_origin` (different maps define their origin
    /// differently relative to the tile grid). The mapping is derived
    /// from the block coordinate alone, so it is valid even when the
    /// origin block itself was never published.
    pub fn new(map_origin: Point, origin_block: BlockCoord) -> Self {
        let half = Point::new(TILE_EDGE / 2, TILE_EDGE / 2);
        let abs_origin = origin_block.rect().top_left() + half + map_origin;
        Self {
            tiles: Vec::new(),
            index: HashMap::new(),
            bounding: Rect::EMPTY,
            abs_origin,
        }
    }

    /// Load every matching tile from a directory.
    ///
    /// Scans `dir` for files named `UI_<map_name>_<bx>_<by>.png`,
    /// decodes and normalizes each one, and inserts it at its block
    /// coordinate. Loading is deliberately forgiving: a missing
    /// directory yields an empty (and still queryable) store, and
    /// unparsable names or undecodable images are skipped with a
    /// warning. Whatever subset loads is served.
    pub fn load(
        dir: impl AsRef<Path>,
        map_name: &str,
        map_origin: Point,
        origin_block: BlockCoord,
    ) -> Self {
        let mut store = Self::new(map_origin, origin_block);
        let dir = dir.as_ref();
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "tile directory missing, serving empty store");
            return store;
        }
        let pattern = TileNamePattern::new(map_name);
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %dir.display(), %err, "cannot read tile directory");
                return store;
            }
        };
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(%err, "skipping unreadable directory entry");
                    continue;
                }
            };
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let block = match pattern.parse(&name) {
                Ok(block) => block,
                Err(_) => {
                    debug!(file = %name, "skipping non-tile file");
                    continue;
                }
            };
            let img = match image::open(entry.path()) {
                Ok(img) => img.to_rgba8(),
                Err(err) => {
                    warn!(file = %name, %err, "skipping undecodable tile");
                    continue;
                }
            };
            store.insert(block, img);
        }
        info!(
            map = map_name,
            tiles = store.len(),
            bounding = ?store.bounding,
            "tile store loaded"
        );
        store
    }

    /// Insert a raster at a block coordinate, widening the bounding
    /// rectangle. Sources of any size are normalized to the tile edge
    /// here, so the every-tile-is-`TILE_EDGE`-sized invariant holds no
    /// matter how the store was populated. A tile already present at the
    /// coordinate is replaced, keeping the one-tile-per-block invariant.
    pub fn insert(&mut self, block: BlockCoord, raster: RgbaImage) {
        let tile = Tile::new(block, normalize_tile(raster));
        self.bounding = self.bounding.union(&tile.rect);
        match self.index.get(&block) {
            Some(&i) => {
                warn!(?block, "replacing duplicate tile");
                self.tiles[i] = tile;
            }
            None => {
                self.index.insert(block, self.tiles.len());
                self.tiles.push(tile);
            }
        }
    }

    /// Number of loaded tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no tiles are loaded.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All loaded tiles, in insertion order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile at a block coordinate, if loaded.
    pub fn get(&self, block: BlockCoord) -> Option<&Tile> {
        self.index.get(&block).map(|&i| &self.tiles[i])
    }

    /// Union of all loaded tiles' placement rectangles (empty when the
    /// store is empty).
    pub fn bounding_rect(&self) -> Rect {
        self.bounding
    }

    /// Absolute position of the logical zero point.
    pub fn origin_abs(&self) -> Point {
        self.abs_origin
    }

    /// Translate a logical point into absolute coordinates.
    pub fn to_abs_point(&self, p: Point) -> Point {
        p + self.abs_origin
    }

    /// Translate a logical rectangle into absolute coordinates.
    pub fn to_abs_rect(&self, r: Rect) -> Rect {
        r + self.abs_origin
    }

    /// Indices of tiles intersecting a logical rectangle.
    pub fn find_tiles(&self, rect: Rect) -> Vec<usize> {
        self.find_tiles_abs(self.to_abs_rect(rect))
    }

    /// Indices of tiles intersecting an absolute rectangle.
    ///
    /// Returns an empty list (never an error) when nothing matches. A
    /// cheap bounding-box reject precedes the linear scan.
    pub fn find_tiles_abs(&self, rect: Rect) -> Vec<usize> {
        if !rect.intersects(&self.bounding) {
            return Vec::new();
        }
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.rect.intersects(&rect))
            .map(|(i, _)| i)
            .collect()
    }

    /// Adjacency-walk variant of [`TileStore::find_tiles`].
    pub fn find_tiles_flood(&self, rect: Rect) -> Vec<usize> {
        self.find_tiles_flood_abs(self.to_abs_rect(rect))
    }

    /// Adjacency-walk variant of [`TileStore::find_tiles_abs`].
    ///
    /// Instead of scanning every tile, walks outward from a seed block
    /// through 4-adjacent loaded blocks, with a visited set keyed by
    /// block coordinate. Matches the linear scan whenever the loaded
    /// tiles under the query are 4-connected to the seed; intended as an
    /// optimization for dense tile sets over large stores.
    pub fn find_tiles_flood_abs(&self, rect: Rect) -> Vec<usize> {
        if !rect.intersects(&self.bounding) {
            return Vec::new();
        }
        let Some(seed) = self.flood_seed(rect) else {
            return Vec::new();
        };
        let mut visited: HashSet<BlockCoord> = HashSet::new();
        let mut queue: VecDeque<BlockCoord> = VecDeque::new();
        let mut found = Vec::new();
        visited.insert(seed);
        queue.push_back(seed);
        while let Some(block) = queue.pop_front() {
            let Some(&i) = self.index.get(&block) else {
                continue;
            };
            if !self.tiles[i].rect.intersects(&rect) {
                continue;
            }
            found.push(i);
            // Only spread from loaded tiles, and only toward blocks that
            // can still intersect the query
            for neighbor in block.neighbors() {
                if neighbor.rect().intersects(&rect) && visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        found
    }

    /// Pick a loaded block to start the flood walk from: the block under
    /// the query's top-left corner when loaded, otherwise the first
    /// loaded tile intersecting the query.
    fn flood_seed(&self, rect: Rect) -> Option<BlockCoord> {
        let anchor = BlockCoord::containing(rect.x, rect.y);
        if self.index.contains_key(&anchor) {
            return Some(anchor);
        }
        self.tiles
            .iter()
            .find(|tile| tile.rect.intersects(&rect))
            .map(|tile| tile.block)
    }

    /// Composite the entire bounding rectangle.
    pub fn view_full(&self) -> RgbaImage {
        self.view_abs(self.bounding)
    }

    /// Composite a logical rectangle.
    ///
    /// The output buffer always has exactly the requested size; regions
    /// not covered by any tile stay zero-filled. A rectangle entirely
    /// off the map yields an all-zero buffer, never an error.
    pub fn view(&self, rect: Rect) -> RgbaImage {
        self.view_abs(self.to_abs_rect(rect))
    }

    /// Composite an absolute rectangle.
    pub fn view_abs(&self, rect: Rect) -> RgbaImage {
        compose::compose(&self.tiles, &self.find_tiles_abs(rect), rect)
    }

    /// Composite a logical rectangle with one task per intersecting
    /// tile. Semantically identical to [`TileStore::view`].
    pub fn view_parallel(&self, rect: Rect) -> RgbaImage {
        self.view_parallel_abs(self.to_abs_rect(rect))
    }

    /// Composite an absolute rectangle in parallel.
    pub fn view_parallel_abs(&self, rect: Rect) -> RgbaImage {
        compose::compose_parallel(&self.tiles, &self.find_tiles_abs(rect), rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(color: [u8; 4]) -> RgbaImage {
        let edge = TILE_EDGE as u32;
        RgbaImage::from_pixel(edge, edge, Rgba(color))
    }

    fn store_with_tiles(blocks: &[(i32, i32, [u8; 4])]) -> TileStore {
        let mut store = TileStore::new(Point::new(0, 0), BlockCoord::new(0, 0));
        for &(bx, by, color) in blocks {
            store.insert(BlockCoord::new(bx, by), solid(color));
        }
        store
    }

    #[test]
    fn test_empty_store_is_safely_queryable() {
        let store = TileStore::new(Point::new(0, 0), BlockCoord::new(0, 0));
        assert!(store.is_empty());
        assert!(store.bounding_rect().is_empty());
        assert!(store.find_tiles_abs(Rect::new(0, 0, 100, 100)).is_empty());
        let view = store.view_abs(Rect::new(0, 0, 10, 10));
        assert_eq!(view.dimensions(), (10, 10));
        assert!(view.pixels().all(|p| *p == Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn test_missing_directory_yields_empty_store() {
        let store = TileStore::load(
            "/nonexistent/tiles",
            "MapBack",
            Point::new(0, 0),
            BlockCoord::new(0, 0),
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_bounding_rect_is_union_of_tiles() {
        let store = store_with_tiles(&[
            (0, 0, [255, 0, 0, 255]),
            (2, 1, [0, 255, 0, 255]),
        ]);
        assert_eq!(
            store.bounding_rect(),
            Rect::new(0, 0, 3 * TILE_EDGE, 2 * TILE_EDGE)
        );
    }

    #[test]
    fn test_duplicate_insert_replaces() {
        let mut store = TileStore::new(Point::new(0, 0), BlockCoord::new(0, 0));
        store.insert(BlockCoord::new(0, 0), solid([1, 1, 1, 255]));
        store.insert(BlockCoord::new(0, 0), solid([2, 2, 2, 255]));
        assert_eq!(store.len(), 1);
        let tile = store.get(BlockCoord::new(0, 0)).unwrap();
        assert_eq!(tile.raster.get_pixel(0, 0), &Rgba([2, 2, 2, 255]));
    }

    #[test]
    fn test_insert_normalizes_unsized_rasters() {
        // Public inserts must uphold the tile-edge invariant themselves;
        // an unnormalized raster would otherwise break the compositor's
        // stride arithmetic
        let mut store = TileStore::new(Point::new(0, 0), BlockCoord::new(0, 0));
        store.insert(BlockCoord::new(0, 0), RgbaImage::from_pixel(64, 64, Rgba([5, 6, 7, 255])));
        let edge = TILE_EDGE as u32;
        let tile = store.get(BlockCoord::new(0, 0)).unwrap();
        assert_eq!(tile.raster.dimensions(), (edge, edge));
        let view = store.view_abs(Rect::new(TILE_EDGE - 10, TILE_EDGE - 10, 20, 20));
        assert_eq!(view.get_pixel(0, 0), &Rgba([5, 6, 7, 255]));
        assert_eq!(view.get_pixel(15, 15), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_origin_mapping() {
        // Logical zero = center of block (-1, 0), shifted by the map origin
        let store = TileStore::new(Point::new(232, 216), BlockCoord::new(-1, 0));
        let expected = Point::new(-TILE_EDGE + TILE_EDGE / 2 + 232, TILE_EDGE / 2 + 216);
        assert_eq!(store.origin_abs(), expected);
        assert_eq!(store.to_abs_point(Point::new(0, 0)), expected);
        assert_eq!(
            store.to_abs_rect(Rect::new(-10, -10, 20, 20)),
            Rect::new(expected.x - 10, expected.y - 10, 20, 20)
        );
    }

    #[test]
    fn test_find_tiles_abs_rejects_off_grid_queries() {
        let store = store_with_tiles(&[(0, 0, [1, 1, 1, 255])]);
        assert!(store
            .find_tiles_abs(Rect::new(100_000, 0, 2000, 2000))
            .is_empty());
    }

    #[test]
    fn test_find_tiles_abs_returns_intersecting() {
        let store = store_with_tiles(&[
            (0, 0, [1, 0, 0, 255]),
            (1, 0, [2, 0, 0, 255]),
            (3, 3, [3, 0, 0, 255]),
        ]);
        let hits = store.find_tiles_abs(Rect::new(TILE_EDGE - 10, 0, 20, 20));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_view_outside_bounding_is_zero_filled() {
        let store = store_with_tiles(&[(0, 0, [200, 0, 0, 255])]);
        let view = store.view_abs(Rect::new(100_000, 100_000, 64, 32));
        assert_eq!(view.dimensions(), (64, 32));
        assert!(view.pixels().all(|p| *p == Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn test_view_seam_between_adjacent_tiles() {
        let left = [255, 0, 0, 255];
        let right = [0, 0, 255, 255];
        let store = store_with_tiles(&[(0, 0, left), (1, 0, right)]);
        // 100-wide strip straddling the vertical seam at x = TILE_EDGE
        let view = store.view_abs(Rect::new(TILE_EDGE - 50, 0, 100, 10));
        for x in 0..50 {
            assert_eq!(view.get_pixel(x, 5), &Rgba(left), "x = {x}");
        }
        for x in 50..100 {
            assert_eq!(view.get_pixel(x, 5), &Rgba(right), "x = {x}");
        }
    }

    #[test]
    fn test_view_is_idempotent() {
        let store = store_with_tiles(&[(0, 0, [9, 8, 7, 255]), (0, 1, [6, 5, 4, 255])]);
        let rect = Rect::new(-100, -100, 300, 4300);
        assert_eq!(store.view_abs(rect).as_raw(), store.view_abs(rect).as_raw());
    }

    #[test]
    fn test_parallel_view_matches_sequential() {
        let store = store_with_tiles(&[
            (0, 0, [1, 0, 0, 255]),
            (1, 0, [0, 1, 0, 255]),
            (0, 1, [0, 0, 1, 255]),
            (1, 1, [1, 1, 1, 255]),
        ]);
        let rect = Rect::new(1000, 1000, TILE_EDGE, TILE_EDGE);
        assert_eq!(
            store.view_abs(rect).as_raw(),
            store.view_parallel_abs(rect).as_raw()
        );
    }

    #[test]
    fn test_logical_view_goes_through_origin_mapping() {
        let store = {
            let mut s = TileStore::new(Point::new(0, 0), BlockCoord::new(0, 0));
            s.insert(BlockCoord::new(0, 0), solid([42, 0, 0, 255]));
            s
        };
        // Logical (0,0) is the center of block (0,0)
        let view = store.view(Rect::new(0, 0, 4, 4));
        assert!(view.pixels().all(|p| *p == Rgba([42, 0, 0, 255])));
        // Logical query reaching past the tile's left edge is zero there
        let view = store.view(Rect::new(-TILE_EDGE, 0, 4, 4));
        assert!(view.pixels().all(|p| *p == Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn test_flood_matches_linear_scan_on_connected_set() {
        let store = store_with_tiles(&[
            (0, 0, [1, 0, 0, 255]),
            (1, 0, [2, 0, 0, 255]),
            (1, 1, [3, 0, 0, 255]),
            (2, 1, [4, 0, 0, 255]),
        ]);
        let rect = Rect::new(0, 0, 3 * TILE_EDGE, 2 * TILE_EDGE);
        let mut linear = store.find_tiles_abs(rect);
        let mut flood = store.find_tiles_flood_abs(rect);
        linear.sort_unstable();
        flood.sort_unstable();
        assert_eq!(linear, flood);
    }

    #[test]
    fn test_flood_seed_fallback_without_anchor_tile() {
        // Query anchored on a hole; the walk still finds the loaded pair
        let store = store_with_tiles(&[(1, 0, [1, 0, 0, 255]), (2, 0, [2, 0, 0, 255])]);
        let rect = Rect::new(10, 10, 3 * TILE_EDGE, 100);
        let mut flood = store.find_tiles_flood_abs(rect);
        flood.sort_unstable();
        assert_eq!(flood, vec![0, 1]);
    }

    #[test]
    fn test_flood_off_grid_is_empty() {
        let store = store_with_tiles(&[(0, 0, [1, 0, 0, 255])]);
        assert!(store
            .find_tiles_flood_abs(Rect::new(50_000, 50_000, 10, 10))
            .is_empty());
    }
}
