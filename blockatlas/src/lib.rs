//! BlockAtlas - seamless raster views over sparse block-tile maps.
//!
//! Large 2D maps are published as a sparse set of fixed-size PNG tiles
//! on a uniform grid. This library loads such a tile set once, places
//! every tile into a single absolute coordinate space, and then answers
//! two kinds of rectangular queries without ever touching the whole map:
//!
//! - **Pixels**: [`tile::TileStore`] composites any query rectangle into
//!   a correctly-sized RGBA buffer, sequentially or with one task per
//!   intersecting tile.
//! - **Items**: [`quadtree::QuadTree`] indexes point-like map markers so
//!   all items inside a rectangle are found by descending only into
//!   overlapping regions.
//!
//! A typical application composites a view and draws the quadtree's
//! query results on top of it; the two subsystems share only the
//! coordinate space and never mutate each other.

pub mod geom;
pub mod item;
pub mod quadtree;
pub mod tile;

mod compose;
