//! Map item model.
//!
//! Items are point-like map markers (named positions) supplied by an
//! external dataset as a JSON array:
//!
//! ```json
//! [
//!   { "name": "Teleporter", "x": 232, "y": -4817 },
//!   { "name": "Chest", "x": -1204, "y": 96 }
//! ]
//! ```
//!
//! The library only consumes such a local file; producing it (scraping,
//! decompression, API auth) is someone else's job.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::geom::Point;
use crate::quadtree::Located;

/// A named point on the map, in logical map coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub x: i32,
    pub y: i32,
}

impl Item {
    /// Create a new item.
    pub fn new(name: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }
}

impl Located for Item {
    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Error loading an item file.
#[derive(Debug, Error)]
pub enum ItemError {
    /// The file could not be read.
    #[error("failed to read item file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a valid item JSON array.
    #[error("failed to parse item file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load an item collection from a JSON array file.
pub fn load_items(path: impl AsRef<Path>) -> Result<Vec<Item>, ItemError> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)?;
    let items: Vec<Item> = serde_json::from_str(&data)?;
    debug!(file = %path.display(), count = items.len(), "loaded items");
    Ok(items)
}
