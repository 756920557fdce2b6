//! Tile filename parsing.
//!
//! Tile files follow the convention `UI_<map>_<bx>_<by>.png`, where the
//! block coordinates are signed integers:
//!
//! - `UI_MapBack_0_0.png` (block (0, 0))
//! - `UI_MapBack_-1_2.png` (block (-1, 2))
//!
//! Files in the tile directory that do not match the pattern for the
//! requested map name are ignored by the loader.

use regex::Regex;
use thiserror::Error;

use super::{BlockCoord, MAX_BLOCK_COORD};

/// Error parsing a tile filename.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Filename doesn't match the `UI_<map>_<bx>_<by>.png` pattern.
    #[error("filename doesn't match tile pattern")]
    InvalidPattern,
    /// A block coordinate is outside the representable grid
    /// (see [`MAX_BLOCK_COORD`]).
    #[error("invalid block coordinate: {0}")]
    InvalidCoordinate(String),
}

/// Compiled filename pattern for one map.
///
/// The pattern depends on the map name, so it is compiled once per
/// [`TileStore`](super::TileStore) construction rather than cached in a
/// global.
#[derive(Debug, Clone)]
pub struct TileNamePattern {
    regex: Regex,
}

impl TileNamePattern {
    /// Compile the pattern for the given map name.
    ///
    /// The map name is taken literally; regex metacharacters in it are
    /// escaped.
    pub fn new(map_name: &str) -> Self {
        // (-?\d+) - signed block coordinate, twice
        let pattern = format!(r"^UI_{}_(-?\d+)_(-?\d+)\.png$", regex::escape(map_name));
        let regex = Regex::new(&pattern).expect("tile filename pattern is valid");
        Self { regex }
    }

    /// Parse a filename into its block coordinate.
    ///
    /// # Arguments
    ///
    /// * `filename` - Bare filename, e.g. `UI_MapBack_-1_0.png`
    ///
    /// # Errors
    ///
    /// [`ParseError::InvalidPattern`] if the name doesn't match this
    /// map's pattern, [`ParseError::InvalidCoordinate`] if a coordinate
    /// doesn't fit on the representable grid.
    pub fn parse(&self, filename: &str) -> Result<BlockCoord, ParseError> {
        let captures = self
            .regex
            .captures(filename)
            .ok_or(ParseError::InvalidPattern)?;

        let bx = parse_coord(captures.get(1).expect("group 1 always present").as_str())?;
        let by = parse_coord(captures.get(2).expect("group 2 always present").as_str())?;

        Ok(BlockCoord::new(bx, by))
    }
}

/// Parse one block coordinate, bounding it so that the block's placement
/// rectangle (including its far edge) stays inside `i32` pixel space.
fn parse_coord(s: &str) -> Result<i32, ParseError> {
    let value = s
        .parse::<i32>()
        .map_err(|_| ParseError::InvalidCoordinate(s.to_string()))?;
    if value > MAX_BLOCK_COORD || value < -MAX_BLOCK_COORD {
        return Err(ParseError::InvalidCoordinate(s.to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_coordinates() {
        let pattern = TileNamePattern::new("MapBack");
        let block = pattern.parse("UI_MapBack_1_2.png").unwrap();
        assert_eq!(block, BlockCoord::new(1, 2));
    }

    #[test]
    fn test_parse_negative_coordinates() {
        let pattern = TileNamePattern::new("MapBack");
        let block = pattern.parse("UI_MapBack_-1_0.png").unwrap();
        assert_eq!(block, BlockCoord::new(-1, 0));
        let block = pattern.parse("UI_MapBack_-3_-7.png").unwrap();
        assert_eq!(block, BlockCoord::new(-3, -7));
    }

    #[test]
    fn test_wrong_map_name_rejected() {
        let pattern = TileNamePattern::new("MapBack");
        assert_eq!(
            pattern.parse("UI_OtherMap_0_0.png"),
            Err(ParseError::InvalidPattern)
        );
    }

    #[test]
    fn test_non_tile_files_rejected() {
        let pattern = TileNamePattern::new("MapBack");
        for name in [
            "readme.txt",
            "UI_MapBack_0_0.jpg",
            "UI_MapBack_0.png",
            "UI_MapBack_a_b.png",
            "xUI_MapBack_0_0.png",
            "UI_MapBack_0_0.png.bak",
        ] {
            assert_eq!(pattern.parse(name), Err(ParseError::InvalidPattern), "{name}");
        }
    }

    #[test]
    fn test_coordinate_overflow_rejected() {
        let pattern = TileNamePattern::new("MapBack");
        let result = pattern.parse("UI_MapBack_99999999999_0.png");
        assert!(matches!(result, Err(ParseError::InvalidCoordinate(_))));
    }

    #[test]
    fn test_coordinate_beyond_grid_rejected() {
        // Fits in i32, but its placement rect would overflow pixel space
        let pattern = TileNamePattern::new("MapBack");
        for name in [
            "UI_MapBack_2000000_0.png",
            "UI_MapBack_0_2000000.png",
            "UI_MapBack_-2000000_0.png",
        ] {
            let result = pattern.parse(name);
            assert!(
                matches!(result, Err(ParseError::InvalidCoordinate(_))),
                "{name}"
            );
        }
    }

    #[test]
    fn test_outermost_grid_coordinates_accepted() {
        let pattern = TileNamePattern::new("MapBack");
        let name = format!("UI_MapBack_{MAX_BLOCK_COORD}_-{MAX_BLOCK_COORD}.png");
        let block = pattern.parse(&name).unwrap();
        assert_eq!(block, BlockCoord::new(MAX_BLOCK_COORD, -MAX_BLOCK_COORD));
    }

    #[test]
    fn test_map_name_with_metacharacters() {
        // Map names are matched literally, not as regex
        let pattern = TileNamePattern::new("Map.Back");
        assert!(pattern.parse("UI_Map.Back_0_0.png").is_ok());
        assert_eq!(
            pattern.parse("UI_MapxBack_0_0.png"),
            Err(ParseError::InvalidPattern)
        );
    }
}
