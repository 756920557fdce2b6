//! Tile size normalization.
//!
//! Source images are published at varying resolutions (full 2048×2048
//! tiles, but also 1024 or 256 pixel previews). The store only ever
//! holds `TILE_EDGE`-sized rasters, so every decoded image passes
//! through [`normalize_tile`] before insertion.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use super::{NEAREST_THRESHOLD, TILE_EDGE};

/// Resample a decoded source image to the fixed tile edge length.
///
/// Images already at the target size are returned unchanged. Larger
/// sources (either dimension above [`NEAREST_THRESHOLD`]) are resampled
/// with nearest-neighbor, which keeps tile edges crisp; very small
/// sources use Catmull-Rom interpolation, where nearest-neighbor
/// blockiness would dominate.
pub fn normalize_tile(img: RgbaImage) -> RgbaImage {
    let edge = TILE_EDGE as u32;
    if img.width() == edge && img.height() == edge {
        return img;
    }
    let filter = if img.width() > NEAREST_THRESHOLD || img.height() > NEAREST_THRESHOLD {
        FilterType::Nearest
    } else {
        FilterType::CatmullRom
    };
    imageops::resize(&img, edge, edge, filter)
}
