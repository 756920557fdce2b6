//! `stitch` subcommand: composite tile views into PNG files.

use std::path::PathBuf;

use clap::Args;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::info;

use blockatlas::geom::{Point, Rect};
use blockatlas::tile::{BlockCoord, TileStore};

use crate::commands::{parse_point, parse_rect};
use crate::error::CliError;

/// Arguments for the `stitch` subcommand.
#[derive(Debug, Args)]
pub struct StitchArgs {
    /// Directory containing UI_<map>_<bx>_<by>.png tiles
    #[arg(long)]
    pub map_dir: PathBuf,

    /// Map name embedded in the tile filenames
    #[arg(long)]
    pub map_name: String,

    /// Map origin offset relative to the origin tile center, as "x,y"
    #[arg(long, default_value = "0,0", value_parser = parse_point)]
    pub map_origin: Point,

    /// Block coordinate of the origin tile, as "bx,by"
    #[arg(long, default_value = "0,0", value_parser = parse_point)]
    pub origin_block: Point,

    /// Sub-rectangle "x,y,w,h" to composite; the whole map when omitted
    #[arg(long, value_parser = parse_rect)]
    pub rect: Option<Rect>,

    /// Treat --rect as absolute tile-grid coordinates instead of logical
    #[arg(long)]
    pub abs: bool,

    /// Nearest-neighbor scale factor applied to the output (e.g. 0.25
    /// for a minimap)
    #[arg(long)]
    pub scale: Option<f64>,

    /// Output PNG path
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Run the `stitch` subcommand.
pub fn run(args: StitchArgs) -> Result<(), CliError> {
    let origin_block = BlockCoord::new(args.origin_block.x, args.origin_block.y);
    let store = TileStore::load(&args.map_dir, &args.map_name, args.map_origin, origin_block);
    info!(tiles = store.len(), bounding = ?store.bounding_rect(), "store ready");

    let view = match (args.rect, args.abs) {
        (None, _) => store.view_full(),
        (Some(rect), false) => store.view_parallel(rect),
        (Some(rect), true) => store.view_parallel_abs(rect),
    };

    let output = match args.scale {
        Some(factor) if factor > 0.0 && factor != 1.0 => scale_view(&view, factor),
        _ => view,
    };

    output.save(&args.output)?;
    println!(
        "wrote {} ({}x{})",
        args.output.display(),
        output.width(),
        output.height()
    );
    Ok(())
}

/// Resample a composited view by a uniform factor, nearest-neighbor.
fn scale_view(view: &RgbaImage, factor: f64) -> RgbaImage {
    let w = ((view.width() as f64 * factor).round() as u32).max(1);
    let h = ((view.height() as f64 * factor).round() as u32).max(1);
    imageops::resize(view, w, h, FilterType::Nearest)
}
