//! CLI subcommand implementations.
//!
//! Each submodule exposes clap-derived argument types and a
//! `run(args) -> Result<(), CliError>` entry point.

pub mod query;
pub mod stitch;

use blockatlas::geom::{Point, Rect};

/// Parse a `"x,y"` pair into a point (clap value parser).
pub fn parse_point(s: &str) -> Result<Point, String> {
    let parts = parse_ints(s)?;
    match parts[..] {
        [x, y] => Ok(Point::new(x, y)),
        _ => Err(format!("expected \"x,y\", got \"{s}\"")),
    }
}

/// Parse a `"x,y,w,h"` quadruple into a rectangle (clap value parser).
pub fn parse_rect(s: &str) -> Result<Rect, String> {
    let parts = parse_ints(s)?;
    match parts[..] {
        [x, y, w, h] => Ok(Rect::new(x, y, w, h)),
        _ => Err(format!("expected \"x,y,w,h\", got \"{s}\"")),
    }
}

fn parse_ints(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<i32>()
                .map_err(|_| format!("invalid integer \"{}\"", part.trim()))
        })
        .collect()
}
