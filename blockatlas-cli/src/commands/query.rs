//! `query` subcommand: range queries over a map item file.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use blockatlas::geom::Rect;
use blockatlas::item::{load_items, Item};
use blockatlas::quadtree::{Located, QuadTree};

use crate::commands::parse_rect;
use crate::error::CliError;

/// Arguments for the `query` subcommand.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// JSON file with the item collection
    #[arg(long)]
    pub items: PathBuf,

    /// Bounding rectangle "x,y,w,h" for the index; computed from the
    /// items when omitted
    #[arg(long, value_parser = parse_rect)]
    pub bounds: Option<Rect>,

    /// Query rectangle "x,y,w,h"
    #[arg(long, value_parser = parse_rect)]
    pub rect: Rect,
}

/// Run the `query` subcommand.
pub fn run(args: QueryArgs) -> Result<(), CliError> {
    let items = load_items(&args.items)?;
    if items.is_empty() {
        return Err(CliError::EmptyInput(format!(
            "no items in {}",
            args.items.display()
        )));
    }

    let bounds = args.bounds.unwrap_or_else(|| item_bounds(&items));
    info!(count = items.len(), ?bounds, "building item index");

    let tree = QuadTree::build(bounds, &items);
    tree.print();

    let hits = tree.find(args.rect);
    for item in &hits {
        println!("{} @ ({}, {})", item.name, item.x, item.y);
    }
    println!("{} item(s) in {:?}", hits.len(), args.rect);
    Ok(())
}

/// Smallest rectangle containing every item position.
fn item_bounds(items: &[Item]) -> Rect {
    items.iter().fold(Rect::EMPTY, |acc, item| {
        let p = item.position();
        acc.union(&Rect::new(p.x, p.y, 1, 1))
    })
}
