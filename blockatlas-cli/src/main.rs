//! BlockAtlas CLI - Command-line interface
//!
//! This binary provides a command-line interface to the BlockAtlas
//! library: composite map views from a tile directory and run range
//! queries over a map item file.

mod commands;
mod error;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{query, stitch};

#[derive(Debug, Parser)]
#[command(
    name = "blockatlas",
    version,
    about = "Stitch seamless map views from sparse block tiles and query map markers"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Composite a map view from a tile directory and write it as PNG
    Stitch(stitch::StitchArgs),
    /// Find map items inside a rectangle using the quadtree index
    Query(query::QueryArgs),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Stitch(args) => stitch::run(args),
        Command::Query(args) => query::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
