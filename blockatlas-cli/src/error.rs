//! CLI error type.

use thiserror::Error;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The requested output image could not be encoded or written.
    #[error("failed to write output image: {0}")]
    Image(#[from] image::ImageError),

    /// The item file could not be loaded.
    #[error(transparent)]
    Items(#[from] blockatlas::item::ItemError),

    /// There is nothing to operate on.
    #[error("{0}")]
    EmptyInput(String),
}
