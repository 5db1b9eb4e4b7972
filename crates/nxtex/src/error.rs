//! Error types for conversion.

use thiserror::Error;

/// Errors that stop a whole conversion.
#[derive(Debug, Error)]
pub enum Error {
    /// The container itself could not be parsed.
    #[error("{0}")]
    Bntx(#[from] nxtex_bntx::Error),

    /// The container is valid but yielded no textures.
    #[error("no textures found in file")]
    NoTexturesFound,
}

/// Result type for conversion.
pub type Result<T> = std::result::Result<T, Error>;
