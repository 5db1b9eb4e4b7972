//! Error types for DDS handling.

use thiserror::Error;

/// Errors that can occur when reading DDS headers.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] nxtex_common::Error),

    /// Invalid DDS magic.
    #[error("invalid DDS magic: expected 'DDS ', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Invalid DDS header.
    #[error("invalid DDS header: {0}")]
    InvalidHeader(String),
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;
