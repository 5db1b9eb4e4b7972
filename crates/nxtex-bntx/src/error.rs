//! Error types for BNTX parsing.

use thiserror::Error;

/// Errors that make a whole container unreadable.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] nxtex_common::Error),

    /// The buffer cannot hold the fixed headers.
    #[error("file too small: {0} bytes, need at least 0x100")]
    TooSmall(usize),

    /// Invalid file magic.
    #[error("invalid BNTX magic: expected 'BNTX', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Byte order mark other than little-endian.
    #[error("unsupported byte order mark {0:02x?}: only little-endian files are supported")]
    UnsupportedEndianness([u8; 2]),

    /// The NX sub-header magic did not match.
    #[error("invalid NX header magic: expected 'NX  ', got {0:?}")]
    InvalidSubHeader([u8; 4]),
}

/// Why a single texture was left out of the result.
///
/// None of these stop the remaining textures from being processed.
#[derive(Debug, Error)]
pub enum SkipReason {
    /// The texture info pointer is negative or past the end of the file.
    #[error("texture info pointer {0:#x} is out of range")]
    InfoPointerOutOfRange(i64),

    /// The texture info record does not start with `BRTI`.
    #[error("invalid BRTI magic: got {0:?}")]
    InvalidTextureMagic([u8; 4]),

    /// The image data does not lie inside the file.
    #[error("image data at {pointer:#x} with size {size:#x} is out of range")]
    DataPointerOutOfRange { pointer: i64, size: u32 },

    /// Width or height is zero.
    #[error("texture has empty dimensions {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },

    /// The copied payload does not match the declared image size.
    #[error("payload size mismatch: expected {expected}, got {actual}")]
    PayloadSizeMismatch { expected: usize, actual: usize },

    /// A field of the texture record could not be read.
    #[error("truncated texture record: {0}")]
    Truncated(#[from] nxtex_common::Error),

    /// The decoded image would not fit a DDS linear size field.
    #[error("surface {width}x{height} is too large")]
    SurfaceTooLarge { width: u32, height: u32 },

    /// The format has no entry in the format table.
    #[error("unsupported format {0:#06x}")]
    UnsupportedFormat(u32),

    /// The format has no DDS FourCC and the caller asked to skip those.
    #[error("format {0} has no DDS FourCC")]
    MissingFourCC(&'static str),
}

/// Result type for BNTX operations.
pub type Result<T> = std::result::Result<T, Error>;
