//! Error types for nxtex-common.

use thiserror::Error;

/// Common error type for nxtex reads.
#[derive(Debug, Error)]
pub enum Error {
    /// A read would extend past the end of the buffer.
    #[error("read of {len} bytes at offset {offset:#x} exceeds buffer length {available:#x}")]
    OutOfRange {
        offset: usize,
        len: usize,
        available: usize,
    },

    /// Invalid magic bytes encountered.
    #[error("invalid magic: expected {expected:?}, got {actual:?}")]
    InvalidMagic {
        expected: Vec<u8>,
        actual: Vec<u8>,
    },
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
