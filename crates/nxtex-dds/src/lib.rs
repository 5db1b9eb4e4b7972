//! Legacy DDS header synthesis.
//!
//! Builds the 128-byte `"DDS "` + `DDS_HEADER` prefix for a single-level,
//! block-compressed 2D texture. No DX10 extension header, mip chain, cube
//! map or array flags are written.
//!
//! # Example
//!
//! ```
//! use nxtex_dds::{DdsHeader, FourCC};
//!
//! let header = DdsHeader::new(256, 256, 65536, Some(FourCC::DXT5));
//! let bytes = header.to_bytes();
//!
//! assert_eq!(&bytes[..4], b"DDS ");
//! assert_eq!(&bytes[84..88], b"DXT5");
//! ```

mod error;
mod header;

pub use error::{Error, Result};
pub use header::{caps, flags, pixel_format_flags, DdsHeader, DdsPixelFormat, FourCC};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";

/// Size of the magic plus header in bytes.
pub const DDS_FILE_HEADER_SIZE: usize = 128;
