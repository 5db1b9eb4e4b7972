//! BNTX (Binary NX Texture) parser.
//!
//! BNTX is the Nintendo Switch GPU texture container. A file holds one or
//! more BRTI texture records, each pointing at a name in the string pool and
//! at its image data, which is usually stored block-linear (see
//! [`nxtex_tegra`]).
//!
//! This crate covers:
//!
//! - [`Bntx`] - The container parser, producing [`Texture`] records
//! - [`FormatDescriptor`] - The format table (block size, bytes per block, FourCC)
//! - [`SkipReason`] - Why an individual texture was left out
//!
//! Only little-endian files are supported, and only the base mip level of
//! each texture is extracted.
//!
//! # Example
//!
//! ```no_run
//! use nxtex_bntx::Bntx;
//!
//! let data = std::fs::read("textures.bntx")?;
//! let bntx = Bntx::parse(&data)?;
//!
//! for texture in &bntx.textures {
//!     let info = texture.info();
//!     println!("{}: {}x{} {:#06x}", info.name, info.width, info.height, info.raw_format);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod container;
mod error;
mod format;
mod texture;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use container::{Bntx, SkippedTexture, MIN_FILE_SIZE};
pub use error::{Error, Result, SkipReason};
pub use format::{format_code, FormatDescriptor, FORMATS};
pub use texture::{Texture, TextureInfo};
