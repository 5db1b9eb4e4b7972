//! nxtex - Nintendo Switch texture conversion library.
//!
//! This crate provides a unified interface to the nxtex crates and the
//! BNTX to DDS conversion pipeline.
//!
//! # Crates
//!
//! - [`nxtex_common`] - Bounds-checked binary reading
//! - [`nxtex_tegra`] - Tegra X1 block-linear deswizzling
//! - [`nxtex_bntx`] - BNTX container parsing and the format table
//! - [`nxtex_dds`] - DDS header synthesis
//!
//! # Example
//!
//! ```no_run
//! use nxtex::prelude::*;
//!
//! let data = std::fs::read("textures.bntx")?;
//! let conversion = convert(&data, &ConvertOptions::default())?;
//!
//! for texture in &conversion.textures {
//!     std::fs::write(texture.file_name(), texture.to_bytes())?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Features
//!
//! - `parallel` - Convert the textures of a container with rayon

mod convert;
mod error;

pub use convert::{
    convert, convert_texture, Conversion, ConvertOptions, DdsTexture, SkippedConversion,
};
pub use error::{Error, Result};

// Re-export all sub-crates
pub use nxtex_bntx as bntx;
pub use nxtex_common as common;
pub use nxtex_dds as dds;
pub use nxtex_tegra as tegra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{convert, convert_texture, Conversion, ConvertOptions, DdsTexture};
    pub use nxtex_bntx::{Bntx, FormatDescriptor, SkipReason, Texture, TextureInfo};
    pub use nxtex_common::BinaryReader;
    pub use nxtex_dds::{DdsHeader, FourCC};
    pub use nxtex_tegra::{deswizzle, Surface, TileMode};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
