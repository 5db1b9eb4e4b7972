//! Tegra X1 block-linear deswizzling.
//!
//! The Switch GPU stores textures in GOBs (groups of bytes), tiles of
//! 64 bytes by 8 rows. GOBs are stacked vertically into blocks of
//! `2^block_height_log2` GOBs, and blocks are laid out left to right, then
//! top to bottom. This crate maps such a surface back into a plain
//! row-major image.
//!
//! Every element of the image grid is one compressed block (BCn, ASTC) or
//! one texel for uncompressed formats, `bytes_per_block` bytes wide.
//!
//! # Example
//!
//! ```
//! use nxtex_tegra::{deswizzle, Surface, TileMode};
//!
//! let surface = Surface {
//!     width: 8,
//!     height: 8,
//!     block_width: 4,
//!     block_height: 4,
//!     bytes_per_block: 16,
//!     tile_mode: TileMode::BlockLinear,
//!     block_height_log2: 0,
//!     alignment: 512,
//! };
//!
//! let tiled = vec![0u8; 512];
//! let mut linear = deswizzle(&surface, &tiled);
//! linear.truncate(surface.linear_size());
//! assert_eq!(linear.len(), 2 * 2 * 16);
//! ```

mod surface;
mod swizzle;

pub use surface::{div_round_up, round_up, Surface, TileMode};
pub use swizzle::{block_linear_offset, deswizzle, GOB_HEIGHT, GOB_SIZE, GOB_WIDTH};
