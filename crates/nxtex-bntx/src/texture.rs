//! Texture records produced by the container parser.

use nxtex_tegra::{Surface, TileMode};

use crate::{FormatDescriptor, SkipReason};

/// Metadata decoded from one BRTI record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    /// Texture name.
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Raw format value; see [`crate::format_code`].
    pub raw_format: u32,
    /// Memory layout of the image data.
    pub tile_mode: TileMode,
    /// Record flags.
    pub flags: u16,
    /// Swizzle value.
    pub swizzle: u16,
    /// Number of mip levels. Only the base level is converted.
    pub mip_count: u16,
    /// Log2 of the number of GOBs per block.
    pub block_height_log2: u32,
    /// Alignment of the image data in bytes.
    pub alignment: u32,
    /// Declared size of the image data in bytes.
    pub image_size: u32,
}

/// A texture record together with its raw (still tiled) image data.
///
/// The payload length always equals [`TextureInfo::image_size`] and both
/// dimensions are non-zero.
#[derive(Debug, Clone)]
pub struct Texture {
    info: TextureInfo,
    data: Vec<u8>,
}

impl Texture {
    /// Create a texture, rejecting records that violate the invariants.
    pub fn new(info: TextureInfo, data: Vec<u8>) -> Result<Self, SkipReason> {
        if info.width == 0 || info.height == 0 {
            return Err(SkipReason::EmptyDimensions {
                width: info.width,
                height: info.height,
            });
        }

        if data.len() != info.image_size as usize {
            return Err(SkipReason::PayloadSizeMismatch {
                expected: info.image_size as usize,
                actual: data.len(),
            });
        }

        Ok(Self { info, data })
    }

    /// Get the record metadata.
    #[inline]
    pub fn info(&self) -> &TextureInfo {
        &self.info
    }

    /// Get the texture name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Get the raw image data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Resolve the texture format in the format table.
    pub fn format(&self) -> Result<&'static FormatDescriptor, SkipReason> {
        FormatDescriptor::from_raw(self.info.raw_format)
            .ok_or(SkipReason::UnsupportedFormat(self.info.raw_format))
    }

    /// Describe the base level as a surface laid out in `format`.
    pub fn surface(&self, format: &FormatDescriptor) -> Surface {
        Surface {
            width: self.info.width,
            height: self.info.height,
            block_width: format.block_width,
            block_height: format.block_height,
            bytes_per_block: format.bytes_per_block,
            tile_mode: self.info.tile_mode,
            block_height_log2: self.info.block_height_log2,
            alignment: self.info.alignment,
        }
    }
}
