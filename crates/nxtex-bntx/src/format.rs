//! Texture format table.
//!
//! A BNTX format field packs the format type in bits 8 and up and the
//! channel interpretation (UNORM, SRGB, ...) in the low byte. Only the type
//! matters for layout, so the table is keyed by `raw_format >> 8`.

/// Layout and naming information for one texture format type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// Format type code (`raw_format >> 8`).
    pub code: u32,
    /// Human-readable name.
    pub name: &'static str,
    /// Bytes per compression block, or per texel for uncompressed formats.
    pub bytes_per_block: u32,
    /// Block width in texels.
    pub block_width: u32,
    /// Block height in texels.
    pub block_height: u32,
    /// Legacy DDS FourCC, if the format has one.
    pub four_cc: Option<[u8; 4]>,
}

impl FormatDescriptor {
    const fn uncompressed(code: u32, name: &'static str, bytes_per_block: u32) -> Self {
        Self {
            code,
            name,
            bytes_per_block,
            block_width: 1,
            block_height: 1,
            four_cc: None,
        }
    }

    const fn bcn(code: u32, name: &'static str, bytes_per_block: u32, four_cc: &[u8; 4]) -> Self {
        Self {
            code,
            name,
            bytes_per_block,
            block_width: 4,
            block_height: 4,
            four_cc: Some(*four_cc),
        }
    }

    const fn astc(code: u32, name: &'static str, block_width: u32, block_height: u32) -> Self {
        Self {
            code,
            name,
            bytes_per_block: 16,
            block_width,
            block_height,
            four_cc: None,
        }
    }

    /// Look up the descriptor for a raw BNTX format value.
    pub fn from_raw(raw_format: u32) -> Option<&'static Self> {
        Self::from_code(format_code(raw_format))
    }

    /// Look up the descriptor for a format type code.
    pub fn from_code(code: u32) -> Option<&'static Self> {
        FORMATS.iter().find(|f| f.code == code)
    }
}

/// Extract the format type code from a raw BNTX format value.
#[inline]
pub const fn format_code(raw_format: u32) -> u32 {
    raw_format >> 8
}

/// Every format type the converter understands.
pub static FORMATS: [FormatDescriptor; 25] = [
    FormatDescriptor::uncompressed(0x02, "R8_UNORM", 1),
    FormatDescriptor::uncompressed(0x07, "R5_G6_B5", 2),
    FormatDescriptor::uncompressed(0x09, "R8_G8", 2),
    FormatDescriptor::uncompressed(0x0b, "R8_G8_B8_A8", 4),
    FormatDescriptor::bcn(0x1a, "BC1", 8, b"DXT1"),
    FormatDescriptor::bcn(0x1b, "BC2", 16, b"DXT3"),
    FormatDescriptor::bcn(0x1c, "BC3", 16, b"DXT5"),
    FormatDescriptor::bcn(0x1d, "BC4", 8, b"ATI1"),
    FormatDescriptor::bcn(0x1e, "BC5", 16, b"ATI2"),
    FormatDescriptor::bcn(0x1f, "BC6H", 16, b"BC6H"),
    FormatDescriptor::bcn(0x20, "BC7", 16, b"BC7 "),
    FormatDescriptor::astc(0x2d, "ASTC4x4", 4, 4),
    FormatDescriptor::astc(0x2e, "ASTC5x4", 5, 4),
    FormatDescriptor::astc(0x2f, "ASTC5x5", 5, 5),
    FormatDescriptor::astc(0x30, "ASTC6x5", 6, 5),
    FormatDescriptor::astc(0x31, "ASTC6x6", 6, 6),
    FormatDescriptor::astc(0x32, "ASTC8x5", 8, 5),
    FormatDescriptor::astc(0x33, "ASTC8x6", 8, 6),
    FormatDescriptor::astc(0x34, "ASTC8x8", 8, 8),
    FormatDescriptor::astc(0x35, "ASTC10x5", 10, 5),
    FormatDescriptor::astc(0x36, "ASTC10x6", 10, 6),
    FormatDescriptor::astc(0x37, "ASTC10x8", 10, 8),
    FormatDescriptor::astc(0x38, "ASTC10x10", 10, 10),
    FormatDescriptor::astc(0x39, "ASTC12x10", 12, 10),
    FormatDescriptor::astc(0x3a, "ASTC12x12", 12, 12),
];
