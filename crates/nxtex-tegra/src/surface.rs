//! Surface geometry: grid dimensions, pitch and padded sizes.

/// Memory layout of a texture surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileMode {
    /// Row-major rows padded to a 32-byte pitch.
    Linear,
    /// GOB-tiled block-linear layout.
    BlockLinear,
}

impl From<u8> for TileMode {
    /// Zero is linear; any other value selects block-linear.
    fn from(value: u8) -> Self {
        if value == 0 {
            TileMode::Linear
        } else {
            TileMode::BlockLinear
        }
    }
}

impl std::fmt::Display for TileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileMode::Linear => f.pad("LINEAR"),
            TileMode::BlockLinear => f.pad("BLOCK_LINEAR"),
        }
    }
}

/// Largest supported `block_height_log2` (32 GOBs per block).
const MAX_BLOCK_HEIGHT_LOG2: u32 = 5;

/// Description of a single surface to deswizzle.
///
/// `width` and `height` are in pixels; `block_width` and `block_height` are
/// the format's compression block dimensions (1 for uncompressed formats).
/// Size computations saturate at `usize::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    pub block_width: u32,
    pub block_height: u32,
    pub bytes_per_block: u32,
    pub tile_mode: TileMode,
    pub block_height_log2: u32,
    pub alignment: u32,
}

impl Surface {
    /// Width of the surface in blocks.
    #[inline]
    pub fn grid_width(&self) -> usize {
        div_round_up(self.width as usize, self.block_width.max(1) as usize)
    }

    /// Height of the surface in blocks.
    #[inline]
    pub fn grid_height(&self) -> usize {
        div_round_up(self.height as usize, self.block_height.max(1) as usize)
    }

    /// Number of GOBs stacked in one block.
    #[inline]
    pub fn block_height_gobs(&self) -> usize {
        1 << self.block_height_log2.min(MAX_BLOCK_HEIGHT_LOG2)
    }

    /// Padded byte stride of one row of blocks in the source layout.
    pub fn pitch(&self) -> usize {
        let row = self.grid_width().saturating_mul(self.bytes_per_block as usize);
        match self.tile_mode {
            TileMode::Linear => round_up(row, 32),
            TileMode::BlockLinear => round_up(row, crate::GOB_WIDTH),
        }
    }

    /// Total padded size of the source surface in bytes.
    pub fn surface_size(&self) -> usize {
        let rows = match self.tile_mode {
            TileMode::Linear => self.grid_height(),
            TileMode::BlockLinear => round_up(
                self.grid_height(),
                self.block_height_gobs() * crate::GOB_HEIGHT,
            ),
        };
        round_up(self.pitch().saturating_mul(rows), self.alignment as usize)
    }

    /// Exact size of the unpadded row-major image in bytes.
    #[inline]
    pub fn linear_size(&self) -> usize {
        self.grid_width()
            .saturating_mul(self.grid_height())
            .saturating_mul(self.bytes_per_block as usize)
    }
}

/// Integer division rounding towards positive infinity.
#[inline]
pub fn div_round_up(n: usize, d: usize) -> usize {
    n.div_ceil(d)
}

/// Round `x` up to the next multiple of `align`.
///
/// An alignment of 0 or 1 leaves `x` unchanged.
#[inline]
pub fn round_up(x: usize, align: usize) -> usize {
    if align <= 1 {
        x
    } else {
        x.div_ceil(align).saturating_mul(align)
    }
}
