//! Block-linear address translation and the deswizzle loop.

use crate::surface::{div_round_up, Surface, TileMode};

/// Width of a GOB in bytes.
pub const GOB_WIDTH: usize = 64;

/// Height of a GOB in rows.
pub const GOB_HEIGHT: usize = 8;

/// Size of a GOB in bytes.
pub const GOB_SIZE: usize = GOB_WIDTH * GOB_HEIGHT;

/// Byte offset of grid element `(x, y)` inside a block-linear surface.
///
/// `grid_width` is the surface width in elements and `block_height_gobs`
/// the number of GOBs stacked per block. The intra-GOB part follows the
/// Tegra X1 memory controller interleave:
///
/// ```text
/// bit  8     : x bit 5   (which 32-byte half of the GOB row)
/// bits 6..8  : y bits 1..3
/// bit  5     : x bit 4
/// bit  4     : y bit 0
/// bits 0..4  : x bits 0..4
/// ```
pub fn block_linear_offset(
    x: usize,
    y: usize,
    grid_width: usize,
    bytes_per_block: usize,
    block_height_gobs: usize,
) -> usize {
    let width_in_gobs = div_round_up(grid_width * bytes_per_block, GOB_WIDTH);
    let rows_per_block = GOB_HEIGHT * block_height_gobs;

    let gob_address = (y / rows_per_block) * GOB_SIZE * block_height_gobs * width_in_gobs
        + (x * bytes_per_block / GOB_WIDTH) * GOB_SIZE * block_height_gobs
        + (y % rows_per_block / GOB_HEIGHT) * GOB_SIZE;

    let x = x * bytes_per_block;

    gob_address
        + ((x % 64) / 32) * 256
        + ((y % 8) / 2) * 64
        + ((x % 32) / 16) * 32
        + (y % 2) * 16
        + (x % 16)
}

/// Convert a tiled surface into row-major order.
///
/// The returned buffer is `surface.surface_size()` bytes long; the first
/// `surface.linear_size()` bytes hold the image. Elements whose source or
/// destination falls outside `data` are left zeroed, so truncated payloads
/// never panic.
///
/// A surface too large to allocate (its size saturated, see [`Surface`])
/// yields an empty buffer.
pub fn deswizzle(surface: &Surface, data: &[u8]) -> Vec<u8> {
    let bytes_per_block = surface.bytes_per_block as usize;
    let grid_width = surface.grid_width();
    let grid_height = surface.grid_height();
    let pitch = surface.pitch();
    let block_height_gobs = surface.block_height_gobs();
    let surface_size = surface.surface_size();
    if surface_size > isize::MAX as usize {
        return Vec::new();
    }

    let mut output = vec![0u8; surface_size];
    if bytes_per_block == 0 {
        return output;
    }

    for y in 0..grid_height {
        for x in 0..grid_width {
            let src = match surface.tile_mode {
                TileMode::Linear => y * pitch + x * bytes_per_block,
                TileMode::BlockLinear => {
                    block_linear_offset(x, y, grid_width, bytes_per_block, block_height_gobs)
                }
            };
            let dst = (y * grid_width + x) * bytes_per_block;

            if src + bytes_per_block > surface_size || dst + bytes_per_block > data.len() {
                continue;
            }

            let (Some(from), Some(to)) = (
                data.get(src..src + bytes_per_block),
                output.get_mut(dst..dst + bytes_per_block),
            ) else {
                continue;
            };
            to.copy_from_slice(from);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_gob_interleave() {
        // 16 texels of 4 bytes: exactly one GOB wide.
        assert_eq!(block_linear_offset(0, 0, 16, 4, 1), 0);
        assert_eq!(block_linear_offset(1, 0, 16, 4, 1), 4);
        assert_eq!(block_linear_offset(4, 0, 16, 4, 1), 32);
        assert_eq!(block_linear_offset(8, 0, 16, 4, 1), 256);
        assert_eq!(block_linear_offset(0, 1, 16, 4, 1), 16);
        assert_eq!(block_linear_offset(0, 2, 16, 4, 1), 64);
        // Last texel of the GOB: x = 60 bytes, so its final byte is 511.
        assert_eq!(block_linear_offset(15, 7, 16, 4, 1), 508);
        assert_eq!(block_linear_offset(15, 7, 16, 4, 1) + 3, GOB_SIZE - 1);
    }

    #[test]
    fn test_gob_placement() {
        // Next GOB row of a one-GOB-tall block.
        assert_eq!(block_linear_offset(0, 8, 16, 4, 1), 512);
        // Two GOBs wide: the second column comes after the whole first block.
        assert_eq!(block_linear_offset(16, 0, 32, 4, 1), 512);
        assert_eq!(block_linear_offset(0, 8, 32, 4, 1), 1024);
        // Two-GOB blocks stack vertically before moving right.
        assert_eq!(block_linear_offset(0, 8, 16, 4, 2), 512);
        assert_eq!(block_linear_offset(0, 16, 16, 4, 2), 1024);
        assert_eq!(block_linear_offset(16, 0, 32, 4, 2), 1024);
    }

    #[test]
    fn test_gob_is_a_permutation() {
        let offsets: HashSet<usize> = (0..GOB_HEIGHT)
            .flat_map(|y| (0..GOB_WIDTH).map(move |x| block_linear_offset(x, y, 64, 1, 1)))
            .collect();
        assert_eq!(offsets.len(), GOB_SIZE);
        assert!(offsets.iter().all(|&o| o < GOB_SIZE));
    }

    #[test]
    fn test_deswizzle_block_linear() {
        let surface = Surface {
            width: 32,
            height: 16,
            block_width: 1,
            block_height: 1,
            bytes_per_block: 4,
            tile_mode: TileMode::BlockLinear,
            block_height_log2: 1,
            alignment: 512,
        };
        let (w, h) = (surface.grid_width(), surface.grid_height());

        let mut tiled = vec![0u8; surface.surface_size()];
        for y in 0..h {
            for x in 0..w {
                let at = block_linear_offset(x, y, w, 4, surface.block_height_gobs());
                tiled[at..at + 4].copy_from_slice(&((y * w + x) as u32).to_le_bytes());
            }
        }

        let mut linear = deswizzle(&surface, &tiled);
        linear.truncate(surface.linear_size());

        let expected: Vec<u8> = (0..(w * h) as u32).flat_map(u32::to_le_bytes).collect();
        assert_eq!(linear, expected);
    }

    #[test]
    fn test_deswizzle_linear_strips_padding() {
        let surface = Surface {
            width: 3,
            height: 2,
            block_width: 1,
            block_height: 1,
            bytes_per_block: 2,
            tile_mode: TileMode::Linear,
            block_height_log2: 0,
            alignment: 1,
        };
        let mut data = vec![0u8; 64];
        data[..6].copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        data[32..38].copy_from_slice(&[7, 8, 9, 10, 11, 12]);

        let linear = deswizzle(&surface, &data);
        assert_eq!(linear.len(), 64);
        assert_eq!(&linear[..12], &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_deswizzle_empty_payload() {
        let surface = Surface {
            width: 64,
            height: 64,
            block_width: 4,
            block_height: 4,
            bytes_per_block: 8,
            tile_mode: TileMode::BlockLinear,
            block_height_log2: 3,
            alignment: 512,
        };
        let linear = deswizzle(&surface, &[]);
        assert_eq!(linear.len(), surface.surface_size());
        assert!(linear.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_deswizzle_unallocatable_surface() {
        let surface = Surface {
            width: u32::MAX,
            height: u32::MAX,
            block_width: 1,
            block_height: 1,
            bytes_per_block: 16,
            tile_mode: TileMode::BlockLinear,
            block_height_log2: 5,
            alignment: 512,
        };
        assert_eq!(surface.surface_size(), usize::MAX);
        assert!(deswizzle(&surface, &[0xAB; 64]).is_empty());
    }
}
