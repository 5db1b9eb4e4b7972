use nxtex_tegra::{deswizzle, Surface, TileMode};
use proptest::prelude::*;

fn surface_strategy() -> impl Strategy<Value = Surface> {
    (
        1u32..96,
        1u32..96,
        prop::sample::select(vec![(1u32, 1u32), (4, 4), (5, 4), (8, 8), (12, 12)]),
        prop::sample::select(vec![1u32, 2, 4, 8, 16]),
        any::<bool>(),
        0u32..6,
        prop::sample::select(vec![0u32, 1, 32, 512, 4096]),
    )
        .prop_map(
            |(width, height, (block_width, block_height), bytes_per_block, tiled, log2, alignment)| {
                Surface {
                    width,
                    height,
                    block_width,
                    block_height,
                    bytes_per_block,
                    tile_mode: if tiled {
                        TileMode::BlockLinear
                    } else {
                        TileMode::Linear
                    },
                    block_height_log2: log2,
                    alignment,
                }
            },
        )
}

fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
        .collect()
}

proptest! {
    #[test]
    fn linear_mode_strips_row_padding(
        grid_width in 1u32..48,
        grid_height in 1u32..24,
        bytes_per_block in prop::sample::select(vec![1u32, 2, 3, 4, 8, 16]),
        seed in any::<u8>(),
    ) {
        let surface = Surface {
            width: grid_width,
            height: grid_height,
            block_width: 1,
            block_height: 1,
            bytes_per_block,
            tile_mode: TileMode::Linear,
            block_height_log2: 0,
            alignment: 1,
        };
        let pitch = surface.pitch();
        let row = (grid_width * bytes_per_block) as usize;
        let data = pattern(pitch * grid_height as usize, seed);

        let mut output = deswizzle(&surface, &data);
        output.truncate(surface.linear_size());

        let expected: Vec<u8> = data
            .chunks(pitch)
            .flat_map(|padded| padded[..row].iter().copied())
            .collect();
        prop_assert_eq!(output, expected);
    }

    #[test]
    fn deswizzle_is_deterministic(surface in surface_strategy(), seed in any::<u8>()) {
        let data = pattern(surface.surface_size(), seed);
        prop_assert_eq!(deswizzle(&surface, &data), deswizzle(&surface, &data));
    }

    #[test]
    fn truncated_payload_leaves_zeroes(
        surface in surface_strategy(),
        keep in 0.0f64..1.0,
    ) {
        let full = pattern(surface.surface_size(), 0x5A);
        let truncated = &full[..(full.len() as f64 * keep) as usize];

        let output = deswizzle(&surface, truncated);
        prop_assert_eq!(output.len(), surface.surface_size());

        let bytes_per_block = surface.bytes_per_block as usize;
        let first_missing = truncated.len() / bytes_per_block * bytes_per_block;
        let linear_size = surface.linear_size();
        if first_missing < linear_size {
            prop_assert!(output[first_missing..linear_size].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn surface_is_never_smaller_than_image(surface in surface_strategy()) {
        prop_assert!(surface.surface_size() >= surface.linear_size());
        prop_assert!(deswizzle(&surface, &[]).len() >= surface.linear_size());
    }
}
