//! BNTX container parsing.
//!
//! ## Layout
//! ```text
//! [0x00] BNTX header  (0x20 bytes)
//! [0x20] NX section
//! [InfoPtrsOffset]
//!        Array of i64 pointers to BRTI records (TextureCount entries)
//! [...]  BRTI records, string pool, image data, relocation table
//! ```
//!
//! ## BNTX header
//! ```text
//! [0x00] Magic "BNTX"                  (4 bytes)
//! [0x0C] Byte order mark (FF FE = LE)  (2 bytes)
//! [0x10] File name pointer             (i64)
//! [0x1C] File size                     (u32)
//! ```
//!
//! ## NX section (at 0x20)
//! ```text
//! [0x00] Magic "NX  "                  (4 bytes)
//! [0x04] TextureCount                  (u32)
//! [0x08] InfoPtrsOffset                (i64)
//! [0x10] DataBlkOffset                 (i64)
//! ```
//!
//! ## BRTI (offsets relative to the record)
//! ```text
//! [0x00] Magic "BRTI"
//! [0x10] TileMode                      (u8)
//! [0x12] Flags                         (u16)
//! [0x14] Swizzle                       (u16)
//! [0x16] MipmapCount                   (u16)
//! [0x1C] Format                        (u32)
//! [0x24] Width                         (u32)
//! [0x28] Height                        (u32)
//! [0x34] BlockHeightLog2               (u32)
//! [0x50] ImageSize                     (u32)
//! [0x54] Alignment                     (u32)
//! [0x60] NamePointer                   (i64, u16 length-prefixed string)
//! [0x70] PtrsPointer                   (i64, first entry is the image data)
//! ```
//!
//! All pointers are absolute file offsets.

use nxtex_common::BinaryReader;
use nxtex_tegra::TileMode;

use crate::{Error, FormatDescriptor, Result, SkipReason, Texture, TextureInfo};

/// Smallest buffer that can hold the BNTX and NX headers.
pub const MIN_FILE_SIZE: usize = 0x100;

const MAGIC: &[u8; 4] = b"BNTX";
const NX_MAGIC: &[u8; 4] = b"NX  ";
const BRTI_MAGIC: &[u8; 4] = b"BRTI";
const LITTLE_ENDIAN_BOM: [u8; 2] = [0xFF, 0xFE];

const BOM_OFFSET: usize = 0x0C;
const FILE_NAME_OFFSET: usize = 0x10;
const FILE_SIZE_OFFSET: usize = 0x1C;
const NX_OFFSET: usize = 0x20;
const MAX_FILE_NAME_LEN: usize = 256;

mod brti {
    pub const TILE_MODE: usize = 0x10;
    pub const FLAGS: usize = 0x12;
    pub const SWIZZLE: usize = 0x14;
    pub const MIP_COUNT: usize = 0x16;
    pub const FORMAT: usize = 0x1C;
    pub const WIDTH: usize = 0x24;
    pub const HEIGHT: usize = 0x28;
    pub const BLOCK_HEIGHT_LOG2: usize = 0x34;
    pub const IMAGE_SIZE: usize = 0x50;
    pub const ALIGNMENT: usize = 0x54;
    pub const NAME_PTR: usize = 0x60;
    pub const PTRS_PTR: usize = 0x70;
}

/// A texture that could not be parsed.
#[derive(Debug)]
pub struct SkippedTexture {
    /// Index into the texture info pointer array.
    pub index: u32,
    /// Why the texture was skipped.
    pub reason: SkipReason,
}

/// Parsed BNTX texture container.
#[derive(Debug)]
pub struct Bntx {
    /// File name stored in the header, if it could be read.
    pub file_name: Option<String>,
    /// File size declared in the header. Not validated.
    pub file_size: u32,
    /// Number of textures declared in the NX section.
    pub texture_count: u32,
    /// Textures that parsed successfully, in container order.
    pub textures: Vec<Texture>,
    /// Textures that were skipped, in container order.
    pub skipped: Vec<SkippedTexture>,
}

impl Bntx {
    /// Parse a BNTX file held entirely in memory.
    ///
    /// Header problems fail the whole parse. Problems with an individual
    /// texture only skip that texture; they are recorded in
    /// [`Bntx::skipped`]. A valid container may yield no textures at all.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_FILE_SIZE {
            return Err(Error::TooSmall(data.len()));
        }

        let mut reader = BinaryReader::new(data);

        check_magic(reader.expect_magic_at(0, MAGIC), Error::InvalidMagic)?;

        let bom = read_array::<2>(&reader, BOM_OFFSET)?;
        if bom != LITTLE_ENDIAN_BOM {
            return Err(Error::UnsupportedEndianness(bom));
        }

        let file_name = resolve(reader.read_i64_at(FILE_NAME_OFFSET)?, data.len())
            .and_then(|offset| reader.read_cstring_at(offset, MAX_FILE_NAME_LEN).ok());
        let file_size = reader.read_u32_at(FILE_SIZE_OFFSET)?;

        reader.seek(NX_OFFSET);
        check_magic(reader.expect_magic(NX_MAGIC), Error::InvalidSubHeader)?;

        let texture_count = reader.read_u32()?;
        let info_ptrs = reader.read_i64()?;
        let _data_block = reader.read_i64()?;

        tracing::info!(
            file_name = file_name.as_deref().unwrap_or(""),
            file_size,
            texture_count,
            "parsed BNTX header"
        );

        let mut textures = Vec::new();
        let mut skipped = Vec::new();

        for index in 0..texture_count {
            match parse_texture(&reader, info_ptrs, index) {
                Ok(texture) => {
                    log_texture(index, &texture);
                    textures.push(texture);
                }
                Err(reason) => {
                    tracing::warn!(index, "skipping texture: {reason}");
                    skipped.push(SkippedTexture { index, reason });
                }
            }
        }

        Ok(Self {
            file_name,
            file_size,
            texture_count,
            textures,
            skipped,
        })
    }
}

/// Parse the texture at `index` of the info pointer array.
fn parse_texture(
    reader: &BinaryReader<'_>,
    info_ptrs: i64,
    index: u32,
) -> std::result::Result<Texture, SkipReason> {
    let slot = address(info_ptrs).saturating_add(index as usize * 8);
    let info_ptr = reader.read_i64_at(slot)?;
    let base =
        resolve(info_ptr, reader.len()).ok_or(SkipReason::InfoPointerOutOfRange(info_ptr))?;

    check_magic(
        reader.expect_magic_at(base, BRTI_MAGIC),
        SkipReason::InvalidTextureMagic,
    )?;

    let image_size = reader.read_u32_at(base + brti::IMAGE_SIZE)?;
    let name_ptr = reader.read_i64_at(base + brti::NAME_PTR)?;
    let ptrs_ptr = reader.read_i64_at(base + brti::PTRS_PTR)?;

    let info = TextureInfo {
        name: reader.read_prefixed_string_at(address(name_ptr))?,
        width: reader.read_u32_at(base + brti::WIDTH)?,
        height: reader.read_u32_at(base + brti::HEIGHT)?,
        raw_format: reader.read_u32_at(base + brti::FORMAT)?,
        tile_mode: TileMode::from(reader.read_u8_at(base + brti::TILE_MODE)?),
        flags: reader.read_u16_at(base + brti::FLAGS)?,
        swizzle: reader.read_u16_at(base + brti::SWIZZLE)?,
        mip_count: reader.read_u16_at(base + brti::MIP_COUNT)?,
        block_height_log2: reader.read_u32_at(base + brti::BLOCK_HEIGHT_LOG2)?,
        alignment: reader.read_u32_at(base + brti::ALIGNMENT)?,
        image_size,
    };

    let data_ptr = reader.read_i64_at(address(ptrs_ptr))?;
    let data = resolve_range(data_ptr, image_size as usize, reader.len())
        .and_then(|offset| reader.read_bytes_at(offset, image_size as usize).ok())
        .ok_or(SkipReason::DataPointerOutOfRange {
            pointer: data_ptr,
            size: image_size,
        })?;

    Texture::new(info, data.to_vec())
}

fn log_texture(index: u32, texture: &Texture) {
    let info = texture.info();
    let format = FormatDescriptor::from_raw(info.raw_format)
        .map(|f| f.name.to_string())
        .unwrap_or_else(|| format!("{:#x}", info.raw_format));

    tracing::debug!(
        index,
        name = info.name.as_str(),
        width = info.width,
        height = info.height,
        format = format.as_str(),
        tile_mode = %info.tile_mode,
        block_height = 1u64 << info.block_height_log2.min(63),
        image_size = info.image_size,
        "parsed texture"
    );
}

/// Convert a file pointer into an offset inside a buffer of `len` bytes.
fn resolve(pointer: i64, len: usize) -> Option<usize> {
    usize::try_from(pointer).ok().filter(|&offset| offset < len)
}

/// Like [`resolve`], but the whole `size`-byte range must fit.
fn resolve_range(pointer: i64, size: usize, len: usize) -> Option<usize> {
    let offset = usize::try_from(pointer).ok()?;
    (offset.checked_add(size)? <= len).then_some(offset)
}

/// Convert a file pointer into an offset for a checked read.
///
/// Negative pointers map to an offset no buffer can contain, so the read
/// reports them as out of range.
fn address(pointer: i64) -> usize {
    usize::try_from(pointer).unwrap_or(usize::MAX)
}

/// Turn a magic mismatch into `mismatch`, passing other read failures through.
fn check_magic<E>(
    result: nxtex_common::Result<()>,
    mismatch: impl FnOnce([u8; 4]) -> E,
) -> std::result::Result<(), E>
where
    E: From<nxtex_common::Error>,
{
    match result {
        Err(nxtex_common::Error::InvalidMagic { actual, .. }) => {
            Err(mismatch(actual.as_slice().try_into().unwrap_or_default()))
        }
        other => other.map_err(E::from),
    }
}

fn read_array<const N: usize>(
    reader: &BinaryReader<'_>,
    offset: usize,
) -> nxtex_common::Result<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(reader.read_bytes_at(offset, N)?);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{BntxBuilder, TextureSpec};

    #[test]
    fn test_parse_single_texture() {
        let data = BntxBuilder::new()
            .texture(TextureSpec::new("grass", 8, 8, 0x1c01, vec![0xAB; 64]))
            .build();

        let bntx = Bntx::parse(&data).unwrap();
        assert_eq!(bntx.file_name.as_deref(), Some("test"));
        assert_eq!(bntx.file_size, data.len() as u32);
        assert_eq!(bntx.texture_count, 1);
        assert!(bntx.skipped.is_empty());

        let texture = &bntx.textures[0];
        let info = texture.info();
        assert_eq!(info.name, "grass");
        assert_eq!((info.width, info.height), (8, 8));
        assert_eq!(info.raw_format, 0x1c01);
        assert_eq!(info.tile_mode, TileMode::BlockLinear);
        assert_eq!(info.mip_count, 1);
        assert_eq!(info.block_height_log2, 0);
        assert_eq!(info.alignment, 512);
        assert_eq!(texture.data(), &[0xAB; 64][..]);
    }

    #[test]
    fn test_unreadable_file_name_is_dropped() {
        let mut data = BntxBuilder::new()
            .texture(TextureSpec::new("grass", 4, 4, 0x1a01, vec![0; 8]))
            .build();

        for pointer in [-1i64, data.len() as i64, i64::MAX] {
            data[FILE_NAME_OFFSET..FILE_NAME_OFFSET + 8].copy_from_slice(&pointer.to_le_bytes());

            let bntx = Bntx::parse(&data).unwrap();
            assert_eq!(bntx.file_name, None);
            assert_eq!(bntx.textures.len(), 1);
            assert_eq!(bntx.textures[0].name(), "grass");
        }
    }

    #[test]
    fn test_negative_name_pointer_is_skipped() {
        let mut data = BntxBuilder::new()
            .texture(TextureSpec::new("a", 4, 4, 0x1a01, vec![1; 8]))
            .texture(TextureSpec::new("b", 4, 4, 0x1a01, vec![2; 8]))
            .build();
        let first = BinaryReader::new(&data)
            .read_i64_at(BntxBuilder::INFO_PTRS_OFFSET)
            .unwrap() as usize;
        let name_ptr = first + brti::NAME_PTR;
        data[name_ptr..name_ptr + 8].copy_from_slice(&(-16i64).to_le_bytes());

        let bntx = Bntx::parse(&data).unwrap();
        assert_eq!(bntx.textures.len(), 1);
        assert_eq!(bntx.textures[0].name(), "b");
        assert_eq!(bntx.skipped[0].index, 0);
        assert!(matches!(
            bntx.skipped[0].reason,
            SkipReason::Truncated(nxtex_common::Error::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_too_small() {
        let data = vec![0u8; MIN_FILE_SIZE - 1];
        assert!(matches!(Bntx::parse(&data), Err(Error::TooSmall(0xFF))));
    }

    #[test]
    fn test_invalid_magic() {
        let mut data = BntxBuilder::new().build();
        data[..4].copy_from_slice(b"FRES");
        assert!(matches!(Bntx::parse(&data), Err(Error::InvalidMagic(m)) if &m == b"FRES"));
    }

    #[test]
    fn test_big_endian_rejected() {
        let mut data = BntxBuilder::new().build();
        data[BOM_OFFSET..BOM_OFFSET + 2].copy_from_slice(&[0xFE, 0xFF]);
        assert!(matches!(
            Bntx::parse(&data),
            Err(Error::UnsupportedEndianness([0xFE, 0xFF]))
        ));
    }

    #[test]
    fn test_invalid_nx_header() {
        let mut data = BntxBuilder::new().build();
        data[NX_OFFSET..NX_OFFSET + 4].copy_from_slice(b"XN  ");
        assert!(matches!(Bntx::parse(&data), Err(Error::InvalidSubHeader(_))));
    }

    #[test]
    fn test_empty_container() {
        let data = BntxBuilder::new().build();
        let bntx = Bntx::parse(&data).unwrap();
        assert_eq!(bntx.texture_count, 0);
        assert!(bntx.textures.is_empty());
        assert!(bntx.skipped.is_empty());
    }

    #[test]
    fn test_bad_info_pointer_is_skipped() {
        let mut builder = BntxBuilder::new()
            .texture(TextureSpec::new("a", 4, 4, 0x1a01, vec![1; 8]))
            .texture(TextureSpec::new("b", 4, 4, 0x1a01, vec![2; 8]));
        builder.info_pointer_override = Some((0, -8));
        let data = builder.build();

        let bntx = Bntx::parse(&data).unwrap();
        assert_eq!(bntx.textures.len(), 1);
        assert_eq!(bntx.textures[0].name(), "b");
        assert_eq!(bntx.skipped[0].index, 0);
        assert!(matches!(
            bntx.skipped[0].reason,
            SkipReason::InfoPointerOutOfRange(-8)
        ));
    }

    #[test]
    fn test_bad_brti_magic_is_skipped() {
        let mut data = BntxBuilder::new()
            .texture(TextureSpec::new("a", 4, 4, 0x1a01, vec![1; 8]))
            .texture(TextureSpec::new("b", 4, 4, 0x1a01, vec![2; 8]))
            .build();
        let first = BinaryReader::new(&data)
            .read_i64_at(BntxBuilder::INFO_PTRS_OFFSET)
            .unwrap() as usize;
        data[first..first + 4].copy_from_slice(b"XXXX");

        let bntx = Bntx::parse(&data).unwrap();
        assert_eq!(bntx.textures.len(), 1);
        assert!(matches!(
            bntx.skipped[0].reason,
            SkipReason::InvalidTextureMagic(m) if &m == b"XXXX"
        ));
    }

    #[test]
    fn test_data_past_end_is_skipped() {
        let mut spec = TextureSpec::new("big", 4, 4, 0x1a01, vec![1; 8]);
        spec.declared_size = Some(0x10_0000);
        let data = BntxBuilder::new()
            .texture(spec)
            .texture(TextureSpec::new("ok", 4, 4, 0x1a01, vec![2; 8]))
            .build();

        let bntx = Bntx::parse(&data).unwrap();
        assert_eq!(bntx.textures.len(), 1);
        assert_eq!(bntx.textures[0].name(), "ok");
        assert!(matches!(
            bntx.skipped[0].reason,
            SkipReason::DataPointerOutOfRange { size: 0x10_0000, .. }
        ));
    }

    #[test]
    fn test_negative_data_pointer_is_skipped() {
        let mut spec = TextureSpec::new("neg", 4, 4, 0x1a01, vec![1; 8]);
        spec.data_pointer_override = Some(-1);
        let data = BntxBuilder::new().texture(spec).build();

        let bntx = Bntx::parse(&data).unwrap();
        assert!(bntx.textures.is_empty());
        assert!(matches!(
            bntx.skipped[0].reason,
            SkipReason::DataPointerOutOfRange { pointer: -1, .. }
        ));
    }

    #[test]
    fn test_texture_count_past_pointer_array() {
        let mut data = BntxBuilder::new()
            .texture(TextureSpec::new("a", 4, 4, 0x1a01, vec![1; 8]))
            .build();
        // Claim far more textures than the pointer array can hold.
        data[NX_OFFSET + 4..NX_OFFSET + 8].copy_from_slice(&100_000u32.to_le_bytes());

        let bntx = Bntx::parse(&data).unwrap();
        assert_eq!(bntx.textures.len(), 1);
        assert!(bntx
            .skipped
            .iter()
            .any(|s| matches!(s.reason, SkipReason::Truncated(_))));
    }
}
