//! BNTX to DDS conversion pipeline.
//!
//! Parsing, deswizzling and header synthesis happen here; reading and
//! writing files is left to the caller.

use nxtex_bntx::{Bntx, SkipReason, SkippedTexture, Texture};
use nxtex_dds::{DdsHeader, FourCC, DDS_FILE_HEADER_SIZE};
use nxtex_tegra::deswizzle;

use crate::{Error, Result};

/// Conversion settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// Skip formats without a DDS FourCC instead of writing them with a
    /// zeroed code.
    pub skip_unmapped_fourcc: bool,
}

/// One converted texture: DDS header plus row-major payload.
#[derive(Debug, Clone)]
pub struct DdsTexture {
    /// Texture name from the container.
    pub name: String,
    /// Magic and header.
    pub header: [u8; DDS_FILE_HEADER_SIZE],
    /// Deswizzled image data of the base level.
    pub payload: Vec<u8>,
}

impl DdsTexture {
    /// Output file name, `<name>.dds`.
    ///
    /// Path separators in the name are replaced so the file always lands
    /// directly in the output directory.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!("{stem}.dds")
    }

    /// The complete DDS file.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header.len() + self.payload.len());
        out.extend_from_slice(&self.header);
        out.extend_from_slice(&self.payload);
        out
    }
}

/// A parsed texture that produced no DDS output.
#[derive(Debug)]
pub struct SkippedConversion {
    /// Texture name.
    pub name: String,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Result of converting one container.
#[derive(Debug)]
pub struct Conversion {
    /// File name stored in the container header.
    pub file_name: Option<String>,
    /// Converted textures, in container order.
    pub textures: Vec<DdsTexture>,
    /// Textures the parser could not read.
    pub parse_skipped: Vec<SkippedTexture>,
    /// Textures that parsed but could not be converted.
    pub skipped: Vec<SkippedConversion>,
}

/// Convert every texture of a BNTX file held in memory.
///
/// Fails only when the container is unreadable or holds no parseable
/// texture ([`Error::NoTexturesFound`]). Individual textures that cannot be
/// converted are listed in [`Conversion::skipped`].
pub fn convert(data: &[u8], options: &ConvertOptions) -> Result<Conversion> {
    let bntx = Bntx::parse(data)?;
    if bntx.textures.is_empty() {
        return Err(Error::NoTexturesFound);
    }

    let mut textures = Vec::with_capacity(bntx.textures.len());
    let mut skipped = Vec::new();

    for (texture, result) in bntx.textures.iter().zip(convert_all(&bntx.textures, options)) {
        match result {
            Ok(dds) => textures.push(dds),
            Err(reason) => {
                tracing::warn!(name = texture.name(), "skipping texture: {reason}");
                skipped.push(SkippedConversion {
                    name: texture.name().to_string(),
                    reason,
                });
            }
        }
    }

    Ok(Conversion {
        file_name: bntx.file_name,
        textures,
        parse_skipped: bntx.skipped,
        skipped,
    })
}

#[cfg(feature = "parallel")]
fn convert_all(
    textures: &[Texture],
    options: &ConvertOptions,
) -> Vec<std::result::Result<DdsTexture, SkipReason>> {
    use rayon::prelude::*;

    textures
        .par_iter()
        .map(|texture| convert_texture(texture, options))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn convert_all(
    textures: &[Texture],
    options: &ConvertOptions,
) -> Vec<std::result::Result<DdsTexture, SkipReason>> {
    textures
        .iter()
        .map(|texture| convert_texture(texture, options))
        .collect()
}

/// Convert a single parsed texture.
pub fn convert_texture(
    texture: &Texture,
    options: &ConvertOptions,
) -> std::result::Result<DdsTexture, SkipReason> {
    let info = texture.info();
    let format = texture.format()?;

    let four_cc = format.four_cc.map(FourCC);
    if four_cc.is_none() {
        if options.skip_unmapped_fourcc {
            return Err(SkipReason::MissingFourCC(format.name));
        }
        tracing::warn!(
            name = texture.name(),
            format = format.name,
            "format has no DDS FourCC, writing a zeroed code"
        );
    }

    let surface = texture.surface(format);
    let too_large = SkipReason::SurfaceTooLarge {
        width: info.width,
        height: info.height,
    };
    if u32::try_from(surface.surface_size()).is_err() {
        return Err(too_large);
    }
    let linear_size = u32::try_from(surface.linear_size()).map_err(|_| too_large)?;

    tracing::debug!(
        name = texture.name(),
        format = format.name,
        linear_size,
        "converting texture"
    );

    let mut payload = deswizzle(&surface, texture.data());
    payload.truncate(surface.linear_size());

    let header = DdsHeader::new(info.width, info.height, linear_size, four_cc).to_bytes();

    Ok(DdsTexture {
        name: texture.name().to_string(),
        header,
        payload,
    })
}
