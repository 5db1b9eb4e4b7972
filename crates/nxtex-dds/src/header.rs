//! DDS header structures.

use nxtex_common::BinaryReader;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result, DDS_FILE_HEADER_SIZE, DDS_MAGIC};

/// `DDS_HEADER::dwFlags` bits.
pub mod flags {
    pub const CAPS: u32 = 0x1;
    pub const HEIGHT: u32 = 0x2;
    pub const WIDTH: u32 = 0x4;
    pub const PIXEL_FORMAT: u32 = 0x1000;
    pub const LINEAR_SIZE: u32 = 0x80000;
}

/// `DDS_PIXELFORMAT::dwFlags` bits.
pub mod pixel_format_flags {
    pub const FOUR_CC: u32 = 0x4;
}

/// `DDS_HEADER::dwCaps` bits.
pub mod caps {
    pub const TEXTURE: u32 = 0x1000;
}

/// DDS file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeader {
    /// Header size (should be 124).
    pub size: u32,
    /// Header flags.
    pub flags: u32,
    /// Image height.
    pub height: u32,
    /// Image width.
    pub width: u32,
    /// Pitch or linear size.
    pub pitch_or_linear_size: u32,
    /// Depth (for volume textures).
    pub depth: u32,
    /// Number of mipmap levels.
    pub mipmap_count: u32,
    /// Reserved.
    pub reserved1: [u32; 11],
    /// Pixel format.
    pub pixel_format: DdsPixelFormat,
    /// Surface capabilities.
    pub caps: u32,
    /// Surface capabilities 2.
    pub caps2: u32,
    /// Surface capabilities 3.
    pub caps3: u32,
    /// Surface capabilities 4.
    pub caps4: u32,
    /// Reserved.
    pub reserved2: u32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;

    /// Header for a single-level texture whose base level is `linear_size`
    /// bytes long.
    ///
    /// A missing FourCC leaves the code zeroed while still setting the
    /// FourCC pixel format flag.
    pub fn new(width: u32, height: u32, linear_size: u32, four_cc: Option<FourCC>) -> Self {
        Self {
            size: Self::SIZE,
            flags: flags::CAPS
                | flags::HEIGHT
                | flags::WIDTH
                | flags::PIXEL_FORMAT
                | flags::LINEAR_SIZE,
            height,
            width,
            pitch_or_linear_size: linear_size,
            depth: 0,
            mipmap_count: 1,
            reserved1: [0; 11],
            pixel_format: DdsPixelFormat {
                size: DdsPixelFormat::SIZE,
                flags: pixel_format_flags::FOUR_CC,
                four_cc: four_cc.unwrap_or(FourCC::NONE),
                rgb_bit_count: 0,
                r_bit_mask: 0,
                g_bit_mask: 0,
                b_bit_mask: 0,
                a_bit_mask: 0,
            },
            caps: caps::TEXTURE,
            caps2: 0,
            caps3: 0,
            caps4: 0,
            reserved2: 0,
        }
    }

    /// Serialize the magic and header.
    pub fn to_bytes(&self) -> [u8; DDS_FILE_HEADER_SIZE] {
        let mut out = [0u8; DDS_FILE_HEADER_SIZE];
        out[..4].copy_from_slice(DDS_MAGIC);
        out[4..].copy_from_slice(self.as_bytes());
        out
    }

    /// Read the magic and header from the start of a DDS file.
    pub fn read(data: &[u8]) -> Result<Self> {
        let reader = BinaryReader::new(data);

        let magic = reader.read_bytes_at(0, DDS_MAGIC.len())?;
        if magic != DDS_MAGIC {
            let mut actual = [0u8; 4];
            actual.copy_from_slice(magic);
            return Err(Error::InvalidMagic(actual));
        }

        let bytes = reader.read_bytes_at(DDS_MAGIC.len(), Self::SIZE as usize)?;
        let header = Self::read_from_bytes(bytes)
            .map_err(|_| Error::InvalidHeader("header size mismatch".into()))?;

        let size = header.size;
        if size != Self::SIZE {
            return Err(Error::InvalidHeader(format!(
                "header size {size}, expected {}",
                Self::SIZE
            )));
        }

        Ok(header)
    }

    /// The FourCC code, unless it is zeroed.
    pub fn four_cc(&self) -> Option<FourCC> {
        let four_cc = self.pixel_format.four_cc;
        (four_cc != FourCC::NONE).then_some(four_cc)
    }
}

/// DDS pixel format.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsPixelFormat {
    /// Structure size (should be 32).
    pub size: u32,
    /// Pixel format flags.
    pub flags: u32,
    /// Four-character code for compression.
    pub four_cc: FourCC,
    /// Number of bits per pixel (for uncompressed).
    pub rgb_bit_count: u32,
    /// Red bit mask.
    pub r_bit_mask: u32,
    /// Green bit mask.
    pub g_bit_mask: u32,
    /// Blue bit mask.
    pub b_bit_mask: u32,
    /// Alpha bit mask.
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    /// Expected structure size.
    pub const SIZE: u32 = 32;
}

/// Four-character code for compression type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// Zeroed code.
    pub const NONE: Self = Self([0; 4]);
    /// BC3 compression.
    pub const DXT5: Self = Self(*b"DXT5");
    /// BC7 compression.
    pub const BC7: Self = Self(*b"BC7 ");
}

impl std::fmt::Display for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_layout_sizes() {
        assert_eq!(std::mem::size_of::<DdsHeader>(), DdsHeader::SIZE as usize);
        assert_eq!(std::mem::size_of::<DdsPixelFormat>(), DdsPixelFormat::SIZE as usize);
    }

    #[test]
    fn test_bc3_header_bytes() {
        let bytes = DdsHeader::new(256, 256, 65536, Some(FourCC::DXT5)).to_bytes();

        assert_eq!(&bytes[0..4], b"DDS ");
        assert_eq!(u32_at(&bytes, 4), 124);
        assert_eq!(u32_at(&bytes, 8), 0x1 | 0x2 | 0x4 | 0x1000 | 0x80000);
        assert_eq!(u32_at(&bytes, 12), 256);
        assert_eq!(u32_at(&bytes, 16), 256);
        assert_eq!(u32_at(&bytes, 20), 65536);
        assert_eq!(u32_at(&bytes, 24), 0);
        assert_eq!(u32_at(&bytes, 28), 1);
        assert_eq!(u32_at(&bytes, 76), 32);
        assert_eq!(u32_at(&bytes, 80), 0x4);
        assert_eq!(&bytes[84..88], b"DXT5");
        assert_eq!(u32_at(&bytes, 108), 0x1000);

        // Everything else is zero.
        assert!(bytes[32..76].iter().all(|&b| b == 0));
        assert!(bytes[88..108].iter().all(|&b| b == 0));
        assert!(bytes[112..128].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_missing_four_cc_is_zeroed() {
        let bytes = DdsHeader::new(64, 32, 8192, None).to_bytes();
        assert_eq!(&bytes[84..88], &[0; 4]);
        assert_eq!(u32_at(&bytes, 80), 0x4);
    }

    #[test]
    fn test_read_back() {
        let bytes = DdsHeader::new(100, 50, 5000, Some(FourCC::BC7)).to_bytes();
        let header = DdsHeader::read(&bytes).unwrap();

        let (width, height, size) = (header.width, header.height, header.pitch_or_linear_size);
        assert_eq!((width, height, size), (100, 50, 5000));
        assert_eq!(header.four_cc(), Some(FourCC::BC7));
        assert_eq!(header.four_cc().unwrap().to_string(), "BC7 ");

        let zeroed = DdsHeader::read(&DdsHeader::new(1, 1, 4, None).to_bytes()).unwrap();
        assert_eq!(zeroed.four_cc(), None);
    }

    #[test]
    fn test_read_rejects_bad_input() {
        let mut bytes = DdsHeader::new(4, 4, 16, Some(FourCC::DXT5)).to_bytes();
        assert!(matches!(DdsHeader::read(&bytes[..64]), Err(Error::Common(_))));

        bytes[4] = 0;
        assert!(matches!(DdsHeader::read(&bytes), Err(Error::InvalidHeader(_))));

        bytes[..4].copy_from_slice(b"PNG ");
        assert!(matches!(DdsHeader::read(&bytes), Err(Error::InvalidMagic(m)) if &m == b"PNG "));
    }
}
