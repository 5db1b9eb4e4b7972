//! In-memory BNTX builder for tests.
//!
//! Produces the minimal little-endian layout the parser reads: headers, the
//! info pointer array, one BRTI record per texture, names, pointer tables
//! and image data. Relocation tables and dictionaries are omitted.

/// One texture to emit.
#[derive(Debug, Clone)]
pub struct TextureSpec {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub raw_format: u32,
    pub tile_mode: u8,
    pub block_height_log2: u32,
    pub alignment: u32,
    pub data: Vec<u8>,
    /// Image size to write instead of `data.len()`.
    pub declared_size: Option<u32>,
    /// Data pointer to write instead of the real one.
    pub data_pointer_override: Option<i64>,
}

impl TextureSpec {
    /// A block-linear texture with one-GOB blocks and 512-byte alignment.
    pub fn new(name: &str, width: u32, height: u32, raw_format: u32, data: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            raw_format,
            tile_mode: 1,
            block_height_log2: 0,
            alignment: 512,
            data,
            declared_size: None,
            data_pointer_override: None,
        }
    }
}

/// Builder for synthetic BNTX files.
#[derive(Debug, Clone, Default)]
pub struct BntxBuilder {
    pub textures: Vec<TextureSpec>,
    /// Replace the info pointer at `(index, pointer)`.
    pub info_pointer_override: Option<(usize, i64)>,
}

impl BntxBuilder {
    /// Offset of the info pointer array.
    pub const INFO_PTRS_OFFSET: usize = 0x100;

    const FILE_NAME_AT: usize = 0x80;
    const BRTI_SIZE: usize = 0x90;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn texture(mut self, texture: TextureSpec) -> Self {
        self.textures.push(texture);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::INFO_PTRS_OFFSET];

        put(&mut out, 0x00, b"BNTX");
        put(&mut out, 0x0C, &[0xFF, 0xFE]);
        put(&mut out, 0x10, &(Self::FILE_NAME_AT as i64).to_le_bytes());
        put(&mut out, Self::FILE_NAME_AT, b"test\0");

        put(&mut out, 0x20, b"NX  ");
        put(&mut out, 0x24, &(self.textures.len() as u32).to_le_bytes());
        put(&mut out, 0x28, &(Self::INFO_PTRS_OFFSET as i64).to_le_bytes());

        out.resize(Self::INFO_PTRS_OFFSET + self.textures.len() * 8, 0);

        for (index, texture) in self.textures.iter().enumerate() {
            let base = out.len();
            out.resize(base + Self::BRTI_SIZE, 0);

            let image_size = texture
                .declared_size
                .unwrap_or(texture.data.len() as u32);

            put(&mut out, base, b"BRTI");
            put(&mut out, base + 0x04, &(Self::BRTI_SIZE as u32).to_le_bytes());
            put(&mut out, base + 0x10, &[texture.tile_mode]);
            put(&mut out, base + 0x16, &1u16.to_le_bytes());
            put(&mut out, base + 0x1C, &texture.raw_format.to_le_bytes());
            put(&mut out, base + 0x24, &texture.width.to_le_bytes());
            put(&mut out, base + 0x28, &texture.height.to_le_bytes());
            put(&mut out, base + 0x34, &texture.block_height_log2.to_le_bytes());
            put(&mut out, base + 0x50, &image_size.to_le_bytes());
            put(&mut out, base + 0x54, &texture.alignment.to_le_bytes());

            let name_at = out.len();
            out.extend_from_slice(&(texture.name.len() as u16).to_le_bytes());
            out.extend_from_slice(texture.name.as_bytes());

            let ptrs_at = out.len();
            out.extend_from_slice(&[0u8; 8]);

            out.resize(out.len().next_multiple_of(0x10), 0);
            let data_at = out.len();
            out.extend_from_slice(&texture.data);

            put(&mut out, base + 0x60, &(name_at as i64).to_le_bytes());
            put(&mut out, base + 0x70, &(ptrs_at as i64).to_le_bytes());

            let data_pointer = texture.data_pointer_override.unwrap_or(data_at as i64);
            put(&mut out, ptrs_at, &data_pointer.to_le_bytes());

            let info_pointer = match self.info_pointer_override {
                Some((at, pointer)) if at == index => pointer,
                _ => base as i64,
            };
            put(&mut out, Self::INFO_PTRS_OFFSET + index * 8, &info_pointer.to_le_bytes());
        }

        let file_size = out.len() as u32;
        put(&mut out, 0x1C, &file_size.to_le_bytes());
        out
    }
}

fn put(out: &mut [u8], at: usize, bytes: &[u8]) {
    out[at..at + bytes.len()].copy_from_slice(bytes);
}
