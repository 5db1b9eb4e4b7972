//! Bounds-checked binary reader over byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! little-endian values from a byte slice. Every access, relative or
//! absolute, is validated against the buffer length and fails with
//! [`Error::OutOfRange`] instead of panicking.

use byteorder::{ByteOrder, LittleEndian};

use crate::{Error, Result};

/// A binary reader over an immutable byte slice.
///
/// Sequential reads (`read_*`) advance an internal position. Absolute reads
/// (`read_*_at`) take an explicit offset and leave the position untouched,
/// which suits pointer-based layouts where records are addressed directly.
///
/// # Example
///
/// ```
/// use nxtex_common::BinaryReader;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x04030201);
/// assert_eq!(reader.read_u16_at(6).unwrap(), 0x0807);
/// assert_eq!(reader.read_u32().unwrap(), 0x08070605);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Seek to an absolute position.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Borrow `count` bytes at an absolute offset.
    #[inline]
    pub fn read_bytes_at(&self, offset: usize, count: usize) -> Result<&'a [u8]> {
        let out_of_range = || Error::OutOfRange {
            offset,
            len: count,
            available: self.data.len(),
        };
        let end = offset.checked_add(count).ok_or_else(out_of_range)?;
        self.data.get(offset..end).ok_or_else(out_of_range)
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.read_bytes_at(self.position, count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a single byte at an absolute offset.
    #[inline]
    pub fn read_u8_at(&self, offset: usize) -> Result<u8> {
        self.read_bytes_at(offset, 1).map(|b| b[0])
    }

    /// Read a little-endian u16 at an absolute offset.
    #[inline]
    pub fn read_u16_at(&self, offset: usize) -> Result<u16> {
        self.read_bytes_at(offset, 2).map(LittleEndian::read_u16)
    }

    /// Read a little-endian u32 at an absolute offset.
    #[inline]
    pub fn read_u32_at(&self, offset: usize) -> Result<u32> {
        self.read_bytes_at(offset, 4).map(LittleEndian::read_u32)
    }

    /// Read a little-endian i64 (typically a file pointer) at an absolute offset.
    #[inline]
    pub fn read_i64_at(&self, offset: usize) -> Result<i64> {
        self.read_bytes_at(offset, 8).map(LittleEndian::read_i64)
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_bytes(4).map(LittleEndian::read_u32)
    }

    /// Read a little-endian i64.
    #[inline]
    pub fn read_i64(&mut self) -> Result<i64> {
        self.read_bytes(8).map(LittleEndian::read_i64)
    }

    /// Read a string at `offset`, stopping at the first null byte, after
    /// `max_len` bytes, or at the end of the buffer, whichever comes first.
    ///
    /// Only an `offset` beyond the end of the buffer is an error. Invalid
    /// UTF-8 is replaced rather than rejected.
    pub fn read_cstring_at(&self, offset: usize, max_len: usize) -> Result<String> {
        if offset > self.data.len() {
            return Err(Error::OutOfRange {
                offset,
                len: 1,
                available: self.data.len(),
            });
        }

        let end = offset.saturating_add(max_len).min(self.data.len());
        Ok(until_null(&self.data[offset..end]))
    }

    /// Read a string prefixed by its little-endian `u16` byte length.
    ///
    /// The prefixed length must fit inside the buffer. The string still ends
    /// early at an embedded null byte.
    pub fn read_prefixed_string_at(&self, offset: usize) -> Result<String> {
        let len = self.read_u16_at(offset)? as usize;
        let bytes = self.read_bytes_at(offset + 2, len)?;
        Ok(until_null(bytes))
    }

    /// Expect specific magic bytes at an absolute offset.
    pub fn expect_magic_at(&self, offset: usize, expected: &[u8]) -> Result<()> {
        let actual = self.read_bytes_at(offset, expected.len())?;
        if actual != expected {
            return Err(Error::InvalidMagic {
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            });
        }
        Ok(())
    }

    /// Expect specific magic bytes and advance past them.
    pub fn expect_magic(&mut self, expected: &[u8]) -> Result<()> {
        self.expect_magic_at(self.position, expected)?;
        self.position += expected.len();
        Ok(())
    }
}

fn until_null(bytes: &[u8]) -> String {
    let end = memchr::memchr(0, bytes).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
