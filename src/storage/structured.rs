//! Length-framed binary encoding with a whole-blob checksum.
//!
//! [`StructWriter`] frames little-endian integers and length-prefixed byte
//! strings while folding every written byte into a running CRC32; `close()`
//! appends the checksum as a footer. [`StructReader`] refuses to decode a
//! single field until the footer has been verified, so a corrupt or
//! truncated blob fails up front instead of yielding garbage mid-decode.

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use crc32fast::Hasher;

use crate::error::{Result, SuggestError};
use crate::storage::{StorageInput, StorageOutput};

/// Writer for checksummed structured blobs.
pub struct StructWriter {
    out: Box<dyn StorageOutput>,
    hasher: Hasher,
}

impl StructWriter {
    /// Wrap a storage output.
    pub fn new(out: Box<dyn StorageOutput>) -> Self {
        Self {
            out,
            hasher: Hasher::new(),
        }
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.hasher.update(bytes);
        self.out.write_all(bytes)?;
        Ok(())
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, v: u8) -> Result<()> {
        self.write_raw(&[v])
    }

    /// Write a little-endian u32.
    pub fn write_u32(&mut self, v: u32) -> Result<()> {
        self.write_raw(&v.to_le_bytes())
    }

    /// Write a little-endian u64.
    pub fn write_u64(&mut self, v: u64) -> Result<()> {
        self.write_raw(&v.to_le_bytes())
    }

    /// Write a little-endian i64.
    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        self.write_raw(&v.to_le_bytes())
    }

    /// Write a u32-length-prefixed byte string.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let len: u32 = bytes
            .len()
            .try_into()
            .map_err(|_| SuggestError::persistence("byte string exceeds u32::MAX"))?;
        self.write_u32(len)?;
        self.write_raw(bytes)
    }

    /// Append the CRC32 footer and sync the blob.
    pub fn close(mut self) -> Result<()> {
        let checksum = self.hasher.clone().finalize();
        self.out.write_u32::<LittleEndian>(checksum)?;
        self.out.flush_and_sync()
    }
}

/// Reader for checksummed structured blobs.
///
/// Reads the whole blob eagerly and verifies the footer before exposing any
/// field; every decode error is a `Persistence` error.
#[derive(Debug)]
pub struct StructReader {
    cursor: Cursor<Vec<u8>>,
}

impl StructReader {
    /// Read and verify a blob from a storage input.
    pub fn from_input(mut input: Box<dyn StorageInput>) -> Result<Self> {
        let mut buf = Vec::new();
        input.read_to_end(&mut buf)?;
        if buf.len() < 4 {
            return Err(SuggestError::persistence("blob too short for checksum"));
        }
        let body_len = buf.len() - 4;
        let stored = u32::from_le_bytes([
            buf[body_len],
            buf[body_len + 1],
            buf[body_len + 2],
            buf[body_len + 3],
        ]);
        let mut hasher = Hasher::new();
        hasher.update(&buf[..body_len]);
        let actual = hasher.finalize();
        if stored != actual {
            return Err(SuggestError::persistence(format!(
                "checksum mismatch: stored {stored:#x}, computed {actual:#x}"
            )));
        }
        buf.truncate(body_len);
        Ok(Self {
            cursor: Cursor::new(buf),
        })
    }

    fn truncated() -> SuggestError {
        SuggestError::persistence("unexpected end of blob")
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.cursor.read_u8().map_err(|_| Self::truncated())
    }

    /// Read a little-endian u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.cursor
            .read_u32::<LittleEndian>()
            .map_err(|_| Self::truncated())
    }

    /// Read a little-endian u64.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.cursor
            .read_u64::<LittleEndian>()
            .map_err(|_| Self::truncated())
    }

    /// Read a little-endian i64.
    pub fn read_i64(&mut self) -> Result<i64> {
        self.cursor
            .read_i64::<LittleEndian>()
            .map_err(|_| Self::truncated())
    }

    /// Read a u32-length-prefixed byte string.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_u32()? as usize;
        let pos = self.cursor.position() as usize;
        let data = self.cursor.get_ref();
        if pos + len > data.len() {
            return Err(Self::truncated());
        }
        let bytes = data[pos..pos + len].to_vec();
        self.cursor.set_position((pos + len) as u64);
        Ok(bytes)
    }
}
