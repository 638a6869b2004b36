//! OGGDATA1 binary layout.
//!
//! ```text
//! [8 bytes "OGGDATA1"] [i32 LE entry_count]
//! { [7-bit length-prefixed UTF-8 path] [i64 LE byte_length] [byte_length bytes] } * entry_count
//! ```
//!
//! The string prefix is an unsigned LEB128-style varint capped at 32 bits
//! (low 7-bit groups first, high bit set on every byte but the last).

use std::io::{self, Cursor, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{ArchiveError, ArchiveResult};

/// Archive magic identifier.
pub const MAGIC: &[u8; 8] = b"OGGDATA1";

/// File extension that marks a path as an archive.
pub const ARCHIVE_EXTENSION: &str = "data";

/// Maximum bytes in a 7-bit encoded 32-bit length.
const MAX_7BIT_BYTES: usize = 5;

/// Writes the magic and entry count.
pub fn write_header<W: Write>(writer: &mut W, entry_count: usize) -> io::Result<()> {
    let count = i32::try_from(entry_count).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("too many entries for OGGDATA1: {}", entry_count),
        )
    })?;
    writer.write_all(MAGIC)?;
    writer.write_i32::<LittleEndian>(count)?;
    Ok(())
}

/// Writes one entry record.
pub fn write_entry<W: Write>(writer: &mut W, relative_path: &str, data: &[u8]) -> io::Result<()> {
    write_string(writer, relative_path)?;
    writer.write_i64::<LittleEndian>(data.len() as i64)?;
    writer.write_all(data)?;
    Ok(())
}

/// Writes a 7-bit length-prefixed UTF-8 string.
pub fn write_string<W: Write>(writer: &mut W, value: &str) -> io::Result<()> {
    let bytes = value.as_bytes();
    let mut len = u32::try_from(bytes.len())
        .ok()
        .filter(|&n| n <= i32::MAX as u32)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "string too long"))?;

    while len >= 0x80 {
        writer.write_u8((len as u8) | 0x80)?;
        len >>= 7;
    }
    writer.write_u8(len as u8)?;
    writer.write_all(bytes)
}

/// One entry borrowed from an archive buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEntry<'a> {
    /// Relative path as recorded at pack time.
    pub relative_path: &'a str,
    /// Entry payload.
    pub data: &'a [u8],
}

/// Streaming parser over an in-memory archive.
///
/// Validates the header on construction, then yields one entry per
/// `next()` call. Any structural problem is reported as corruption and
/// terminates iteration.
pub struct EntryReader<'a> {
    path: &'a Path,
    bytes: &'a [u8],
    pos: usize,
    remaining: usize,
    index: usize,
    failed: bool,
}

impl<'a> EntryReader<'a> {
    /// Validates the magic and count and positions the reader at the first entry.
    pub fn new(path: &'a Path, bytes: &'a [u8]) -> ArchiveResult<Self> {
        if bytes.len() < MAGIC.len() || &bytes[..MAGIC.len()] != MAGIC {
            return Err(ArchiveError::BadMagic {
                path: path.to_path_buf(),
            });
        }

        let mut cursor = Cursor::new(&bytes[MAGIC.len()..]);
        let count = cursor
            .read_i32::<LittleEndian>()
            .map_err(|_| ArchiveError::corrupt(path, "truncated entry count"))?;
        if count < 0 {
            return Err(ArchiveError::corrupt(
                path,
                format!("negative entry count {}", count),
            ));
        }

        Ok(Self {
            path,
            bytes,
            pos: MAGIC.len() + 4,
            remaining: count as usize,
            index: 0,
            failed: false,
        })
    }

    /// Number of entries announced in the header that are still unread.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn read_entry(&mut self) -> ArchiveResult<RawEntry<'a>> {
        let index = self.index;
        let bytes: &'a [u8] = self.bytes;
        let mut cursor = Cursor::new(&bytes[self.pos..]);

        let name_len = read_7bit_len(&mut cursor).map_err(|message| {
            ArchiveError::corrupt(self.path, format!("entry {}: {}", index, message))
        })?;
        let name_start = self.pos + cursor.position() as usize;
        let name_end = name_start
            .checked_add(name_len)
            .filter(|&end| end <= bytes.len())
            .ok_or_else(|| {
                ArchiveError::corrupt(self.path, format!("entry {}: truncated path", index))
            })?;
        let relative_path = std::str::from_utf8(&bytes[name_start..name_end]).map_err(|_| {
            ArchiveError::corrupt(self.path, format!("entry {}: path is not UTF-8", index))
        })?;

        let mut cursor = Cursor::new(&bytes[name_end..]);
        let length = cursor.read_i64::<LittleEndian>().map_err(|_| {
            ArchiveError::corrupt(self.path, format!("entry {}: truncated length", index))
        })?;
        if length < 0 {
            return Err(ArchiveError::corrupt(
                self.path,
                format!("entry {} ({}) has negative length {}", index, relative_path, length),
            ));
        }

        let data_start = name_end + 8;
        let available = bytes.len() - data_start;
        if length as u64 > available as u64 {
            return Err(ArchiveError::corrupt(
                self.path,
                format!(
                    "entry {} ({}) declares {} bytes but only {} remain",
                    index, relative_path, length, available
                ),
            ));
        }
        let data_end = data_start + length as usize;

        self.pos = data_end;
        Ok(RawEntry {
            relative_path,
            data: &bytes[data_start..data_end],
        })
    }
}

impl<'a> Iterator for EntryReader<'a> {
    type Item = ArchiveResult<RawEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 {
            return None;
        }
        let result = self.read_entry();
        match &result {
            Ok(_) => {
                self.remaining -= 1;
                self.index += 1;
            }
            Err(_) => self.failed = true,
        }
        Some(result)
    }
}

/// Reads a 7-bit encoded non-negative length.
fn read_7bit_len<R: Read>(reader: &mut R) -> Result<usize, String> {
    let mut value: u32 = 0;
    for i in 0..MAX_7BIT_BYTES {
        let byte = reader
            .read_u8()
            .map_err(|_| "truncated path length".to_string())?;
        let shift = 7 * i as u32;
        if i == MAX_7BIT_BYTES - 1 && byte > 0x0F {
            return Err("path length prefix overflows 32 bits".to_string());
        }
        value |= ((byte & 0x7F) as u32) << shift;
        if byte & 0x80 == 0 {
            if value > i32::MAX as u32 {
                return Err(format!("negative path length {}", value as i32));
            }
            return Ok(value as usize);
        }
    }
    Err("path length prefix overflows 32 bits".to_string())
}
