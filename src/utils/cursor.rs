// Bounds-checked random-access reader over a file or byte slice

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{Error, Result};

/// Anything the cursor can sit on top of.
pub trait MediaSource: Read + Seek {}

impl<T: Read + Seek> MediaSource for T {}

/// Random-access reader that knows its total length up front.
///
/// All reads are checked against the remaining length before the source is
/// touched, so a corrupt size field can never trigger a huge allocation.
pub struct ByteCursor<'a> {
    source: Box<dyn MediaSource + 'a>,
    len: u64,
    pos: u64,
}

impl<'a> ByteCursor<'a> {
    /// Wrap a seekable source, measuring its length.
    pub fn new<S: MediaSource + 'a>(mut source: S) -> Result<Self> {
        let len = source.seek(SeekFrom::End(0))?;
        source.seek(SeekFrom::Start(0))?;
        Ok(ByteCursor {
            source: Box::new(source),
            len,
            pos: 0,
        })
    }

    /// Cursor over an in-memory buffer.
    pub fn from_slice(bytes: &'a [u8]) -> Self {
        ByteCursor {
            source: Box::new(Cursor::new(bytes)),
            len: bytes.len() as u64,
            pos: 0,
        }
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.pos)
    }

    /// Seek to an absolute offset. Seeking to exactly `len` is allowed.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        if offset > self.len {
            return Err(Error::SeekOutOfBounds {
                offset,
                len: self.len,
            });
        }
        self.source.seek(SeekFrom::Start(offset))?;
        self.pos = offset;
        Ok(())
    }

    pub fn skip(&mut self, count: u64) -> Result<()> {
        self.ensure(count)?;
        self.seek(self.pos + count)
    }

    pub fn read_bytes(&mut self, count: u64) -> Result<Vec<u8>> {
        self.ensure(count)?;
        let mut buffer = vec![0u8; count as usize];
        self.source.read_exact(&mut buffer)?;
        self.pos += count;
        Ok(buffer)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N as u64)?;
        let mut buffer = [0u8; N];
        self.source.read_exact(&mut buffer)?;
        self.pos += N as u64;
        Ok(buffer)
    }

    /// Read without moving the cursor.
    pub fn peek_bytes(&mut self, count: u64) -> Result<Vec<u8>> {
        let start = self.pos;
        let bytes = self.read_bytes(count)?;
        self.seek(start)?;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Big-endian 24-bit integer (FLAC block lengths)
    pub fn read_u24_be(&mut self) -> Result<u32> {
        let [a, b, c] = self.read_array::<3>()?;
        Ok(u32::from_be_bytes([0, a, b, c]))
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_be(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Synchsafe 32-bit integer (7 bits per byte, high bit ignored)
    pub fn read_synchsafe_u32(&mut self) -> Result<u32> {
        Ok(synchsafe(self.read_array()?))
    }

    fn ensure(&self, needed: u64) -> Result<()> {
        let available = self.remaining();
        if needed > available {
            return Err(Error::Truncated {
                offset: self.pos,
                needed,
                available,
            });
        }
        Ok(())
    }
}

impl ByteCursor<'static> {
    /// Open a file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        ByteCursor::new(BufReader::new(file))
    }
}

/// Decode a synchsafe integer
pub fn synchsafe(bytes: [u8; 4]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 7) | u32::from(b & 0x7F))
}
