// Chunk/atom headers shared by the RIFF, AIFF and MP4 walkers

use std::fmt;

use crate::error::Result;
use crate::utils::ByteCursor;

/// Size of a RIFF/AIFF chunk header or a compact MP4 atom header
pub const HEADER_LEN: u64 = 8;

/// Four-character chunk or atom identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    pub fn is(&self, other: &[u8; 4]) -> bool {
        &self.0 == other
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Latin-1 so that 0xA9 renders as ©
        for &b in &self.0 {
            let c = char::from(b);
            if c.is_control() {
                write!(f, "\\x{:02x}", b)?;
            } else {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCc({})", self)
    }
}

/// Byte order of chunk size fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// One RIFF, AIFF or MP4 node header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: FourCc,
    pub size: u32,
    pub byte_order: Endian,
}

impl ChunkHeader {
    /// RIFF/AIFF layout: 4-byte id, then 4-byte size in `byte_order`.
    pub fn read_riff(cursor: &mut ByteCursor<'_>, byte_order: Endian) -> Result<Self> {
        let id = FourCc(cursor.read_array()?);
        let size = match byte_order {
            Endian::Big => cursor.read_u32_be()?,
            Endian::Little => cursor.read_u32_le()?,
        };
        Ok(ChunkHeader {
            id,
            size,
            byte_order,
        })
    }

    /// MP4 layout: 4-byte big-endian size (header included), then 4-byte type.
    pub fn read_atom(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let size = cursor.read_u32_be()?;
        let id = FourCc(cursor.read_array()?);
        Ok(ChunkHeader {
            id,
            size,
            byte_order: Endian::Big,
        })
    }

    /// RIFF/AIFF content length; the header is not counted.
    pub fn content_len(&self) -> u64 {
        u64::from(self.size)
    }

    /// RIFF/AIFF content length rounded up to the even-byte boundary.
    pub fn padded_len(&self) -> u64 {
        let len = self.content_len();
        len + (len & 1)
    }

    /// MP4 content length; `None` when the size cannot even hold the header.
    pub fn atom_content_len(&self) -> Option<u64> {
        u64::from(self.size).checked_sub(HEADER_LEN)
    }
}
