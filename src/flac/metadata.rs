// FLAC metadata block framing

use tracing::trace;

use crate::error::Result;
use crate::utils::ByteCursor;

/// FLAC file signature
pub const FLAC_SIGNATURE: &[u8; 4] = b"fLaC";

/// FLAC metadata block types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlacMetadataBlockType {
    StreamInfo,
    Padding,
    Application,
    SeekTable,
    VorbisComment,
    CueSheet,
    Picture,
    Reserved(u8),
    Invalid,
}

impl FlacMetadataBlockType {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => FlacMetadataBlockType::StreamInfo,
            1 => FlacMetadataBlockType::Padding,
            2 => FlacMetadataBlockType::Application,
            3 => FlacMetadataBlockType::SeekTable,
            4 => FlacMetadataBlockType::VorbisComment,
            5 => FlacMetadataBlockType::CueSheet,
            6 => FlacMetadataBlockType::Picture,
            127 => FlacMetadataBlockType::Invalid,
            other => FlacMetadataBlockType::Reserved(other),
        }
    }
}

/// FLAC metadata block header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlacMetadataBlockHeader {
    pub is_last: bool,
    pub block_type: FlacMetadataBlockType,
    pub length: u32,
}

impl FlacMetadataBlockHeader {
    pub const HEADER_SIZE: u64 = 4;

    /// 1 byte (last flag + 7-bit type), then a 24-bit big-endian length
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let flags = cursor.read_u8()?;
        let length = cursor.read_u24_be()?;

        Ok(FlacMetadataBlockHeader {
            is_last: (flags & 0x80) != 0,
            block_type: FlacMetadataBlockType::from_byte(flags & 0x7F),
            length,
        })
    }
}

/// A located block: its header and the offset of its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlacBlockLocation {
    pub header: FlacMetadataBlockHeader,
    pub offset: u64,
}

/// Check for the `fLaC` magic at the start of the source.
pub fn has_signature(cursor: &mut ByteCursor<'_>) -> Result<bool> {
    if cursor.len() < FLAC_SIGNATURE.len() as u64 {
        return Ok(false);
    }
    cursor.seek(0)?;
    Ok(&cursor.read_array::<4>()? == FLAC_SIGNATURE)
}

/// Walk the metadata blocks after the magic and return the first block of
/// `wanted` type. Other blocks are skipped by their declared length; a block
/// that claims more bytes than the file holds ends the walk.
pub fn find_block(
    cursor: &mut ByteCursor<'_>,
    wanted: FlacMetadataBlockType,
) -> Result<Option<FlacBlockLocation>> {
    if !has_signature(cursor)? {
        return Ok(None);
    }

    let mut pos = FLAC_SIGNATURE.len() as u64;
    while cursor.len().saturating_sub(pos) >= FlacMetadataBlockHeader::HEADER_SIZE {
        cursor.seek(pos)?;
        let header = FlacMetadataBlockHeader::read(cursor)?;
        let offset = pos + FlacMetadataBlockHeader::HEADER_SIZE;
        trace!(block_type = ?header.block_type, length = header.length, offset, "FLAC block");

        if u64::from(header.length) > cursor.len() - offset {
            trace!("FLAC block overruns file, stopping");
            return Ok(None);
        }
        if header.block_type == wanted {
            return Ok(Some(FlacBlockLocation { header, offset }));
        }
        if header.is_last {
            break;
        }
        pos = offset + u64::from(header.length);
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flac::tests::{block, flac_file};

    #[test]
    fn header_fields() {
        let data = [0x84, 0x00, 0x01, 0x02];
        let mut cursor = ByteCursor::from_slice(&data);
        let header = FlacMetadataBlockHeader::read(&mut cursor).unwrap();
        assert!(header.is_last);
        assert_eq!(header.block_type, FlacMetadataBlockType::VorbisComment);
        assert_eq!(header.length, 0x0102);
    }

    #[test]
    fn finds_block_after_skipping_others() {
        let data = flac_file(&[
            block(1, false, &[0u8; 7]),
            block(4, true, b"payload"),
        ]);
        let mut cursor = ByteCursor::from_slice(&data);
        let found = find_block(&mut cursor, FlacMetadataBlockType::VorbisComment)
            .unwrap()
            .unwrap();
        assert_eq!(found.offset, 4 + 4 + 7 + 4);
        assert_eq!(found.header.length, 7);
    }

    #[test]
    fn last_flag_stops_the_walk() {
        let data = flac_file(&[block(1, true, &[0u8; 2]), block(4, true, b"late")]);
        let mut cursor = ByteCursor::from_slice(&data);
        assert!(find_block(&mut cursor, FlacMetadataBlockType::VorbisComment)
            .unwrap()
            .is_none());
    }

    #[test]
    fn wrong_magic_finds_nothing() {
        let mut cursor = ByteCursor::from_slice(b"fLaX\x84\0\0\0");
        assert!(find_block(&mut cursor, FlacMetadataBlockType::VorbisComment)
            .unwrap()
            .is_none());
    }
}
