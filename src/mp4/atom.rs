// MP4 atom identifiers and item value decoding

use crate::chunk::{ChunkHeader, FourCc, HEADER_LEN};
use crate::error::Result;
use crate::utils::encoding::decode_utf8;
use crate::utils::ByteCursor;

pub const MP4_SIGNATURE: &[u8; 4] = b"ftyp";

/// Atom types the walker cares about
pub mod atoms {
    pub const MOOV: &[u8; 4] = b"moov";
    pub const UDTA: &[u8; 4] = b"udta";
    pub const META: &[u8; 4] = b"meta";
    pub const ILST: &[u8; 4] = b"ilst";
    pub const TRAK: &[u8; 4] = b"trak";
    pub const MDIA: &[u8; 4] = b"mdia";
    pub const MINF: &[u8; 4] = b"minf";
    pub const STBL: &[u8; 4] = b"stbl";
    pub const DATA: &[u8; 4] = b"data";
    pub const MDAT: &[u8; 4] = b"mdat";
}

/// `meta` is a full box: 4 bytes of version and flags precede its children
const FULL_BOX_PREFIX: u64 = 4;

/// `data` atom: header, then 4-byte type indicator and 4-byte locale
const DATA_PREFIX: u64 = HEADER_LEN + 8;

/// Offset of the first child from the start of a container atom, or `None`
/// if the atom is not descended into.
pub fn children_offset(id: FourCc) -> Option<u64> {
    match &id.0 {
        atoms::MOOV | atoms::UDTA | atoms::ILST | atoms::TRAK | atoms::MDIA | atoms::MINF
        | atoms::STBL => Some(HEADER_LEN),
        atoms::META => Some(HEADER_LEN + FULL_BOX_PREFIX),
        _ => None,
    }
}

/// Decode the `data` child at the start of an item atom's content.
///
/// `start..end` is the item's content. Returns `None` when the child is not a
/// `data` atom, carries no payload, or claims more than the item holds.
pub fn read_item_value(cursor: &mut ByteCursor<'_>, start: u64, end: u64) -> Result<Option<String>> {
    if end.saturating_sub(start) < DATA_PREFIX {
        return Ok(None);
    }
    cursor.seek(start)?;
    let header = ChunkHeader::read_atom(cursor)?;
    if !header.id.is(atoms::DATA) {
        return Ok(None);
    }

    let size = u64::from(header.size);
    if size <= DATA_PREFIX || size > end - start {
        return Ok(None);
    }
    cursor.seek(start + DATA_PREFIX)?;
    let payload = cursor.read_bytes(size - DATA_PREFIX)?;
    Ok(Some(decode_utf8(&payload)))
}
