// MP4/M4A metadata support
//
// iTunes-style items live under moov/udta/meta/ilst. Each item atom wraps a
// `data` atom holding the UTF-8 value.

pub mod atom;
pub mod walker;

pub use atom::{atoms, MP4_SIGNATURE};
pub use walker::AtomWalker;

use tracing::debug;

use crate::chunk::{ChunkHeader, HEADER_LEN};
use crate::error::Result;
use crate::options::ParseOptions;
use crate::reader::TagReader;
use crate::tags::TagSet;
use crate::utils::ByteCursor;

/// Header length when `size == 1` and a 64-bit size follows the type
const EXTENDED_HEADER_LEN: u64 = HEADER_LEN + 8;

/// Scans top-level atoms for `moov` and walks the first one found
pub struct Mp4Reader;

impl TagReader for Mp4Reader {
    fn name(&self) -> &'static str {
        "mp4"
    }

    fn read(&self, cursor: &mut ByteCursor<'_>, options: &ParseOptions) -> Result<Option<TagSet>> {
        let len = cursor.len();
        let mut pos = 0u64;

        while len - pos >= HEADER_LEN {
            cursor.seek(pos)?;
            let header = ChunkHeader::read_atom(cursor)?;
            let (size, header_len) = match header.size {
                // extends to end of file; nothing follows
                0 => break,
                1 => (cursor.read_u64_be()?, EXTENDED_HEADER_LEN),
                n => (u64::from(n), HEADER_LEN),
            };
            if size < header_len {
                debug!(atom = %header.id, size, offset = pos, "corrupt top-level atom size");
                break;
            }

            if header.id.is(atoms::MOOV) {
                let end = pos.saturating_add(size).min(len);
                let tags = AtomWalker::new(options).walk(cursor, pos + header_len, end)?;
                return Ok(Some(tags));
            }

            if size > len - pos {
                break;
            }
            pos += size;
        }

        Ok(Some(TagSet::new()))
    }
}
