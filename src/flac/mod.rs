// FLAC metadata handling module

pub mod metadata;
pub mod streaminfo;
pub mod vorbis;

pub use metadata::{FlacBlockLocation, FlacMetadataBlockHeader, FlacMetadataBlockType, FLAC_SIGNATURE};
pub use streaminfo::StreamInfo;
pub use vorbis::{RawComment, VorbisComment};

use tracing::trace;

use crate::error::Result;
use crate::options::ParseOptions;
use crate::reader::TagReader;
use crate::tags::TagSet;
use crate::utils::ByteCursor;

/// Reads the first VORBIS_COMMENT block of a FLAC stream
pub struct FlacReader;

impl TagReader for FlacReader {
    fn name(&self) -> &'static str {
        "flac"
    }

    fn read(&self, cursor: &mut ByteCursor<'_>, _options: &ParseOptions) -> Result<Option<TagSet>> {
        if !metadata::has_signature(cursor)? {
            return Ok(None);
        }
        let location = match metadata::find_block(cursor, FlacMetadataBlockType::VorbisComment)? {
            Some(l) => l,
            None => {
                trace!("FLAC stream has no VORBIS_COMMENT block");
                return Ok(Some(TagSet::new()));
            }
        };

        cursor.seek(location.offset)?;
        let payload = cursor.read_bytes(u64::from(location.header.length))?;
        let comment = VorbisComment::read(&mut ByteCursor::from_slice(&payload))?;
        Ok(Some(comment.to_tags()))
    }
}
