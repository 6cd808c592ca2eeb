// RIFF/WAVE and AIFF chunk walker
//
// Both containers are a 12-byte header (magic, size, form type) followed by
// a flat run of chunks: 4-byte id, 4-byte size, content padded to an even
// length. WAV sizes are little-endian, AIFF sizes big-endian.
//
// Metadata can come from:
// - LIST/INFO sub-chunks (INAM, IART, IPRD)
// - an embedded ID3v2 tag in an `id3 `/`ID3 ` chunk
// - AIFF NAME/AUTH text chunks

pub mod info;

use tracing::{debug, trace};

use crate::chunk::{ChunkHeader, Endian, HEADER_LEN};
use crate::error::Result;
use crate::field_mapping::FieldMappings;
use crate::id3::Id3v2Tag;
use crate::options::ParseOptions;
use crate::reader::TagReader;
use crate::tags::TagSet;
use crate::utils::encoding::{decode_latin1, trim_text};
use crate::utils::ByteCursor;

/// Container header: magic, size, form type
const CONTAINER_HEADER_LEN: u64 = 12;

/// Magic constants and byte order of one chunk-based container
#[derive(Debug, Clone, Copy)]
pub struct RiffLayout {
    pub name: &'static str,
    pub magic: &'static [u8; 4],
    pub form_types: &'static [[u8; 4]],
    pub byte_order: Endian,
    pub id3_chunks: &'static [[u8; 4]],
    pub text_chunks: bool,
}

impl RiffLayout {
    pub const WAV: RiffLayout = RiffLayout {
        name: "riff",
        magic: b"RIFF",
        form_types: &[*b"WAVE"],
        byte_order: Endian::Little,
        id3_chunks: &[*b"id3 ", *b"ID3 "],
        text_chunks: false,
    };

    pub const AIFF: RiffLayout = RiffLayout {
        name: "aiff",
        magic: b"FORM",
        form_types: &[*b"AIFF", *b"AIFC"],
        byte_order: Endian::Big,
        id3_chunks: &[*b"ID3 "],
        text_chunks: true,
    };
}

/// Tags from one walk, kept apart so embedded ID3 can outrank native chunks
#[derive(Debug, Default)]
struct WalkResult {
    embedded: TagSet,
    native: TagSet,
}

/// Reader for RIFF/WAVE and AIFF/AIFC files
pub struct RiffReader {
    layout: RiffLayout,
}

impl RiffReader {
    pub fn new(layout: RiffLayout) -> Self {
        RiffReader { layout }
    }

    pub fn wav() -> Self {
        Self::new(RiffLayout::WAV)
    }

    pub fn aiff() -> Self {
        Self::new(RiffLayout::AIFF)
    }

    fn matches_header(&self, cursor: &mut ByteCursor<'_>) -> Result<bool> {
        if cursor.len() < CONTAINER_HEADER_LEN {
            return Ok(false);
        }
        cursor.seek(0)?;
        let header = cursor.read_array::<12>()?;
        let form: [u8; 4] = [header[8], header[9], header[10], header[11]];
        Ok(&header[0..4] == self.layout.magic && self.layout.form_types.contains(&form))
    }

    fn walk(&self, cursor: &mut ByteCursor<'_>) -> Result<WalkResult> {
        let mut result = WalkResult::default();
        let end = cursor.len();
        let mut pos = CONTAINER_HEADER_LEN;

        while end.saturating_sub(pos) >= HEADER_LEN {
            cursor.seek(pos)?;
            let chunk = ChunkHeader::read_riff(cursor, self.layout.byte_order)?;
            let content = pos + HEADER_LEN;
            trace!(id = %chunk.id, size = chunk.size, offset = pos, "chunk");

            if chunk.content_len() > end - content {
                debug!(id = %chunk.id, size = chunk.size, "chunk overruns file, stopping");
                break;
            }

            if chunk.id.is(b"LIST") {
                if let Some(tags) = info::read_info_list(cursor, &chunk, content)? {
                    result.native.merge(tags);
                }
            } else if self.layout.id3_chunks.contains(&chunk.id.0) {
                match Id3v2Tag::read_within(cursor, content, content + chunk.content_len()) {
                    Ok(Some(tag)) => result.embedded.merge(tag.into_tags()),
                    Ok(None) => trace!("ID3 chunk without ID3v2 signature"),
                    Err(e) => debug!(error = %e, "embedded ID3 chunk unreadable"),
                }
            } else if self.layout.text_chunks {
                if let Some(field) = FieldMappings::from_aiff_text(&chunk.id.0) {
                    cursor.seek(content)?;
                    let data = cursor.read_bytes(chunk.content_len())?;
                    result
                        .native
                        .insert_if_absent(field, trim_text(&decode_latin1(&data)));
                }
            }

            pos = content + chunk.padded_len();
        }

        Ok(result)
    }
}

impl TagReader for RiffReader {
    fn name(&self) -> &'static str {
        self.layout.name
    }

    fn read(&self, cursor: &mut ByteCursor<'_>, _options: &ParseOptions) -> Result<Option<TagSet>> {
        if !self.matches_header(cursor)? {
            return Ok(None);
        }
        let WalkResult {
            mut embedded,
            native,
        } = self.walk(cursor)?;
        embedded.merge(native);
        Ok(Some(embedded))
    }
}
