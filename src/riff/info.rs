// LIST/INFO sub-chunk reader

use tracing::{debug, trace};

use crate::chunk::{ChunkHeader, HEADER_LEN};
use crate::error::Result;
use crate::field_mapping::FieldMappings;
use crate::tags::TagSet;
use crate::utils::encoding::{decode_utf8, trim_text};
use crate::utils::ByteCursor;

const LIST_TYPE_LEN: u64 = 4;

/// Read the sub-chunks of a `LIST` chunk whose content starts at `content`.
///
/// Returns `Ok(None)` for list types other than `INFO`. Sub-chunks are bounded
/// by the parent's declared extent and padded to even lengths like top-level
/// chunks.
pub fn read_info_list(cursor: &mut ByteCursor<'_>, list: &ChunkHeader, content: u64) -> Result<Option<TagSet>> {
    if list.content_len() < LIST_TYPE_LEN {
        return Ok(None);
    }
    cursor.seek(content)?;
    let list_type = cursor.read_array::<4>()?;
    if &list_type != b"INFO" {
        trace!(list_type = %crate::chunk::FourCc(list_type), "ignoring LIST");
        return Ok(None);
    }

    let end = content + list.content_len();
    let mut pos = content + LIST_TYPE_LEN;
    let mut tags = TagSet::new();

    while end.saturating_sub(pos) >= HEADER_LEN {
        cursor.seek(pos)?;
        let sub = ChunkHeader::read_riff(cursor, list.byte_order)?;
        if sub.content_len() > end - pos - HEADER_LEN {
            debug!(id = %sub.id, size = sub.size, "INFO entry overruns LIST, stopping");
            break;
        }

        if let Some(field) = FieldMappings::from_riff_info(&sub.id.0) {
            let data = cursor.read_bytes(sub.content_len())?;
            tags.insert_if_absent(field, trim_text(&decode_utf8(&data)));
        }

        pos += HEADER_LEN + sub.padded_len();
    }

    Ok(Some(tags))
}
