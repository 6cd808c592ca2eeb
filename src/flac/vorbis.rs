// Vorbis comment block, shared by FLAC and OGG

use tracing::trace;

use crate::error::Result;
use crate::field_mapping::FieldMappings;
use crate::tags::TagSet;
use crate::utils::encoding::decode_utf8;
use crate::utils::ByteCursor;

/// A `KEY=value` entry. The key is upper-cased for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComment {
    pub key: String,
    pub value: String,
}

impl RawComment {
    /// Split on the first `=`; entries with an empty key are dropped.
    pub fn parse(entry: &str) -> Option<Self> {
        let (key, value) = entry.split_once('=')?;
        if key.is_empty() {
            return None;
        }
        Some(RawComment {
            key: key.to_ascii_uppercase(),
            value: value.to_string(),
        })
    }
}

/// Vorbis comment structure
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VorbisComment {
    pub vendor_string: String,
    pub comments: Vec<RawComment>,
    /// Set when the declared comment count ran past the available bytes
    pub truncated: bool,
}

impl VorbisComment {
    /// Read a raw (unframed) comment block at the cursor.
    ///
    /// A vendor string or count that cannot be read is an error. An entry
    /// that runs past the data ends the list, keeping the entries before it.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let vendor_length = u64::from(cursor.read_u32_le()?);
        let vendor_string = decode_utf8(&cursor.read_bytes(vendor_length)?);

        let comment_count = cursor.read_u32_le()?;
        let mut comments = Vec::with_capacity((comment_count as usize).min(64));
        let mut truncated = false;

        for _ in 0..comment_count {
            if cursor.remaining() < 4 {
                truncated = true;
                break;
            }
            let length = u64::from(cursor.read_u32_le()?);
            if length > cursor.remaining() {
                truncated = true;
                break;
            }
            let entry = decode_utf8(&cursor.read_bytes(length)?);
            if let Some(comment) = RawComment::parse(&entry) {
                comments.push(comment);
            }
        }

        if truncated {
            trace!(kept = comments.len(), declared = comment_count, "comment list truncated");
        }

        Ok(VorbisComment {
            vendor_string,
            comments,
            truncated,
        })
    }

    /// Get a comment value by field name
    pub fn get(&self, field: &str) -> Option<&str> {
        self.comments
            .iter()
            .find(|c| c.key.eq_ignore_ascii_case(field))
            .map(|c| c.value.as_str())
    }

    pub fn to_tags(&self) -> TagSet {
        let mut tags = TagSet::new();
        for comment in &self.comments {
            if let Some(field) = FieldMappings::from_vorbis(&comment.key) {
                tags.insert_if_absent(field, comment.value.as_str());
            }
        }
        tags
    }
}
