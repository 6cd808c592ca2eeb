// ID3v1 tag reader

use tracing::trace;

use crate::error::Result;
use crate::field_mapping::StandardField;
use crate::tags::TagSet;
use crate::utils::encoding::fixed_field;
use crate::utils::ByteCursor;

/// ID3v1 tag: the fixed 128-byte trailer
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Id3v1Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl Id3v1Tag {
    pub const TAG_SIZE: u64 = 128;
    const TAG_ID: &'static [u8; 3] = b"TAG";

    /// Read the trailer. `Ok(None)` when the source is too short or the
    /// trailer does not start with `TAG`.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Option<Self>> {
        if cursor.len() < Self::TAG_SIZE {
            return Ok(None);
        }

        cursor.seek(cursor.len() - Self::TAG_SIZE)?;
        let buffer = cursor.read_array::<128>()?;

        if &buffer[0..3] != Self::TAG_ID {
            return Ok(None);
        }
        trace!("found ID3v1 trailer");

        Ok(Some(Self::parse(&buffer)))
    }

    fn parse(buffer: &[u8; 128]) -> Self {
        Id3v1Tag {
            title: fixed_field(&buffer[3..33]),
            artist: fixed_field(&buffer[33..63]),
            album: fixed_field(&buffer[63..93]),
        }
    }

    pub fn into_tags(self) -> TagSet {
        let mut tags = TagSet::new();
        tags.insert_if_absent(StandardField::Title, self.title);
        tags.insert_if_absent(StandardField::Artist, self.artist);
        tags.insert_if_absent(StandardField::Album, self.album);
        tags
    }
}
