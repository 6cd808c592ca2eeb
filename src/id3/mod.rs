// ID3 tag readers
pub mod frames;
pub mod v1;
pub mod v2;

pub use v1::Id3v1Tag;
pub use v2::Id3v2Tag;

use crate::error::Result;
use crate::options::ParseOptions;
use crate::reader::TagReader;
use crate::tags::TagSet;
use crate::utils::ByteCursor;

/// ID3v2 tag at the start of the file
pub struct Id3v2Reader;

impl TagReader for Id3v2Reader {
    fn name(&self) -> &'static str {
        "id3v2"
    }

    fn read(&self, cursor: &mut ByteCursor<'_>, _options: &ParseOptions) -> Result<Option<TagSet>> {
        Ok(Id3v2Tag::read_at(cursor, 0)?.map(Id3v2Tag::into_tags))
    }
}

/// ID3v1 trailer at the end of the file
pub struct Id3v1Reader;

impl TagReader for Id3v1Reader {
    fn name(&self) -> &'static str {
        "id3v1"
    }

    fn read(&self, cursor: &mut ByteCursor<'_>, options: &ParseOptions) -> Result<Option<TagSet>> {
        if !options.id3v1 {
            return Ok(None);
        }
        Ok(Id3v1Tag::read(cursor)?.map(Id3v1Tag::into_tags))
    }
}
