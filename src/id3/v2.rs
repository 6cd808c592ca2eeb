// ID3v2.3 / ID3v2.4 tag reader

use tracing::trace;

use super::frames::{decode_text_frame, FrameHeader, FrameSizeEncoding, FRAME_HEADER_LEN};
use crate::error::Result;
use crate::field_mapping::FieldMappings;
use crate::tags::TagSet;
use crate::utils::ByteCursor;

/// ID3v2 header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id3v2Header {
    /// (major, revision)
    pub version: (u8, u8),
    pub flags: u8,
    /// Length of everything after the 10-byte header
    pub size: u32,
}

/// A decoded text frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFrame {
    pub id: [u8; 4],
    pub text: String,
}

/// ID3v2 tag
#[derive(Debug, Clone)]
pub struct Id3v2Tag {
    pub header: Id3v2Header,
    pub frames: Vec<TextFrame>,
}

impl Id3v2Header {
    pub const HEADER_SIZE: u64 = 10;
    const ID: &'static [u8; 3] = b"ID3";
    const FLAG_EXTENDED_HEADER: u8 = 0x40;

    /// Read the header at the cursor. `Ok(None)` when the signature is absent.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Option<Self>> {
        if cursor.remaining() < Self::HEADER_SIZE {
            return Ok(None);
        }
        let buffer = cursor.read_array::<10>()?;

        if &buffer[0..3] != Self::ID {
            return Ok(None);
        }

        Ok(Some(Id3v2Header {
            version: (buffer[3], buffer[4]),
            flags: buffer[5],
            size: crate::utils::cursor::synchsafe([buffer[6], buffer[7], buffer[8], buffer[9]]),
        }))
    }

    pub fn has_extended_header(&self) -> bool {
        self.flags & Self::FLAG_EXTENDED_HEADER != 0
    }
}

impl Id3v2Tag {
    /// Look for a tag at `offset` (0 for a file prefix, or the content
    /// offset of an embedded `ID3 ` chunk).
    ///
    /// Frame iteration stops at padding, at a zero-sized frame, or at a frame
    /// whose declared size would run past the end of the tag; the offending
    /// frame's payload is never read.
    pub fn read_at(cursor: &mut ByteCursor<'_>, offset: u64) -> Result<Option<Self>> {
        let limit = cursor.len();
        Self::read_within(cursor, offset, limit)
    }

    /// Like [`Id3v2Tag::read_at`], but the tag may not extend past `limit`
    /// even if its size field says so.
    pub fn read_within(cursor: &mut ByteCursor<'_>, offset: u64, limit: u64) -> Result<Option<Self>> {
        let limit = limit.min(cursor.len());
        if limit.saturating_sub(offset) < Id3v2Header::HEADER_SIZE {
            return Ok(None);
        }
        cursor.seek(offset)?;

        let header = match Id3v2Header::read(cursor)? {
            Some(h) => h,
            None => return Ok(None),
        };
        let size_encoding = match FrameSizeEncoding::for_version(header.version.0) {
            Some(e) => e,
            None => {
                trace!(version = header.version.0, "unsupported ID3v2 major version");
                return Ok(None);
            }
        };
        trace!(offset, size = header.size, version = header.version.0, "found ID3v2 tag");

        let tag_end = (offset + Id3v2Header::HEADER_SIZE + u64::from(header.size)).min(limit);

        if header.has_extended_header() {
            let raw = cursor.read_array::<4>()?;
            let skip = match size_encoding {
                // v2.4 counts the size field itself
                FrameSizeEncoding::Synchsafe => u64::from(size_encoding.decode(raw)).saturating_sub(4),
                FrameSizeEncoding::Plain => u64::from(u32::from_be_bytes(raw)),
            };
            if cursor.position() + skip > tag_end {
                return Ok(Some(Id3v2Tag {
                    header,
                    frames: Vec::new(),
                }));
            }
            cursor.skip(skip)?;
        }

        let mut frames = Vec::new();
        while tag_end.saturating_sub(cursor.position()) >= FRAME_HEADER_LEN {
            let frame = FrameHeader::read(cursor, size_encoding)?;
            if frame.is_padding() {
                break;
            }

            let remaining = tag_end - cursor.position();
            let size = u64::from(frame.size);
            if size == 0 || size > remaining {
                trace!(size, remaining, "ID3v2 frame overruns tag, stopping");
                break;
            }

            if frame.is_text() && FieldMappings::from_id3v2(&frame.id).is_some() {
                let data = cursor.read_bytes(size)?;
                frames.push(TextFrame {
                    id: frame.id,
                    text: decode_text_frame(&data),
                });
            } else {
                cursor.skip(size)?;
            }
        }

        Ok(Some(Id3v2Tag { header, frames }))
    }

    pub fn into_tags(self) -> TagSet {
        let mut tags = TagSet::new();
        for frame in self.frames {
            if let Some(field) = FieldMappings::from_id3v2(&frame.id) {
                tags.insert_if_absent(field, frame.text);
            }
        }
        tags
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn synchsafe_bytes(value: u32) -> [u8; 4] {
        [
            ((value >> 21) & 0x7F) as u8,
            ((value >> 14) & 0x7F) as u8,
            ((value >> 7) & 0x7F) as u8,
            (value & 0x7F) as u8,
        ]
    }

    pub(crate) fn text_frame(id: &[u8; 4], encoding: u8, text: &[u8], major: u8) -> Vec<u8> {
        let size = (text.len() + 1) as u32;
        let mut frame = id.to_vec();
        if major == 4 {
            frame.extend(synchsafe_bytes(size));
        } else {
            frame.extend(size.to_be_bytes());
        }
        frame.extend([0, 0, encoding]);
        frame.extend_from_slice(text);
        frame
    }

    pub(crate) fn tag(major: u8, frames: &[Vec<u8>], padding: usize) -> Vec<u8> {
        let body: Vec<u8> = frames.concat();
        let size = (body.len() + padding) as u32;
        let mut data = b"ID3".to_vec();
        data.extend([major, 0, 0]);
        data.extend(synchsafe_bytes(size));
        data.extend(body);
        data.extend(std::iter::repeat(0).take(padding));
        data
    }

    #[test]
    fn reads_v23_frames() {
        let data = tag(
            3,
            &[
                text_frame(b"TIT2", 0, b"Title", 3),
                text_frame(b"TPE1", 3, b"Artist", 3),
                text_frame(b"TALB", 1, &[0xFF, 0xFE, b'A', 0, b'l', 0], 3),
            ],
            16,
        );
        let mut cursor = ByteCursor::from_slice(&data);
        let tags = Id3v2Tag::read_at(&mut cursor, 0).unwrap().unwrap().into_tags();
        assert_eq!(tags.title(), Some("Title"));
        assert_eq!(tags.artist(), Some("Artist"));
        assert_eq!(tags.album(), Some("Al"));
    }

    #[test]
    fn v24_sizes_are_synchsafe() {
        // 200 bytes: synchsafe 0x01 0x48 differs from plain 0x00 0xC8
        let long_title = vec![b'x'; 199];
        let data = tag(
            4,
            &[
                text_frame(b"TIT2", 3, &long_title, 4),
                text_frame(b"TPE1", 3, b"After", 4),
            ],
            0,
        );
        let mut cursor = ByteCursor::from_slice(&data);
        let tags = Id3v2Tag::read_at(&mut cursor, 0).unwrap().unwrap().into_tags();
        assert_eq!(tags.title().map(str::len), Some(199));
        assert_eq!(tags.artist(), Some("After"));
    }

    #[test]
    fn oversized_v24_frame_stops_before_payload() {
        let good = text_frame(b"TIT2", 0, b"Kept", 4);
        let mut bad = b"TPE1".to_vec();
        bad.extend(synchsafe_bytes(1000));
        bad.extend([0, 0, 0]);
        bad.extend_from_slice(b"Lost");
        let data = tag(4, &[good.clone(), bad], 0);

        let mut cursor = ByteCursor::from_slice(&data);
        let parsed = Id3v2Tag::read_at(&mut cursor, 0).unwrap().unwrap();
        // 10-byte tag header + first frame + second frame header, nothing more
        assert_eq!(cursor.position(), 10 + good.len() as u64 + 10);
        let tags = parsed.into_tags();
        assert_eq!(tags.title(), Some("Kept"));
        assert!(tags.artist().is_none());
    }

    #[test]
    fn padding_ends_iteration() {
        let mut data = tag(3, &[text_frame(b"TIT2", 0, b"One", 3)], 32);
        // a frame hidden behind padding must not be seen
        let hidden = text_frame(b"TPE1", 0, b"Hidden", 3);
        let pad_start = data.len() - 32;
        data[pad_start + 4..pad_start + 4 + hidden.len()].copy_from_slice(&hidden);
        let mut cursor = ByteCursor::from_slice(&data);
        let tags = Id3v2Tag::read_at(&mut cursor, 0).unwrap().unwrap().into_tags();
        assert_eq!(tags.title(), Some("One"));
        assert!(tags.artist().is_none());
    }

    #[test]
    fn utf16be_without_bom_is_discarded() {
        let data = tag(3, &[text_frame(b"TIT2", 2, &[0, b'H', 0, b'i'], 3)], 0);
        let mut cursor = ByteCursor::from_slice(&data);
        let tags = Id3v2Tag::read_at(&mut cursor, 0).unwrap().unwrap().into_tags();
        assert!(tags.is_empty());
    }

    #[test]
    fn reads_at_embedded_offset() {
        let mut data = vec![0xAAu8; 37];
        data.extend(tag(3, &[text_frame(b"TIT2", 0, b"Inside", 3)], 0));
        let mut cursor = ByteCursor::from_slice(&data);
        assert!(Id3v2Tag::read_at(&mut cursor, 0).unwrap().is_none());
        let tags = Id3v2Tag::read_at(&mut cursor, 37).unwrap().unwrap().into_tags();
        assert_eq!(tags.title(), Some("Inside"));
    }

    #[test]
    fn unsupported_version_is_not_applicable() {
        let data = tag(2, &[], 4);
        let mut cursor = ByteCursor::from_slice(&data);
        assert!(Id3v2Tag::read_at(&mut cursor, 0).unwrap().is_none());
    }

    #[test]
    fn skips_extended_header() {
        let mut data = tag(3, &[text_frame(b"TIT2", 0, b"Ext", 3)], 0);
        // v2.3 extended header: size 6 (excluding itself), then 6 bytes
        let ext = [0u8, 0, 0, 6, 0, 0, 0, 0, 0, 0];
        data.splice(10..10, ext.iter().copied());
        data[5] = 0x40;
        let size = (data.len() - 10) as u32;
        data[6..10].copy_from_slice(&synchsafe_bytes(size));
        let mut cursor = ByteCursor::from_slice(&data);
        let tags = Id3v2Tag::read_at(&mut cursor, 0).unwrap().unwrap().into_tags();
        assert_eq!(tags.title(), Some("Ext"));
    }

    #[test]
    fn skips_v24_extended_header() {
        let mut data = tag(4, &[text_frame(b"TIT2", 0, b"Ext", 4)], 0);
        // v2.4 extended header: synchsafe size 6 counts its own 4 bytes
        let ext = [0u8, 0, 0, 6, 1, 0];
        data.splice(10..10, ext.iter().copied());
        data[5] = 0x40;
        let size = (data.len() - 10) as u32;
        data[6..10].copy_from_slice(&synchsafe_bytes(size));
        let mut cursor = ByteCursor::from_slice(&data);
        let tags = Id3v2Tag::read_at(&mut cursor, 0).unwrap().unwrap().into_tags();
        assert_eq!(tags.title(), Some("Ext"));
    }

    #[test]
    fn limit_caps_an_overstated_tag_size() {
        let inner = tag(3, &[text_frame(b"TIT2", 0, b"Inside", 3)], 0);
        let limit = inner.len() as u64;
        let mut data = inner;
        data.extend(text_frame(b"TPE1", 0, b"Outside", 3));
        let size = (data.len() - 10) as u32;
        data[6..10].copy_from_slice(&synchsafe_bytes(size));

        let mut cursor = ByteCursor::from_slice(&data);
        let tags = Id3v2Tag::read_within(&mut cursor, 0, limit).unwrap().unwrap().into_tags();
        assert_eq!(tags.title(), Some("Inside"));
        assert!(tags.artist().is_none());

        let unbounded = Id3v2Tag::read_at(&mut cursor, 0).unwrap().unwrap().into_tags();
        assert_eq!(unbounded.artist(), Some("Outside"));
    }
}
