// Signature scan for the Vorbis comment header

use tracing::{debug, trace};

use crate::error::Result;
use crate::flac::VorbisComment;
use crate::options::ParseOptions;
use crate::reader::TagReader;
use crate::tags::TagSet;
use crate::utils::ByteCursor;

/// Packet type 3 followed by the codec identifier
pub const COMMENT_HEADER_SIGNATURE: &[u8; 7] = b"\x03vorbis";

/// Finds the comment header by byte pattern rather than by walking pages.
///
/// No page boundaries or checksums are validated, so a payload that happens
/// to contain the signature can produce a false match.
pub struct OggScanner;

impl OggScanner {
    /// Scan `buffer` for comment headers. The first match that yields at
    /// least one field wins; undecodable or empty matches are passed over.
    pub fn scan(buffer: &[u8]) -> TagSet {
        let mut from = 0;
        while let Some(found) = find_signature(&buffer[from..]) {
            let start = from + found + COMMENT_HEADER_SIGNATURE.len();
            trace!(offset = start, "Vorbis comment signature");

            match VorbisComment::read(&mut ByteCursor::from_slice(&buffer[start..])) {
                Ok(comment) => {
                    let tags = comment.to_tags();
                    if !tags.is_empty() {
                        return tags;
                    }
                }
                Err(e) => debug!(offset = start, error = %e, "undecodable comment header, scanning on"),
            }
            from = start;
        }
        TagSet::new()
    }
}

fn find_signature(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(COMMENT_HEADER_SIGNATURE.len())
        .position(|w| w == COMMENT_HEADER_SIGNATURE)
}

impl TagReader for OggScanner {
    fn name(&self) -> &'static str {
        "ogg"
    }

    fn read(&self, cursor: &mut ByteCursor<'_>, options: &ParseOptions) -> Result<Option<TagSet>> {
        let limit = cursor.len().min(options.ogg_scan_limit as u64);
        cursor.seek(0)?;
        let buffer = cursor.read_bytes(limit)?;
        Ok(Some(Self::scan(&buffer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flac::vorbis::tests::comment_block;

    fn scan_file(data: &[u8], options: &ParseOptions) -> TagSet {
        OggScanner
            .read(&mut ByteCursor::from_slice(data), options)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn bare_signature_without_page_framing() {
        let mut data = COMMENT_HEADER_SIGNATURE.to_vec();
        data.extend(comment_block("", &["ALBUM=X"]));
        let tags = scan_file(&data, &ParseOptions::default());
        assert_eq!(tags.album(), Some("X"));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn skips_match_that_fails_to_decode() {
        // first match declares a vendor string far longer than the buffer
        let mut data = b"OggS junk ".to_vec();
        data.extend(COMMENT_HEADER_SIGNATURE);
        data.extend([0xFF, 0xFF, 0xFF, 0x0F]);
        data.extend(COMMENT_HEADER_SIGNATURE);
        data.extend(comment_block("Xiph.Org libVorbis", &["TITLE=Later"]));
        assert_eq!(scan_file(&data, &ParseOptions::default()).title(), Some("Later"));
    }

    #[test]
    fn skips_match_without_known_fields() {
        let mut data = COMMENT_HEADER_SIGNATURE.to_vec();
        data.extend(comment_block("", &["ENCODER=x"]));
        data.extend(COMMENT_HEADER_SIGNATURE);
        data.extend(comment_block("", &["ARTIST=Second"]));
        assert_eq!(scan_file(&data, &ParseOptions::default()).artist(), Some("Second"));
    }

    #[test]
    fn scan_limit_bounds_the_search() {
        let mut data = vec![0u8; 64];
        data.extend(COMMENT_HEADER_SIGNATURE);
        data.extend(comment_block("", &["TITLE=Far"]));
        let options = ParseOptions {
            ogg_scan_limit: 32,
            ..ParseOptions::default()
        };
        assert!(scan_file(&data, &options).is_empty());
        assert_eq!(scan_file(&data, &ParseOptions::default()).title(), Some("Far"));
    }
}
