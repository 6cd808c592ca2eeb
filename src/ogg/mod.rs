// OGG Vorbis metadata support
//
// The comment header is located by signature scan over a bounded prefix of
// the file. OGG page framing is not parsed.

pub mod scanner;

pub use scanner::{OggScanner, COMMENT_HEADER_SIGNATURE};

/// OGG page capture pattern
pub const OGG_SIGNATURE: &[u8; 4] = b"OggS";
