// Container classification and reader ordering

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::flac::{FlacReader, FLAC_SIGNATURE};
use crate::id3::{Id3v1Reader, Id3v2Reader};
use crate::mp4::{Mp4Reader, MP4_SIGNATURE};
use crate::ogg::{OggScanner, OGG_SIGNATURE};
use crate::reader::TagReader;
use crate::riff::RiffReader;

/// Bytes of file prefix needed by [`Container::from_magic`]
pub const SNIFF_LEN: usize = 12;

/// Container family of an audio file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    /// MPEG audio (MP3 and friends): only ID3 applies
    Mpeg,
    Flac,
    Ogg,
    Wav,
    Aiff,
    Mp4,
    /// Raw AAC frames, no structured tag block
    Adts,
    Unknown,
}

impl Container {
    /// Classify from extension first, falling back to the file prefix.
    pub fn detect(extension: Option<&str>, head: &[u8]) -> Self {
        match extension.and_then(Self::from_extension) {
            Some(Container::Mp4) if is_adts_sync(head) => Container::Adts,
            Some(container) => container,
            None => Self::from_magic(head).unwrap_or(Container::Unknown),
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "mp3" | "mp2" => Some(Container::Mpeg),
            "flac" => Some(Container::Flac),
            "ogg" | "oga" => Some(Container::Ogg),
            "wav" | "wave" => Some(Container::Wav),
            "aif" | "aiff" | "aifc" => Some(Container::Aiff),
            "m4a" | "m4b" | "mp4" | "aac" => Some(Container::Mp4),
            _ => None,
        }
    }

    pub fn from_magic(head: &[u8]) -> Option<Self> {
        match head {
            _ if head.starts_with(FLAC_SIGNATURE) => Some(Container::Flac),
            _ if head.starts_with(OGG_SIGNATURE) => Some(Container::Ogg),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => Some(Container::Wav),
            [b'F', b'O', b'R', b'M', _, _, _, _, b'A', b'I', b'F', b'F' | b'C', ..] => Some(Container::Aiff),
            // box size, then the `ftyp` type
            _ if head.get(4..8) == Some(&MP4_SIGNATURE[..]) => Some(Container::Mp4),
            [b'I', b'D', b'3', ..] => Some(Container::Mpeg),
            // ADTS sets the two layer bits to zero, MPEG audio does not
            [0xFF, b1, ..] if b1 & 0xF6 == 0xF0 => Some(Container::Adts),
            [0xFF, b1, ..] if b1 & 0xE0 == 0xE0 => Some(Container::Mpeg),
            _ => None,
        }
    }

    /// Readers to run, highest precedence first: ID3v2 at offset 0, the
    /// ID3v1 trailer, then the container's own reader if it has one.
    pub fn reader_plan(&self) -> Vec<Box<dyn TagReader>> {
        let mut plan: Vec<Box<dyn TagReader>> = vec![Box::new(Id3v2Reader), Box::new(Id3v1Reader)];
        match self {
            Container::Flac => plan.push(Box::new(FlacReader)),
            Container::Ogg => plan.push(Box::new(OggScanner)),
            Container::Wav => plan.push(Box::new(RiffReader::wav())),
            Container::Aiff => plan.push(Box::new(RiffReader::aiff())),
            Container::Mp4 => plan.push(Box::new(Mp4Reader)),
            Container::Mpeg | Container::Adts | Container::Unknown => {}
        }
        plan
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Container::Mpeg => "mpeg",
            Container::Flac => "flac",
            Container::Ogg => "ogg",
            Container::Wav => "wav",
            Container::Aiff => "aiff",
            Container::Mp4 => "mp4",
            Container::Adts => "adts",
            Container::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 12-bit ADTS sync word: 0xFF then a high nibble of 0xF
pub fn is_adts_sync(head: &[u8]) -> bool {
    matches!(head, [0xFF, b1, ..] if b1 & 0xF0 == 0xF0)
}

/// Lower-cased extension of a path, if any
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
