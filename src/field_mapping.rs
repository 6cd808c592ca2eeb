// Unified metadata field mapping
//
// Each container names the same three fields differently:
// - ID3v2: frame ids (TIT2, TPE1, TALB)
// - FLAC/OGG: Vorbis comment keys (TITLE, ARTIST, ALBUM)
// - MP4: iTunes atoms (©nam, ©ART, ©alb)
// - RIFF/AIFF: LIST/INFO ids (INAM, IART, IPRD) and AIFF text chunks (NAME, AUTH)
//
// This module maps them all onto `StandardField`.

use serde::Serialize;

/// The fixed tag vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardField {
    Title,
    Artist,
    Album,
}

impl StandardField {
    pub const ALL: [StandardField; 3] = [
        StandardField::Title,
        StandardField::Artist,
        StandardField::Album,
    ];

    /// Get standard field name (lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardField::Title => "title",
            StandardField::Artist => "artist",
            StandardField::Album => "album",
        }
    }

    /// Parse from string, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Some(StandardField::Title),
            "artist" => Some(StandardField::Artist),
            "album" => Some(StandardField::Album),
            _ => None,
        }
    }
}

impl std::fmt::Display for StandardField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format-specific field identifiers
pub struct FieldMappings;

impl FieldMappings {
    // ID3v2 frame IDs
    pub const ID3V2_TITLE: &'static [u8; 4] = b"TIT2";
    pub const ID3V2_ARTIST: &'static [u8; 4] = b"TPE1";
    pub const ID3V2_ALBUM: &'static [u8; 4] = b"TALB";

    // Vorbis Comment keys (FLAC/OGG), matched after upper-casing
    pub const VORBIS_TITLE: &'static str = "TITLE";
    pub const VORBIS_ARTIST: &'static str = "ARTIST";
    pub const VORBIS_ALBUM: &'static str = "ALBUM";

    // MP4 iTunes atoms
    pub const MP4_TITLE: &'static [u8; 4] = b"\xA9nam"; // ©nam
    pub const MP4_ARTIST: &'static [u8; 4] = b"\xA9ART"; // ©ART
    pub const MP4_ALBUM: &'static [u8; 4] = b"\xA9alb"; // ©alb
    pub const MP4_GENRE: &'static [u8; 4] = b"gnre";
    pub const MP4_YEAR: &'static [u8; 4] = b"\xA9day"; // ©day
    pub const MP4_TRACK: &'static [u8; 4] = b"trkn";
    pub const MP4_DISK: &'static [u8; 4] = b"disk";

    // RIFF LIST/INFO sub-chunks
    pub const INFO_TITLE: &'static [u8; 4] = b"INAM";
    pub const INFO_ARTIST: &'static [u8; 4] = b"IART";
    pub const INFO_ALBUM: &'static [u8; 4] = b"IPRD";

    // AIFF text chunks
    pub const AIFF_TITLE: &'static [u8; 4] = b"NAME";
    pub const AIFF_ARTIST: &'static [u8; 4] = b"AUTH";

    /// Convert ID3v2 frame id to standard field
    pub fn from_id3v2(frame_id: &[u8; 4]) -> Option<StandardField> {
        match frame_id {
            Self::ID3V2_TITLE => Some(StandardField::Title),
            Self::ID3V2_ARTIST => Some(StandardField::Artist),
            Self::ID3V2_ALBUM => Some(StandardField::Album),
            _ => None,
        }
    }

    /// Convert Vorbis Comment key to standard field
    pub fn from_vorbis(key: &str) -> Option<StandardField> {
        match key.to_ascii_uppercase().as_str() {
            Self::VORBIS_TITLE => Some(StandardField::Title),
            Self::VORBIS_ARTIST => Some(StandardField::Artist),
            Self::VORBIS_ALBUM => Some(StandardField::Album),
            _ => None,
        }
    }

    /// Whether an atom is an iTunes metadata leaf holding a `data` child
    pub fn is_mp4_item(atom: &[u8; 4]) -> bool {
        matches!(
            atom,
            Self::MP4_TITLE
                | Self::MP4_ARTIST
                | Self::MP4_ALBUM
                | Self::MP4_GENRE
                | Self::MP4_YEAR
                | Self::MP4_TRACK
                | Self::MP4_DISK
        )
    }

    /// Convert MP4 item atom to standard field. Genre, year, track and disk
    /// are recognised but have no mapping.
    pub fn from_mp4(atom: &[u8; 4]) -> Option<StandardField> {
        match atom {
            Self::MP4_TITLE => Some(StandardField::Title),
            Self::MP4_ARTIST => Some(StandardField::Artist),
            Self::MP4_ALBUM => Some(StandardField::Album),
            _ => None,
        }
    }

    /// Convert LIST/INFO sub-chunk id to standard field
    pub fn from_riff_info(id: &[u8; 4]) -> Option<StandardField> {
        match id {
            Self::INFO_TITLE => Some(StandardField::Title),
            Self::INFO_ARTIST => Some(StandardField::Artist),
            Self::INFO_ALBUM => Some(StandardField::Album),
            _ => None,
        }
    }

    /// Convert AIFF text chunk id to standard field
    pub fn from_aiff_text(id: &[u8; 4]) -> Option<StandardField> {
        match id {
            Self::AIFF_TITLE => Some(StandardField::Title),
            Self::AIFF_ARTIST => Some(StandardField::Artist),
            _ => None,
        }
    }
}
