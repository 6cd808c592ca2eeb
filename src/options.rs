// Tunables for the tag readers

use serde::Deserialize;

/// Limits applied while parsing. Every field has a default, so a config
/// file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Bytes buffered from the start of an OGG file when scanning for the
    /// Vorbis comment header.
    pub ogg_scan_limit: usize,
    /// Deepest MP4 container nesting that will be descended into.
    pub max_atom_depth: usize,
    /// Total MP4 atoms visited before the walk gives up.
    pub max_atoms: usize,
    /// Whether the 128-byte ID3v1 trailer is consulted.
    pub id3v1: bool,
}

impl ParseOptions {
    pub const DEFAULT_OGG_SCAN_LIMIT: usize = 5 * 1024 * 1024;
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            ogg_scan_limit: Self::DEFAULT_OGG_SCAN_LIMIT,
            max_atom_depth: 16,
            max_atoms: 65_536,
            id3v1: true,
        }
    }
}
