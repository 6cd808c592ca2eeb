mod common;

use std::io::Cursor;

use proptest::prelude::*;
use sonotag::{ParseOptions, TagSet};

const EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "wav", "aiff", "m4a", "aac", "bin"];

const MAGICS: &[&[u8]] = &[
    b"ID3\x03\x00\x00",
    b"ID3\x04\x00\x00",
    b"fLaC",
    b"OggS",
    b"RIFF\x00\x00\x00\x00WAVE",
    b"FORM\x00\x00\x00\x00AIFF",
    b"\x00\x00\x00\x18ftypM4A ",
    b"\x03vorbis",
];

fn parse_bytes(data: &[u8], extension: &str) -> TagSet {
    let options = ParseOptions {
        ogg_scan_limit: 4096,
        ..ParseOptions::default()
    };
    sonotag::parse_source(Cursor::new(data.to_vec()), Some(extension), &options)
}

proptest! {
    #[test]
    fn arbitrary_bytes_never_panic(
        data in proptest::collection::vec(any::<u8>(), 0..512),
        ext in 0..EXTENSIONS.len(),
    ) {
        let first = parse_bytes(&data, EXTENSIONS[ext]);
        let second = parse_bytes(&data, EXTENSIONS[ext]);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn corrupted_headers_never_panic(
        magic in 0..MAGICS.len(),
        tail in proptest::collection::vec(any::<u8>(), 0..512),
        ext in 0..EXTENSIONS.len(),
    ) {
        let mut data = MAGICS[magic].to_vec();
        data.extend(tail);
        let tags = parse_bytes(&data, EXTENSIONS[ext]);
        for (_, value) in tags.iter() {
            prop_assert!(!sonotag::utils::encoding::trim_text(value).is_empty());
        }
    }

    #[test]
    fn truncating_a_valid_file_never_panics(cut in 0usize..400) {
        let mut data = common::id3v2(&[(b"TIT2", "Title"), (b"TPE1", "Artist")]);
        data.extend(common::wav(&[common::info_list(&[(b"IPRD", "Album")])]));
        data.truncate(cut.min(data.len()));
        let _ = parse_bytes(&data, "wav");
    }
}
