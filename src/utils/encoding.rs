// Text decoding helpers shared by the tag readers

use encoding_rs::{mem, UTF_16BE, UTF_16LE, UTF_8};

/// ID3v2 text encoding selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Latin1,
    Utf16,
    /// UTF-16BE without a byte-order mark. Recognised but decoded as empty.
    Utf16BE,
    Utf8,
    Unsupported(u8),
}

impl TextEncoding {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => TextEncoding::Latin1,
            1 => TextEncoding::Utf16,
            2 => TextEncoding::Utf16BE,
            3 => TextEncoding::Utf8,
            other => TextEncoding::Unsupported(other),
        }
    }
}

/// Decode text with the given ID3v2 encoding.
pub fn decode_text(data: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Latin1 => decode_latin1(data),
        TextEncoding::Utf16 => match data {
            [0xFF, 0xFE, rest @ ..] => UTF_16LE.decode_without_bom_handling(rest).0.into_owned(),
            [0xFE, 0xFF, rest @ ..] => UTF_16BE.decode_without_bom_handling(rest).0.into_owned(),
            // no BOM: big-endian, like most readers
            _ => UTF_16BE.decode_without_bom_handling(data).0.into_owned(),
        },
        TextEncoding::Utf16BE | TextEncoding::Unsupported(_) => String::new(),
        TextEncoding::Utf8 => decode_utf8(data),
    }
}

pub fn decode_latin1(data: &[u8]) -> String {
    mem::decode_latin1(data).into_owned()
}

pub fn decode_utf8(data: &[u8]) -> String {
    UTF_8.decode_without_bom_handling(data).0.into_owned()
}

/// Trim whitespace, control characters and NUL terminators from both ends.
pub fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c <= ' ')
}

/// Latin-1 fixed-width field: cut at the first NUL, then trim.
pub fn fixed_field(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    trim_text(&decode_latin1(&bytes[..end])).to_string()
}
