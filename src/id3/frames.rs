// ID3v2 frame definitions and text decoding

use crate::error::Result;
use crate::utils::encoding::{decode_text, trim_text, TextEncoding};
use crate::utils::ByteCursor;

/// Frame header length for ID3v2.3 and ID3v2.4
pub const FRAME_HEADER_LEN: u64 = 10;

/// How frame size fields are encoded; fixed once per tag by the major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSizeEncoding {
    /// ID3v2.4: 7 bits per byte
    Synchsafe,
    /// ID3v2.3: plain big-endian
    Plain,
}

impl FrameSizeEncoding {
    pub fn for_version(major: u8) -> Option<Self> {
        match major {
            3 => Some(FrameSizeEncoding::Plain),
            4 => Some(FrameSizeEncoding::Synchsafe),
            _ => None,
        }
    }

    pub fn decode(&self, bytes: [u8; 4]) -> u32 {
        match self {
            FrameSizeEncoding::Synchsafe => crate::utils::cursor::synchsafe(bytes),
            FrameSizeEncoding::Plain => u32::from_be_bytes(bytes),
        }
    }
}

/// Frame header as read from the tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub id: [u8; 4],
    pub size: u32,
    pub flags: u16,
}

impl FrameHeader {
    pub fn read(cursor: &mut ByteCursor<'_>, encoding: FrameSizeEncoding) -> Result<Self> {
        let id = cursor.read_array::<4>()?;
        let size = encoding.decode(cursor.read_array::<4>()?);
        let [hi, lo] = cursor.read_array::<2>()?;
        Ok(FrameHeader {
            id,
            size,
            flags: u16::from_be_bytes([hi, lo]),
        })
    }

    /// Four NUL bytes mark the start of padding.
    pub fn is_padding(&self) -> bool {
        self.id == [0; 4]
    }

    pub fn is_text(&self) -> bool {
        self.id[0] == b'T'
    }
}

/// Decode a text frame payload: encoding byte followed by the text.
/// Returns the trimmed text, empty when the encoding is not handled.
pub fn decode_text_frame(data: &[u8]) -> String {
    match data.split_first() {
        Some((&encoding, text)) => {
            let decoded = decode_text(text, TextEncoding::from_byte(encoding));
            trim_text(&decoded).to_string()
        }
        None => String::new(),
    }
}
