// Fixture builders shared by the integration tests
#![allow(dead_code)]

use std::io::Write;

pub fn synchsafe(n: u32) -> [u8; 4] {
    [
        ((n >> 21) & 0x7F) as u8,
        ((n >> 14) & 0x7F) as u8,
        ((n >> 7) & 0x7F) as u8,
        (n & 0x7F) as u8,
    ]
}

/// ID3v2.3 tag with Latin-1 text frames
pub fn id3v2(frames: &[(&[u8; 4], &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (id, text) in frames {
        body.extend_from_slice(*id);
        body.extend(((text.len() + 1) as u32).to_be_bytes());
        body.extend([0, 0, 0]);
        body.extend_from_slice(text.as_bytes());
    }
    let mut out = b"ID3\x03\x00\x00".to_vec();
    out.extend(synchsafe(body.len() as u32));
    out.extend(body);
    out
}

pub fn id3v1(title: &str, artist: &str, album: &str) -> Vec<u8> {
    let mut out = b"TAG".to_vec();
    for (text, width) in [(title, 30), (artist, 30), (album, 30), ("", 4), ("", 30)] {
        let mut field = text.as_bytes().to_vec();
        field.resize(width, 0);
        out.extend(field);
    }
    out.push(255);
    out
}

pub fn riff_chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = id.to_vec();
    out.extend((body.len() as u32).to_le_bytes());
    out.extend_from_slice(body);
    if body.len() % 2 == 1 {
        out.push(0);
    }
    out
}

pub fn wav(chunks: &[Vec<u8>]) -> Vec<u8> {
    let body = chunks.concat();
    let mut out = b"RIFF".to_vec();
    out.extend(((body.len() + 4) as u32).to_le_bytes());
    out.extend(b"WAVE");
    out.extend(body);
    out
}

pub fn info_list(entries: &[(&[u8; 4], &str)]) -> Vec<u8> {
    let mut body = b"INFO".to_vec();
    for (id, text) in entries {
        let mut value = text.as_bytes().to_vec();
        value.push(0);
        body.extend(riff_chunk(id, &value));
    }
    riff_chunk(b"LIST", &body)
}

pub fn vorbis_comment(entries: &[&str]) -> Vec<u8> {
    let mut out = 0u32.to_le_bytes().to_vec();
    out.extend((entries.len() as u32).to_le_bytes());
    for entry in entries {
        out.extend((entry.len() as u32).to_le_bytes());
        out.extend_from_slice(entry.as_bytes());
    }
    out
}

pub fn flac(sample_rate: u32, total_samples: u64, comments: &[&str]) -> Vec<u8> {
    let mut streaminfo = Vec::new();
    streaminfo.extend(4096u16.to_be_bytes());
    streaminfo.extend(4096u16.to_be_bytes());
    streaminfo.extend([0u8; 6]);
    let packed = (u64::from(sample_rate) << 44) | (1u64 << 41) | (15u64 << 36) | total_samples;
    streaminfo.extend(packed.to_be_bytes());
    streaminfo.extend([0u8; 16]);

    let comment = vorbis_comment(comments);
    let mut out = b"fLaC".to_vec();
    out.push(0x00);
    out.extend(&(streaminfo.len() as u32).to_be_bytes()[1..]);
    out.extend(streaminfo);
    out.push(0x84);
    out.extend(&(comment.len() as u32).to_be_bytes()[1..]);
    out.extend(comment);
    out
}

pub fn atom(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = ((body.len() + 8) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(id);
    out.extend_from_slice(body);
    out
}

pub fn m4a(items: &[(&[u8; 4], &str)]) -> Vec<u8> {
    let mut ilst = Vec::new();
    for (id, value) in items {
        let mut data = vec![0, 0, 0, 1, 0, 0, 0, 0];
        data.extend_from_slice(value.as_bytes());
        ilst.extend(atom(id, &atom(b"data", &data)));
    }
    let mut meta = vec![0u8; 4];
    meta.extend(atom(b"ilst", &ilst));
    let mut out = atom(b"ftyp", b"M4A \0\0\0\0");
    out.extend(atom(b"moov", &atom(b"udta", &atom(b"meta", &meta))));
    out
}

/// Write `data` to a temporary file with the given extension
pub fn write_temp(extension: &str, data: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{}", extension))
        .tempfile()
        .unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}
