// STREAMINFO block decoding

use std::time::Duration;

use super::metadata::{find_block, FlacMetadataBlockType};
use crate::error::Result;
use crate::utils::ByteCursor;

/// Fields of the mandatory STREAMINFO block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub min_block_size: u16,
    pub max_block_size: u16,
    pub min_frame_size: u32,
    pub max_frame_size: u32,
    /// 20 bits
    pub sample_rate: u32,
    pub channels: u8,
    pub bits_per_sample: u8,
    /// 36 bits; zero when unknown
    pub total_samples: u64,
}

impl StreamInfo {
    /// Block sizes and frame sizes before the packed sample fields
    const PREFIX_LEN: u64 = 10;
    const MIN_LEN: u64 = Self::PREFIX_LEN + 8;

    /// Locate and decode STREAMINFO. `Ok(None)` when the source is not FLAC
    /// or the block is missing or too short.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Option<Self>> {
        let location = match find_block(cursor, FlacMetadataBlockType::StreamInfo)? {
            Some(l) if u64::from(l.header.length) >= Self::MIN_LEN => l,
            _ => return Ok(None),
        };
        cursor.seek(location.offset)?;

        let min_block_size = u16::from_be_bytes(cursor.read_array()?);
        let max_block_size = u16::from_be_bytes(cursor.read_array()?);
        let min_frame_size = cursor.read_u24_be()?;
        let max_frame_size = cursor.read_u24_be()?;
        let packed = cursor.read_u64_be()?;

        Ok(Some(StreamInfo {
            min_block_size,
            max_block_size,
            min_frame_size,
            max_frame_size,
            sample_rate: ((packed >> 44) & 0xF_FFFF) as u32,
            channels: (((packed >> 41) & 0x7) + 1) as u8,
            bits_per_sample: (((packed >> 36) & 0x1F) + 1) as u8,
            total_samples: packed & 0xF_FFFF_FFFF,
        }))
    }

    /// total_samples / sample_rate, when both are known
    pub fn duration(&self) -> Option<Duration> {
        if self.sample_rate == 0 || self.total_samples == 0 {
            return None;
        }
        Some(Duration::from_secs_f64(
            self.total_samples as f64 / f64::from(self.sample_rate),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flac::tests::{block, flac_file, streaminfo_payload};

    #[test]
    fn decodes_packed_fields() {
        let data = flac_file(&[block(0, true, &streaminfo_payload(44_100, 2, 16, 441_000))]);
        let mut cursor = ByteCursor::from_slice(&data);
        let info = StreamInfo::read(&mut cursor).unwrap().unwrap();
        assert_eq!(info.sample_rate, 44_100);
        assert_eq!(info.channels, 2);
        assert_eq!(info.bits_per_sample, 16);
        assert_eq!(info.total_samples, 441_000);
        assert_eq!(info.min_block_size, 4096);
        assert_eq!(info.duration(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn unknown_sample_count_has_no_duration() {
        let data = flac_file(&[block(0, true, &streaminfo_payload(48_000, 1, 24, 0))]);
        let mut cursor = ByteCursor::from_slice(&data);
        let info = StreamInfo::read(&mut cursor).unwrap().unwrap();
        assert_eq!(info.duration(), None);
    }

    #[test]
    fn short_block_is_ignored() {
        let data = flac_file(&[block(0, true, &[0u8; 12])]);
        let mut cursor = ByteCursor::from_slice(&data);
        assert!(StreamInfo::read(&mut cursor).unwrap().is_none());
    }
}
