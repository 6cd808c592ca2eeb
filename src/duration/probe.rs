// Duration stages backed by the symphonia demuxers

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use symphonia::core::codecs::{CodecParameters, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::trace;

use super::{seconds, DurationSource, Provenance};
use crate::error::Result;

/// Open the demuxer for a file. Nothing is decoded.
fn open_format(path: &Path) -> Result<Box<dyn FormatReader>> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    Ok(probed.format)
}

fn default_params(format: &dyn FormatReader) -> Option<CodecParameters> {
    format.default_track().map(|t| t.codec_params.clone())
}

/// `time_base × n_frames`
fn declared_length(params: &CodecParameters) -> Option<Duration> {
    let (time_base, n_frames) = (params.time_base?, params.n_frames?);
    let time = time_base.calc_time(n_frames);
    seconds(time.seconds as f64 + time.frac)
}

/// `n_frames / sample_rate`
fn counted_length(params: &CodecParameters) -> Option<Duration> {
    let (n_frames, sample_rate) = (params.n_frames?, params.sample_rate?);
    if sample_rate == 0 {
        return None;
    }
    seconds(n_frames as f64 / f64::from(sample_rate))
}

/// Length the container declares for its default track
pub struct ContainerDeclared;

impl DurationSource for ContainerDeclared {
    fn provenance(&self) -> Provenance {
        Provenance::ContainerDeclared
    }

    fn estimate(&self, path: &Path) -> Result<Option<Duration>> {
        let format = open_format(path)?;
        Ok(default_params(format.as_ref()).as_ref().and_then(declared_length))
    }
}

/// Frame count over sample rate from the container's codec parameters
pub struct FrameCount;

impl DurationSource for FrameCount {
    fn provenance(&self) -> Provenance {
        Provenance::FrameCount
    }

    fn estimate(&self, path: &Path) -> Result<Option<Duration>> {
        let format = open_format(path)?;
        Ok(default_params(format.as_ref()).as_ref().and_then(counted_length))
    }
}

/// Opens a decoder for the default track and reads back its parameters.
/// If those still lack a frame count, packet timestamps are walked to the
/// end of the track; packets are never decoded.
pub struct StreamProbe;

impl DurationSource for StreamProbe {
    fn provenance(&self) -> Provenance {
        Provenance::StreamProbe
    }

    fn estimate(&self, path: &Path) -> Result<Option<Duration>> {
        let mut format = open_format(path)?;
        let track = match format.default_track() {
            Some(t) => t,
            None => return Ok(None),
        };
        let track_id = track.id;
        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())?;

        let params = decoder.codec_params().clone();
        if let Some(d) = declared_length(&params).or_else(|| counted_length(&params)) {
            return Ok(Some(d));
        }

        walked_length(format.as_mut(), track_id, params)
    }
}

/// Read every packet of `track_id` and take the furthest `ts + dur` as the
/// frame count. Stops at the first I/O error, which is how demuxers report
/// end of stream.
fn walked_length(
    format: &mut dyn FormatReader,
    track_id: u32,
    mut params: CodecParameters,
) -> Result<Option<Duration>> {
    let mut end = 0u64;
    let mut packets = 0u64;
    loop {
        match format.next_packet() {
            Ok(packet) if packet.track_id() == track_id => {
                end = end.max(packet.ts().saturating_add(packet.dur()));
                packets += 1;
            }
            Ok(_) => {}
            Err(SymphoniaError::IoError(_)) => break,
            Err(e) => return Err(e.into()),
        }
    }
    trace!(packets, end, "packet walk finished");

    if end == 0 {
        return Ok(None);
    }
    params.n_frames = Some(end);
    Ok(declared_length(&params).or_else(|| counted_length(&params)))
}
