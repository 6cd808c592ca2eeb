// Duration estimation fallback chain

pub mod probe;

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::flac::StreamInfo;
use crate::reader::sniff_source;
use crate::sniff::{extension_of, Container};
use crate::utils::ByteCursor;

pub use probe::{ContainerDeclared, FrameCount, StreamProbe};

/// Which stage produced an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    ContainerDeclared,
    FrameCount,
    StreamProbe,
    FlacHeader,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::ContainerDeclared => "container_declared",
            Provenance::FrameCount => "frame_count",
            Provenance::StreamProbe => "stream_probe",
            Provenance::FlacHeader => "flac_header",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DurationEstimate {
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    pub duration: Duration,
    pub provenance: Provenance,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// One strategy in the chain. `Ok(None)` means "no answer here", same as an
/// error from the estimator's point of view.
pub trait DurationSource {
    fn provenance(&self) -> Provenance;
    fn estimate(&self, path: &Path) -> Result<Option<Duration>>;
}

/// Convert seconds to a `Duration`, rejecting zero, negative and non-finite
/// values.
pub(crate) fn seconds(secs: f64) -> Option<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs).ok()
}

/// STREAMINFO parse for files sniffed as FLAC
pub struct FlacHeader;

impl DurationSource for FlacHeader {
    fn provenance(&self) -> Provenance {
        Provenance::FlacHeader
    }

    fn estimate(&self, path: &Path) -> Result<Option<Duration>> {
        let mut cursor = ByteCursor::open(path)?;
        let extension = extension_of(path);
        if sniff_source(&mut cursor, extension.as_deref()) != Container::Flac {
            return Ok(None);
        }
        Ok(StreamInfo::read(&mut cursor)?.and_then(|info| info.duration()))
    }
}

/// Runs duration sources in order; the first positive answer wins.
pub struct DurationEstimator {
    sources: Vec<Box<dyn DurationSource>>,
}

impl Default for DurationEstimator {
    fn default() -> Self {
        DurationEstimator::with_sources(vec![
            Box::new(ContainerDeclared),
            Box::new(FrameCount),
            Box::new(StreamProbe),
            Box::new(FlacHeader),
        ])
    }
}

impl DurationEstimator {
    pub fn with_sources(sources: Vec<Box<dyn DurationSource>>) -> Self {
        DurationEstimator { sources }
    }

    /// Never fails: every stage error is logged and the next stage tried.
    pub fn estimate(&self, path: &Path) -> Option<DurationEstimate> {
        for source in &self.sources {
            let provenance = source.provenance();
            match source.estimate(path) {
                Ok(Some(duration)) if !duration.is_zero() => {
                    debug!(%provenance, secs = duration.as_secs_f64(), "duration found");
                    return Some(DurationEstimate {
                        duration,
                        provenance,
                    });
                }
                Ok(_) => debug!(%provenance, "no duration from stage"),
                Err(e) => debug!(%provenance, error = %e, "duration stage failed"),
            }
        }
        None
    }
}
