// Sonotag - audio tag and duration extraction
//
// Reads title, artist and album from ID3v1/v2, RIFF/WAVE, AIFF, FLAC,
// OGG Vorbis and MP4 files, and estimates playing time without decoding
// audio. Malformed input never produces an error from `parse` or
// `estimate_duration`; whatever could be recovered is returned.

pub mod chunk;
pub mod duration;
pub mod error;
pub mod field_mapping;
pub mod flac;
pub mod id3;
pub mod mp4;
pub mod ogg;
pub mod options;
pub mod reader;
pub mod riff;
pub mod sniff;
pub mod tags;
pub mod utils;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

pub use duration::{DurationEstimate, DurationEstimator, DurationSource, Provenance};
pub use error::{Error, Result};
pub use field_mapping::StandardField;
pub use options::ParseOptions;
pub use reader::{Engine, TagReader};
pub use sniff::Container;
pub use tags::TagSet;
pub use utils::{ByteCursor, MediaSource};

/// Read the tags of a file with default options.
pub fn parse(path: impl AsRef<Path>) -> TagSet {
    parse_with(path, &ParseOptions::default())
}

/// Read the tags of a file. An unreadable file yields an empty set.
pub fn parse_with(path: impl AsRef<Path>, options: &ParseOptions) -> TagSet {
    let path = path.as_ref();
    match ByteCursor::open(path) {
        Ok(mut cursor) => {
            let extension = sniff::extension_of(path);
            Engine::new(options).parse(&mut cursor, extension.as_deref())
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "cannot open file");
            TagSet::new()
        }
    }
}

/// Read the tags of any seekable source, e.g. an in-memory buffer.
/// `extension` takes the place of a file name when sniffing.
pub fn parse_source<S: MediaSource>(source: S, extension: Option<&str>, options: &ParseOptions) -> TagSet {
    match ByteCursor::new(source) {
        Ok(mut cursor) => Engine::new(options).parse(&mut cursor, extension),
        Err(e) => {
            debug!(error = %e, "cannot measure source");
            TagSet::new()
        }
    }
}

/// Playing time, or `None` if no stage could determine it.
pub fn estimate_duration(path: impl AsRef<Path>) -> Option<Duration> {
    DurationEstimator::default()
        .estimate(path.as_ref())
        .map(|estimate| estimate.duration)
}

/// Classify a file by extension and magic bytes.
pub fn detect(path: impl AsRef<Path>) -> Container {
    let path = path.as_ref();
    let extension = sniff::extension_of(path);
    match ByteCursor::open(path) {
        Ok(mut cursor) => reader::sniff_source(&mut cursor, extension.as_deref()),
        Err(_) => Container::detect(extension.as_deref(), &[]),
    }
}

/// A file with its tags and duration read once up front.
#[derive(Debug, Clone)]
pub struct AudioFile {
    path: PathBuf,
    container: Container,
    tags: TagSet,
    duration: Option<DurationEstimate>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &ParseOptions::default())
    }

    /// Unlike [`parse_with`], a missing or unreadable file is an error here.
    pub fn open_with(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let mut cursor = ByteCursor::open(path)?;
        let extension = sniff::extension_of(path);
        let container = reader::sniff_source(&mut cursor, extension.as_deref());
        let tags = Engine::new(options).run(&mut cursor, &container.reader_plan());
        drop(cursor);

        let duration = DurationEstimator::default().estimate(path);

        Ok(AudioFile {
            path: path.to_path_buf(),
            container,
            tags,
            duration,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn container(&self) -> Container {
        self.container
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration.map(|d| d.duration)
    }

    /// Duration together with the stage that produced it
    pub fn duration_estimate(&self) -> Option<DurationEstimate> {
        self.duration
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            path: self.path.display().to_string(),
            container: self.container,
            title: self.tags.title().map(str::to_string),
            artist: self.tags.artist().map(str::to_string),
            album: self.tags.album().map(str::to_string),
            duration_secs: self.duration().map(|d| d.as_secs_f64()),
        }
    }
}

/// Serializable summary of an [`AudioFile`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub path: String,
    pub container: Container,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_secs: Option<f64>,
}
