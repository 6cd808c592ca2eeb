// Reader capability and the fault-isolated dispatch loop

use tracing::debug;

use crate::error::Result;
use crate::options::ParseOptions;
use crate::sniff::{Container, SNIFF_LEN};
use crate::tags::TagSet;
use crate::utils::ByteCursor;

/// One metadata mechanism (ID3v2, FLAC comments, MP4 atoms, ...).
pub trait TagReader {
    /// Short name used in logs and the CLI reader plan
    fn name(&self) -> &'static str;

    /// Read whatever this mechanism holds.
    ///
    /// `Ok(None)` means the mechanism is not present (signature mismatch).
    /// Readers seek absolutely and may leave the cursor anywhere.
    fn read(&self, cursor: &mut ByteCursor<'_>, options: &ParseOptions) -> Result<Option<TagSet>>;
}

/// Runs a container's reader plan over one source.
pub struct Engine<'o> {
    options: &'o ParseOptions,
}

impl<'o> Engine<'o> {
    pub fn new(options: &'o ParseOptions) -> Self {
        Engine { options }
    }

    /// Classify the source and run every applicable reader.
    pub fn parse(&self, cursor: &mut ByteCursor<'_>, extension: Option<&str>) -> TagSet {
        let container = sniff_source(cursor, extension);
        debug!(%container, "reader plan selected");
        self.run(cursor, &container.reader_plan())
    }

    /// Run `readers` in order, merging first-non-empty-wins. A failing reader
    /// contributes nothing and does not stop the ones after it.
    pub fn run(&self, cursor: &mut ByteCursor<'_>, readers: &[Box<dyn TagReader>]) -> TagSet {
        let mut tags = TagSet::new();
        for reader in readers {
            match reader.read(cursor, self.options) {
                Ok(Some(found)) => {
                    debug!(reader = reader.name(), fields = found.len(), "reader produced tags");
                    tags.merge(found);
                }
                Ok(None) => debug!(reader = reader.name(), "not applicable"),
                Err(e) => debug!(reader = reader.name(), error = %e, "reader failed, skipping"),
            }
        }
        tags
    }
}

/// Classify a source from its extension and leading bytes.
pub fn sniff_source(cursor: &mut ByteCursor<'_>, extension: Option<&str>) -> Container {
    let head_len = cursor.len().min(SNIFF_LEN as u64);
    let head = cursor
        .seek(0)
        .and_then(|_| cursor.read_bytes(head_len))
        .unwrap_or_default();
    Container::detect(extension, &head)
}
