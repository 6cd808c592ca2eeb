// Bounded traversal of the atom tree below `moov`

use tracing::{debug, trace};

use super::atom::{children_offset, read_item_value};
use crate::chunk::{ChunkHeader, HEADER_LEN};
use crate::error::Result;
use crate::field_mapping::FieldMappings;
use crate::options::ParseOptions;
use crate::tags::TagSet;
use crate::utils::ByteCursor;

/// One open container: the next sibling offset and where the container ends
#[derive(Debug, Clone, Copy)]
struct Level {
    pos: u64,
    end: u64,
    depth: usize,
}

/// Visits atoms depth-first in file order using an explicit stack.
///
/// Descent stops at `max_atom_depth` and the whole walk stops after
/// `max_atoms` headers. A child whose size is below the header length or
/// exceeds its parent's remaining extent closes that parent; siblings
/// already visited keep their values.
pub struct AtomWalker<'o> {
    options: &'o ParseOptions,
}

impl<'o> AtomWalker<'o> {
    pub fn new(options: &'o ParseOptions) -> Self {
        AtomWalker { options }
    }

    /// Walk the children of the container spanning `start..end`.
    pub fn walk(&self, cursor: &mut ByteCursor<'_>, start: u64, end: u64) -> Result<TagSet> {
        let mut tags = TagSet::new();
        let mut stack = vec![Level {
            pos: start,
            end,
            depth: 1,
        }];
        let mut visited = 0usize;

        while let Some(level) = stack.last_mut() {
            if level.end.saturating_sub(level.pos) < HEADER_LEN {
                stack.pop();
                continue;
            }

            cursor.seek(level.pos)?;
            let header = ChunkHeader::read_atom(cursor)?;
            let size = u64::from(header.size);
            if header.atom_content_len().is_none() || size > level.end - level.pos {
                debug!(atom = %header.id, size, offset = level.pos, "corrupt atom size, closing level");
                stack.pop();
                continue;
            }

            visited += 1;
            if visited > self.options.max_atoms {
                debug!(limit = self.options.max_atoms, "atom limit reached");
                break;
            }

            let atom_start = level.pos;
            let atom_end = atom_start + size;
            let depth = level.depth;
            level.pos = atom_end;
            trace!(atom = %header.id, size, depth, "atom");

            if let Some(field) = FieldMappings::from_mp4(&header.id.0) {
                if let Some(value) = read_item_value(cursor, atom_start + HEADER_LEN, atom_end)? {
                    tags.insert_if_absent(field, value);
                }
            } else if FieldMappings::is_mp4_item(&header.id.0) {
                trace!(atom = %header.id, "unmapped item");
            } else if let Some(offset) = children_offset(header.id) {
                if depth >= self.options.max_atom_depth {
                    debug!(atom = %header.id, depth, "atom depth limit reached");
                    continue;
                }
                if offset <= size {
                    stack.push(Level {
                        pos: atom_start + offset,
                        end: atom_end,
                        depth: depth + 1,
                    });
                }
            }
        }

        Ok(tags)
    }
}
