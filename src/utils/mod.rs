// Shared low-level helpers
pub mod cursor;
pub mod encoding;

pub use cursor::{ByteCursor, MediaSource};
