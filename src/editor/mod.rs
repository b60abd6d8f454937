//! Rope-backed text buffers for the title and content fields.

mod buffer;

pub use buffer::{Cursor, Direction, TextBuffer};
