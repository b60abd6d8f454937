//! Terminal UI components.
//!
//! This module renders the three mutually exclusive view states in priority
//! order: loading placeholder, expired notice, then the editor (title input
//! plus auto-resizing content area) with its status bar and overlays.

mod overlays;
mod render;
mod status;

pub use render::{content_inner_width, editor_areas, max_content_rows, render, EditorAreas};

/// Rows of the bordered single-line title input.
pub const TITLE_HEIGHT: u16 = 3;
/// Border rows around the content area.
pub const CONTENT_CHROME: u16 = 2;
/// Rows reserved at the bottom of the frame (status bar).
pub const FOOTER_ROWS: u16 = 1;

#[cfg(test)]
mod tests;
