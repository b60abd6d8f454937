use ropey::Rope;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cursor position in a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (byte offset within the line).
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    /// Update column and reset column memory to match.
    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// An editable text field backed by a rope.
///
/// Both note fields use this type: the title as a single-line buffer (line
/// breaks are rejected) and the content as a multi-line buffer. The content
/// buffer also reports its wrapped row count, which drives the auto-resizing
/// content area in the editor view.
pub struct TextBuffer {
    rope: Rope,
    cursor: Cursor,
    single_line: bool,
    dirty: bool,
}

impl TextBuffer {
    /// Create a multi-line buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
            single_line: false,
            dirty: false,
        }
    }

    /// Create a single-line buffer (line breaks in `text` become spaces).
    pub fn from_title(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&flatten(text)),
            cursor: Cursor::new(),
            single_line: true,
            dirty: false,
        }
    }

    /// Create an empty multi-line buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether this is a single-line buffer.
    pub const fn is_single_line(&self) -> bool {
        self.single_line
    }

    /// Whether the buffer has been modified since creation or the last
    /// `mark_clean`.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after a save was dispatched).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx);
        let s = line.to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Length of a line in bytes (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.len())
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Whether the buffer contains no text at all.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Total number of characters in the buffer.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Replace the entire buffer content, moving the cursor to the start.
    ///
    /// Used when a remote load lands: the fetched note replaces whatever is
    /// in the buffer, including in-progress edits (the load/edit race is
    /// unmitigated). The buffer is clean afterwards.
    pub fn set_text(&mut self, text: &str) {
        let text = if self.single_line {
            flatten(text)
        } else {
            text.to_string()
        };
        self.rope = Rope::from_str(&text);
        self.cursor = Cursor::new();
        self.dirty = false;
    }

    /// Number of terminal rows the buffer occupies when hard lines wrap at
    /// `width` columns.
    ///
    /// An empty line still occupies one row. Width 0 is treated as width 1
    /// so the count stays finite.
    pub fn wrapped_rows(&self, width: u16) -> usize {
        let width = usize::from(width.max(1));
        let mut rows = 0usize;
        for idx in 0..self.line_count() {
            let line = self.line_at(idx).unwrap_or_default();
            let cols = line.width();
            rows += if cols == 0 { 1 } else { cols.div_ceil(width) };
        }
        rows.max(1)
    }

    /// The wrapped display row the cursor sits on when hard lines wrap at
    /// `width` columns. Row 0 is the first row of the buffer.
    pub fn cursor_display_row(&self, width: u16) -> usize {
        let width_cols = usize::from(width.max(1));
        let mut row = 0usize;
        for idx in 0..self.cursor.line {
            let line = self.line_at(idx).unwrap_or_default();
            let cols = line.width();
            row += if cols == 0 { 1 } else { cols.div_ceil(width_cols) };
        }
        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let col = self.cursor.col.min(line.len());
        row + line[..col].width() / width_cols
    }

    /// Map a wrapped display position back to a (line, byte-column) pair,
    /// clamped to the buffer. Inverse of [`cursor_display_row`] plus a
    /// horizontal cell offset; used for mouse clicks.
    ///
    /// [`cursor_display_row`]: Self::cursor_display_row
    pub fn position_at_display(&self, row: usize, col_cells: usize, width: u16) -> (usize, usize) {
        let width_cols = usize::from(width.max(1));
        let mut acc = 0usize;
        for idx in 0..self.line_count() {
            let line = self.line_at(idx).unwrap_or_default();
            let cols = line.width();
            let rows = if cols == 0 { 1 } else { cols.div_ceil(width_cols) };
            if row < acc + rows {
                let row_in_line = row - acc;
                let target_cells =
                    row_in_line * width_cols + col_cells.min(width_cols.saturating_sub(1));
                let mut seen = 0usize;
                for (byte_idx, ch) in line.char_indices() {
                    let w = UnicodeWidthChar::width(ch).unwrap_or(0);
                    if seen + w > target_cells {
                        return (idx, byte_idx);
                    }
                    seen += w;
                }
                return (idx, line.len());
            }
            acc += rows;
        }
        let last = self.line_count().saturating_sub(1);
        (last, self.line_len(last))
    }

    /// Insert a character at the cursor position.
    ///
    /// Single-line buffers silently drop line breaks. Returns `true` if the
    /// buffer changed.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if self.single_line && (ch == '\n' || ch == '\r') {
            return false;
        }
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, ch);
        if ch == '\n' {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        } else {
            self.cursor.set_col(self.cursor.col + ch.len_utf8());
        }
        self.dirty = true;
        true
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let flat;
        let s = if self.single_line && s.contains(['\n', '\r']) {
            flat = flatten(s);
            flat.as_str()
        } else {
            s
        };
        if s.is_empty() {
            return;
        }
        let char_idx = self.cursor_char_idx();
        self.rope.insert(char_idx, s);

        // Move cursor to end of inserted text
        let lines: Vec<&str> = s.split('\n').collect();
        if lines.len() > 1 {
            self.cursor.line += lines.len() - 1;
            self.cursor.set_col(lines.last().map_or(0, |l| l.len()));
        } else {
            self.cursor.set_col(self.cursor.col + s.len());
        }
        self.dirty = true;
    }

    /// Split the current line at the cursor (Enter key).
    ///
    /// No-op for single-line buffers.
    pub fn split_line(&mut self) {
        if self.single_line {
            return;
        }
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, '\n');
        self.cursor.line += 1;
        self.cursor.set_col(0);
        self.dirty = true;
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor.col == 0 && self.cursor.line == 0 {
            return false;
        }

        if self.cursor.col == 0 {
            // Join with previous line
            let prev_line_len = self.line_len(self.cursor.line - 1);
            let char_idx = self.cursor_char_idx();
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor.line -= 1;
            self.cursor.set_col(prev_line_len);
        } else {
            let char_idx = self.cursor_char_idx();
            let line = self.rope.line(self.cursor.line);
            let line_str = line.to_string();
            let before = &line_str[..self.cursor.col];
            let prev_char_len = before.chars().next_back().map_or(1, char::len_utf8);
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor.set_col(self.cursor.col - prev_char_len);
        }
        self.dirty = true;
        true
    }

    /// Delete the character at the cursor (Delete key).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let line_len = self.line_len(self.cursor.line);

        if self.cursor.col >= line_len && self.cursor.line + 1 >= self.line_count() {
            return false;
        }

        let char_idx = self.cursor_char_idx();
        self.rope.remove(char_idx..=char_idx);
        self.dirty = true;
        true
    }

    /// Move the cursor in the given direction.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(),
        }
    }

    /// Move cursor to the beginning of the line (Home).
    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self) {
        let len = self.line_len(self.cursor.line);
        self.cursor.set_col(len);
    }

    /// Move cursor one word to the left (Ctrl+Left).
    pub fn move_word_left(&mut self) {
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                self.cursor.line -= 1;
                self.cursor.set_col(self.line_len(self.cursor.line));
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let before = &line[..self.cursor.col];
        let trimmed = before.trim_end();

        if trimmed.is_empty() {
            self.cursor.set_col(0);
            return;
        }

        let pos = trimmed
            .rfind(|c: char| !c.is_alphanumeric() && c != '_')
            .map_or(0, |i| i + 1);
        self.cursor.set_col(pos);
    }

    /// Move cursor one word to the right (Ctrl+Right).
    pub fn move_word_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);

        if self.cursor.col >= line_len {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let after = &line[self.cursor.col..];

        let word_end = after
            .find(|c: char| !c.is_alphanumeric() && c != '_')
            .unwrap_or(after.len());
        let rest = &after[word_end..];
        let space_end = rest
            .find(|c: char| c.is_alphanumeric() || c == '_')
            .unwrap_or(rest.len());

        self.cursor.set_col(self.cursor.col + word_end + space_end);
    }

    /// Move cursor to a specific line and column, clamped to the buffer.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let max_line = self.line_count().saturating_sub(1);
        self.cursor.line = line.min(max_line);
        let max_col = self.line_len(self.cursor.line);
        self.cursor.set_col(col.min(max_col));
    }

    /// Move cursor to the start of the buffer (Ctrl+Home).
    pub const fn move_to_start(&mut self) {
        self.cursor.line = 0;
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self) {
        let last_line = self.line_count().saturating_sub(1);
        self.cursor.line = last_line;
        self.cursor.set_col(self.line_len(last_line));
    }

    // --- Private helpers ---

    /// Convert cursor position to a ropey char index.
    fn cursor_char_idx(&self) -> usize {
        let line_start = self.rope.line_to_char(self.cursor.line);
        let line = self.rope.line(self.cursor.line);
        let line_str: String = line.chars().collect();
        let byte_col = self.cursor.col.min(line_str.len());
        let char_offset = line_str[..byte_col].chars().count();
        line_start + char_offset
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let before = &line[..self.cursor.col];
            let prev_char_len = before.chars().next_back().map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col - prev_char_len);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);
        if self.cursor.col < line_len {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let next_char_len = line[self.cursor.col..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col + next_char_len);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.cursor.line -= 1;
            let max_col = self.line_len(self.cursor.line);
            self.cursor.col = self.cursor.col_memory.min(max_col);
        }
    }

    fn move_down(&mut self) {
        if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            let max_col = self.line_len(self.cursor.line);
            self.cursor.col = self.cursor.col_memory.min(max_col);
        }
    }
}

fn flatten(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

impl std::fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("single_line", &self.single_line)
            .field("dirty", &self.dirty)
            .finish()
    }
}
