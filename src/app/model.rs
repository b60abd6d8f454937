use std::time::{Duration, Instant};

use crate::editor::TextBuffer;
use crate::remote::{NoteRecord, SavePayload};

/// Severity of a transient status toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which input currently receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    Title,
    #[default]
    Content,
}

/// The complete editor state.
///
/// All state lives here - no global or scattered state. The three view
/// states are derived in priority order: `loading`, then `expired`, then
/// the normal editor.
pub struct Model {
    /// Id of the note on the server; `None` means scratch mode.
    pub note_id: Option<String>,
    /// The note title (single-line).
    pub title: TextBuffer,
    /// The note body.
    pub content: TextBuffer,
    /// Which field has keyboard focus.
    pub focus: Field,
    /// True while the initial fetch is outstanding.
    pub loading: bool,
    /// True while a persistence write is in flight.
    pub saving: bool,
    /// The note is expired/read-only; overrides all editing UI.
    pub expired: bool,
    /// The initial load has completed (success, failure, or no-op).
    /// Autosave is not scheduled before this.
    pub loaded: bool,
    /// Branding string carried in save payloads; not editable in-session.
    pub logo_text: String,
    /// Auto-resize result: rows the content area currently occupies.
    pub content_rows: u16,
    /// First visible wrapped row of the content area.
    pub scroll_offset: usize,
    /// Whether the help overlay is visible.
    pub help_visible: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Field edited by the message just applied, if any. Consumed by the
    /// event loop to drive change notification and autosave arming.
    pub last_edit: Option<Field>,
    toast: Option<Toast>,
    /// Terminal size.
    pub frame_width: u16,
    pub frame_height: u16,
}

/// Minimum rows the content area occupies before text grows it.
pub const MIN_CONTENT_ROWS: u16 = 3;

impl Model {
    /// Create a model for one editing session.
    ///
    /// `loading` starts true only when there is a note id, no seed, and the
    /// note is not expired - the only configuration that issues a fetch.
    pub fn new(
        note_id: Option<String>,
        seed: Option<NoteRecord>,
        logo_text: String,
        expired: bool,
        terminal_size: (u16, u16),
    ) -> Self {
        let loading = note_id.is_some() && seed.is_none() && !expired;
        let seed = seed.unwrap_or_default();
        let mut model = Self {
            note_id,
            title: TextBuffer::from_title(&seed.title),
            content: TextBuffer::from_text(&seed.content),
            focus: Field::Content,
            loading,
            saving: false,
            expired,
            loaded: !loading,
            logo_text,
            content_rows: MIN_CONTENT_ROWS,
            scroll_offset: 0,
            help_visible: false,
            should_quit: false,
            last_edit: None,
            toast: None,
            frame_width: terminal_size.0,
            frame_height: terminal_size.1,
        };
        model.resize_content_area();
        model
    }

    /// Whether this session persists to a backend.
    pub const fn backend_linked(&self) -> bool {
        self.note_id.is_some()
    }

    /// Whether edits should currently schedule a persistence write.
    pub const fn autosave_armed(&self) -> bool {
        self.backend_linked() && self.loaded && !self.expired
    }

    /// Snapshot the current field values into a save payload.
    pub fn save_payload(&self) -> SavePayload {
        SavePayload {
            content: self.content.text(),
            title: self.title.text(),
            logo_text: self.logo_text.clone(),
        }
    }

    /// Columns available to content text inside the bordered block.
    pub fn content_width(&self) -> u16 {
        crate::ui::content_inner_width(self.frame_width)
    }

    /// Rows available to the content area at the current terminal size.
    pub fn max_content_rows(&self) -> u16 {
        crate::ui::max_content_rows(self.frame_height)
    }

    /// Recompute the content area height from the wrapped text size.
    ///
    /// This is the auto-resize step: the area grows to fit the text and is
    /// clamped to what the frame can hold.
    pub fn resize_content_area(&mut self) {
        let desired = self.content.wrapped_rows(self.content_width());
        let desired = u16::try_from(desired).unwrap_or(u16::MAX);
        // On very small terminals the ceiling can drop below the usual
        // minimum; the floor yields first.
        let limit = self.max_content_rows().max(1);
        let floor = MIN_CONTENT_ROWS.min(limit);
        self.content_rows = desired.clamp(floor, limit);
        self.ensure_cursor_visible();
    }

    /// Scroll the content area so the cursor's wrapped row is visible.
    pub fn ensure_cursor_visible(&mut self) {
        let cursor_row = self.content.cursor_display_row(self.content_width());
        let visible = usize::from(self.content_rows.max(1));
        if cursor_row < self.scroll_offset {
            self.scroll_offset = cursor_row;
        } else if cursor_row >= self.scroll_offset + visible {
            self.scroll_offset = cursor_row + 1 - visible;
        }
    }

    /// Whether either field has unsaved edits.
    pub const fn is_dirty(&self) -> bool {
        self.title.is_dirty() || self.content.is_dirty()
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    /// Drop the toast once its deadline passes. Returns true if it expired.
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("note_id", &self.note_id)
            .field("loading", &self.loading)
            .field("saving", &self.saving)
            .field("expired", &self.expired)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self::new(None, None, String::new(), false, (80, 24))
    }
}
