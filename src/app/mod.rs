//! Editor state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete editor state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering, debounced autosave, and
//!   remote completion draining

pub mod debounce;
mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Field, MIN_CONTENT_ROWS, Model, ToastLevel};
pub use update::{Message, update};

use crate::remote::NoteRecord;

/// Debounce window for persistence writes.
pub const SAVE_DEBOUNCE_MS: u64 = 1_000;
/// Debounce window for scratch-mode draft notifications.
pub const DRAFT_DEBOUNCE_MS: u64 = 500;

/// A debounced scratch-mode snapshot handed to the draft hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftSnapshot {
    pub title: String,
    pub content: String,
}

/// Change-notification callbacks supplied by the embedder.
///
/// The title and content hooks fire synchronously on every edit; the draft
/// hook fires debounced and only in scratch mode. Distinct names on purpose:
/// the persistence notification and the draft notification are different
/// channels.
#[derive(Default)]
pub struct EditorHooks {
    /// Every edit, with the new title.
    pub on_title_change: Option<Box<dyn FnMut(&str)>>,
    /// Every edit, with the new content; only when a note id exists.
    pub on_content_change: Option<Box<dyn FnMut(&str)>>,
    /// Debounced `{title, content}` snapshot; only without a note id.
    pub on_draft_update: Option<Box<dyn FnMut(&DraftSnapshot)>>,
}

impl std::fmt::Debug for EditorHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorHooks")
            .field("on_title_change", &self.on_title_change.is_some())
            .field("on_content_change", &self.on_content_change.is_some())
            .field("on_draft_update", &self.on_draft_update.is_some())
            .finish()
    }
}

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    note_id: Option<String>,
    seed: Option<NoteRecord>,
    logo_text: String,
    expired: bool,
    server_url: String,
    hooks: EditorHooks,
}

impl App {
    /// Create an application for the given note id (`None` = scratch mode).
    pub fn new(note_id: Option<String>, server_url: impl Into<String>) -> Self {
        Self {
            note_id,
            seed: None,
            logo_text: "NoteSpace".to_string(),
            expired: false,
            server_url: server_url.into(),
            hooks: EditorHooks::default(),
        }
    }

    /// Supply initial note data, skipping the startup fetch.
    pub fn with_seed(mut self, seed: Option<NoteRecord>) -> Self {
        self.seed = seed;
        self
    }

    /// Set the branding string carried in save payloads.
    pub fn with_logo_text(mut self, logo_text: impl Into<String>) -> Self {
        self.logo_text = logo_text.into();
        self
    }

    /// Open the note as expired/read-only.
    pub fn with_expired(mut self, expired: bool) -> Self {
        self.expired = expired;
        self
    }

    /// Install the edit-notification hooks.
    pub fn with_hooks(mut self, hooks: EditorHooks) -> Self {
        self.hooks = hooks;
        self
    }
}
