//! Remote note store: wire types, the store trait, and the worker session.
//!
//! All network I/O happens on a single background worker thread owned by
//! [`RemoteSession`]. Commands go in over a channel, completions come back
//! over another and are drained by the event loop each turn. Every command
//! is stamped with the session generation; [`RemoteSession::detach`] bumps
//! the generation so completions that land afterwards are discarded instead
//! of being applied to a view that no longer exists.

mod http;

pub use http::HttpNoteStore;

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A note as stored on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NoteRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Response envelope for `GET /api/note/{id}`.
///
/// Servers may attach extra fields to `data`; they are ignored. A missing
/// `success` deserializes as `false` and counts as a rejected load.
#[derive(Debug, Deserialize)]
pub struct NoteEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<NoteRecord>,
}

/// Body for `PUT /api/note/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub content: String,
    pub title: String,
    pub logo_text: String,
}

/// Failures talking to the note store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("server rejected the request")]
    Rejected,
}

/// Backend abstraction for note persistence.
///
/// [`HttpNoteStore`] is the production implementation; tests substitute an
/// in-memory recording store.
pub trait NoteStore: Send + 'static {
    /// Fetch a note by id.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success HTTP status, a
    /// malformed body, or a rejected envelope.
    fn fetch(&self, id: &str) -> Result<NoteRecord, StoreError>;

    /// Persist a note by id.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success HTTP status.
    fn save(&self, id: &str, payload: &SavePayload) -> Result<(), StoreError>;
}

enum Command {
    Fetch {
        generation: u64,
        id: String,
    },
    Save {
        generation: u64,
        id: String,
        payload: SavePayload,
    },
    Shutdown,
}

/// A finished remote operation, stamped with the generation of the command
/// that started it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Loaded { generation: u64, note: NoteRecord },
    LoadFailed { generation: u64 },
    SaveSettled { generation: u64, ok: bool },
}

impl Completion {
    const fn generation(&self) -> u64 {
        match self {
            Self::Loaded { generation, .. }
            | Self::LoadFailed { generation }
            | Self::SaveSettled { generation, .. } => *generation,
        }
    }
}

/// Owns the worker thread performing note loads and saves.
pub struct RemoteSession {
    tx: Sender<Command>,
    rx: Receiver<Completion>,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl RemoteSession {
    /// Spawn a worker over the given store.
    pub fn spawn(store: impl NoteStore) -> Self {
        let (tx, command_rx) = mpsc::channel::<Command>();
        let (completion_tx, rx) = mpsc::channel::<Completion>();

        let handle = std::thread::spawn(move || {
            while let Ok(command) = command_rx.recv() {
                let completion = match command {
                    Command::Fetch { generation, id } => match store.fetch(&id) {
                        Ok(note) => Completion::Loaded { generation, note },
                        Err(err) => {
                            tracing::warn!(note_id = %id, error = %err, "note load failed");
                            Completion::LoadFailed { generation }
                        }
                    },
                    Command::Save {
                        generation,
                        id,
                        payload,
                    } => match store.save(&id, &payload) {
                        Ok(()) => Completion::SaveSettled {
                            generation,
                            ok: true,
                        },
                        Err(err) => {
                            tracing::warn!(note_id = %id, error = %err, "note save failed");
                            Completion::SaveSettled {
                                generation,
                                ok: false,
                            }
                        }
                    },
                    Command::Shutdown => break,
                };
                // The session may already be gone; completions are best-effort.
                if completion_tx.send(completion).is_err() {
                    break;
                }
            }
        });

        Self {
            tx,
            rx,
            generation: 0,
            handle: Some(handle),
        }
    }

    /// Queue a fetch of `id`.
    pub fn request_load(&self, id: &str) {
        let _ = self.tx.send(Command::Fetch {
            generation: self.generation,
            id: id.to_string(),
        });
    }

    /// Queue a save of `payload` under `id`.
    pub fn request_save(&self, id: &str, payload: SavePayload) {
        let _ = self.tx.send(Command::Save {
            generation: self.generation,
            id: id.to_string(),
            payload,
        });
    }

    /// Take the next completion belonging to the current generation.
    ///
    /// Completions from before the last [`detach`](Self::detach) are drained
    /// and dropped silently.
    pub fn try_completion(&mut self) -> Option<Completion> {
        while let Ok(completion) = self.rx.try_recv() {
            if completion.generation() == self.generation {
                return Some(completion);
            }
            tracing::debug!(?completion, "dropping stale completion");
        }
        None
    }

    /// Invalidate all outstanding commands.
    ///
    /// In-flight requests keep running on the worker, but their completions
    /// will no longer match the session generation and are discarded.
    pub const fn detach(&mut self) {
        self.generation += 1;
    }

    /// Stop the worker after it finishes any queued commands.
    ///
    /// Used at quit time so a final flush save completes before exit.
    pub fn shutdown(mut self) {
        let _ = self.tx.send(Command::Shutdown);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("remote worker panicked during shutdown");
        }
    }
}
