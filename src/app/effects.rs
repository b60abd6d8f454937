use crate::app::debounce::Debouncer;
use crate::app::{App, DraftSnapshot, EditorHooks, Message, Model, ToastLevel};
use crate::remote::{Completion, RemoteSession};

impl App {
    /// Run the side effects a just-applied message calls for: change
    /// notification hooks and the manual save flush.
    pub(super) fn handle_message_side_effects(
        model: &mut Model,
        session: Option<&RemoteSession>,
        hooks: &mut EditorHooks,
        save_debouncer: &mut Debouncer<()>,
        msg: &Message,
    ) {
        if msg.is_edit() && model.last_edit.is_some() {
            // Immediate notifications, independent of persistence timing.
            if let Some(hook) = hooks.on_title_change.as_mut() {
                hook(&model.title.text());
            }
            if model.backend_linked()
                && let Some(hook) = hooks.on_content_change.as_mut()
            {
                hook(&model.content.text());
            }
        }

        if matches!(msg, Message::FlushSave) {
            if model.backend_linked() {
                if model.autosave_armed() && (save_debouncer.is_pending() || model.is_dirty()) {
                    save_debouncer.cancel();
                    Self::dispatch_save(model, session);
                }
            } else {
                model.show_toast(ToastLevel::Warning, "No note id - drafts are not persisted");
            }
        }
    }

    /// Arm the debounced follow-ups for an edit: the persistence write in
    /// backend-linked mode, or the draft notification in scratch mode.
    pub(super) fn arm_autosave(
        model: &Model,
        now_ms: u64,
        save_debouncer: &mut Debouncer<()>,
        draft_debouncer: &mut Debouncer<DraftSnapshot>,
        hooks: &EditorHooks,
    ) {
        if model.last_edit.is_none() {
            return;
        }
        if model.autosave_armed() {
            save_debouncer.queue((), now_ms);
        } else if !model.backend_linked() && hooks.on_draft_update.is_some() {
            draft_debouncer.queue(
                DraftSnapshot {
                    title: model.title.text(),
                    content: model.content.text(),
                },
                now_ms,
            );
        }
    }

    /// Hand the current field values to the worker and flip the saving
    /// indicator on.
    pub(super) fn dispatch_save(model: &mut Model, session: Option<&RemoteSession>) {
        let Some(session) = session else { return };
        let Some(id) = model.note_id.clone() else {
            return;
        };
        if model.expired {
            return;
        }
        tracing::debug!(note_id = %id, "dispatching autosave");
        session.request_save(&id, model.save_payload());
        model.saving = true;
        model.title.mark_clean();
        model.content.mark_clean();
    }

    /// Issue the one startup fetch, when the model says one is due.
    pub(super) fn dispatch_initial_load(model: &Model, session: Option<&RemoteSession>) {
        if !model.loading {
            return;
        }
        if let (Some(id), Some(session)) = (model.note_id.as_deref(), session) {
            tracing::debug!(note_id = %id, "dispatching initial load");
            session.request_load(id);
        }
    }

    /// Translate a worker completion into a message for `update`.
    pub(super) fn completion_message(completion: Completion) -> Message {
        match completion {
            Completion::Loaded { note, .. } => Message::LoadArrived(note),
            Completion::LoadFailed { .. } => Message::LoadFailed,
            Completion::SaveSettled { ok, .. } => Message::SaveSettled { ok },
        }
    }
}
