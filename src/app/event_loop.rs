use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::debounce::Debouncer;
use crate::app::{
    App, DRAFT_DEBOUNCE_MS, DraftSnapshot, EditorHooks, Message, Model, SAVE_DEBOUNCE_MS, update,
};
use crate::remote::{HttpNoteStore, RemoteSession};

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization fails, the HTTP client
    /// cannot be constructed, or the event loop hits an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        // Spin up the remote session first: expired notes never talk to the
        // backend, scratch mode has no backend to talk to.
        let session = if self.note_id.is_some() && !self.expired {
            let store = HttpNoteStore::new(&self.server_url)
                .with_context(|| format!("Failed to create client for {}", self.server_url))?;
            Some(RemoteSession::spawn(store))
        } else {
            None
        };

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - notespace requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model = Model::new(
            self.note_id.clone(),
            self.seed.clone(),
            self.logo_text.clone(),
            self.expired,
            (size.width, size.height),
        );

        Self::dispatch_initial_load(&model, session.as_ref());

        let mut hooks = std::mem::take(&mut self.hooks);
        let result = Self::event_loop(&mut terminal, &mut model, session, &mut hooks);

        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        mut session: Option<RemoteSession>,
        hooks: &mut EditorHooks,
    ) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer: Debouncer<(u16, u16)> = Debouncer::new(100);
        let mut save_debouncer: Debouncer<()> = Debouncer::new(SAVE_DEBOUNCE_MS);
        let mut draft_debouncer: Debouncer<DraftSnapshot> = Debouncer::new(DRAFT_DEBOUNCE_MS);
        let mut needs_render = true;

        execute!(stdout(), EnableMouseCapture)?;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            // Trailing edge of the autosave window: snapshot and dispatch.
            if save_debouncer.take_ready(now_ms).is_some() {
                Self::dispatch_save(model, session.as_ref());
                needs_render = true;
            }

            // Trailing edge of the scratch-mode draft window.
            if let Some(snapshot) = draft_debouncer.take_ready(now_ms)
                && let Some(hook) = hooks.on_draft_update.as_mut()
            {
                hook(&snapshot);
            }

            // Apply whatever the worker finished since the last turn.
            if let Some(session) = session.as_mut() {
                while let Some(completion) = session.try_completion() {
                    let msg = Self::completion_message(completion);
                    *model = update(std::mem::take(model), msg);
                    needs_render = true;
                }
            }

            // Handle events
            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending()
                || save_debouncer.is_pending()
                || draft_debouncer.is_pending()
                || model.loading
                || model.saving
            {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Refresh timestamp after the poll wait so debouncers use
                // accurate times.
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                let msg = Self::handle_event(
                    &event::read()?,
                    model,
                    event_ms,
                    &mut resize_debouncer,
                );
                if let Some(msg) = msg {
                    let side_msg = msg.clone();
                    *model = update(std::mem::take(model), msg);
                    Self::handle_message_side_effects(
                        model,
                        session.as_ref(),
                        hooks,
                        &mut save_debouncer,
                        &side_msg,
                    );
                    Self::arm_autosave(
                        model,
                        event_ms,
                        &mut save_debouncer,
                        &mut draft_debouncer,
                        hooks,
                    );
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let msg = Self::handle_event(
                        &event::read()?,
                        model,
                        drain_ms,
                        &mut resize_debouncer,
                    );
                    if let Some(msg) = msg {
                        let side_msg = msg.clone();
                        *model = update(std::mem::take(model), msg);
                        Self::handle_message_side_effects(
                            model,
                            session.as_ref(),
                            hooks,
                            &mut save_debouncer,
                            &side_msg,
                        );
                        Self::arm_autosave(
                            model,
                            drain_ms,
                            &mut save_debouncer,
                            &mut draft_debouncer,
                            hooks,
                        );
                        needs_render = true;
                    }
                }
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }

        // Flush: a quit inside the debounce window still persists the last
        // edits before the worker goes away.
        if save_debouncer.is_pending() || (model.is_dirty() && model.autosave_armed()) {
            save_debouncer.cancel();
            Self::dispatch_save(model, session.as_ref());
        }
        if let Some(session) = session {
            session.shutdown();
        }

        Ok(())
    }
}
