use crate::app::Model;
use crate::app::model::Field;
use crate::editor::Direction;
use crate::remote::NoteRecord;

/// All possible events and actions in the application.
///
/// These represent user input, remote completions, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Focus
    /// Focus the title input
    FocusTitle,
    /// Focus the content area
    FocusContent,
    /// Switch focus between title and content (Tab)
    SwitchFocus,

    // Editing (applies to the focused field)
    /// Insert a character at the cursor
    InsertChar(char),
    /// Insert a line break (Enter); in the title, moves focus to content
    InsertNewline,
    /// Delete character before cursor (Backspace)
    DeleteBack,
    /// Delete character at cursor (Delete)
    DeleteForward,
    /// Move cursor in a direction
    MoveCursor(Direction),
    /// Move cursor to beginning of line (Home)
    MoveHome,
    /// Move cursor to end of line (End)
    MoveEnd,
    /// Move cursor one word left (Ctrl+Left)
    MoveWordLeft,
    /// Move cursor one word right (Ctrl+Right)
    MoveWordRight,
    /// Move cursor to start of buffer (Ctrl+Home)
    MoveToStart,
    /// Move cursor to end of buffer (Ctrl+End)
    MoveToEnd,
    /// Move content cursor to absolute position (line, col) - mouse click
    MoveTo(usize, usize),
    /// Scroll the content area up by n wrapped rows
    ScrollUp(usize),
    /// Scroll the content area down by n wrapped rows
    ScrollDown(usize),

    // Remote lifecycle
    /// The initial fetch landed
    LoadArrived(NoteRecord),
    /// The initial fetch failed; fall through to an empty editor
    LoadFailed,
    /// A persistence write was handed to the worker
    SaveDispatched,
    /// A persistence write finished (either way, the indicator clears)
    SaveSettled { ok: bool },
    /// Force any pending debounced save to dispatch now (Ctrl+S)
    FlushSave,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Quit the application
    Quit,
}

impl Message {
    /// Whether this message can mutate note text.
    pub const fn is_edit(&self) -> bool {
        matches!(
            self,
            Self::InsertChar(_) | Self::InsertNewline | Self::DeleteBack | Self::DeleteForward
        )
    }
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// No side effects should occur in this function.
pub fn update(mut model: Model, msg: Message) -> Model {
    model.last_edit = None;

    // Expired notes are read-only and loading has no inputs yet: text
    // mutations are ignored wholesale in those states.
    if (model.expired || model.loading) && msg.is_edit() {
        return model;
    }

    match msg {
        // Focus
        Message::FocusTitle => model.focus = Field::Title,
        Message::FocusContent => model.focus = Field::Content,
        Message::SwitchFocus => {
            model.focus = match model.focus {
                Field::Title => Field::Content,
                Field::Content => Field::Title,
            };
        }

        // Editing
        Message::InsertChar(ch) => {
            let changed = match model.focus {
                Field::Title => model.title.insert_char(ch),
                Field::Content => model.content.insert_char(ch),
            };
            if changed {
                model.last_edit = Some(model.focus);
                model.resize_content_area();
            }
        }
        Message::InsertNewline => match model.focus {
            // The title is single-line; Enter moves on to the content.
            Field::Title => model.focus = Field::Content,
            Field::Content => {
                model.content.split_line();
                model.last_edit = Some(Field::Content);
                model.resize_content_area();
            }
        },
        Message::DeleteBack => {
            let changed = match model.focus {
                Field::Title => model.title.delete_back(),
                Field::Content => model.content.delete_back(),
            };
            if changed {
                model.last_edit = Some(model.focus);
                model.resize_content_area();
            }
        }
        Message::DeleteForward => {
            let changed = match model.focus {
                Field::Title => model.title.delete_forward(),
                Field::Content => model.content.delete_forward(),
            };
            if changed {
                model.last_edit = Some(model.focus);
                model.resize_content_area();
            }
        }
        Message::MoveCursor(dir) => {
            match model.focus {
                Field::Title => model.title.move_cursor(dir),
                Field::Content => model.content.move_cursor(dir),
            }
            model.ensure_cursor_visible();
        }
        Message::MoveHome => match model.focus {
            Field::Title => model.title.move_home(),
            Field::Content => {
                model.content.move_home();
                model.ensure_cursor_visible();
            }
        },
        Message::MoveEnd => match model.focus {
            Field::Title => model.title.move_end(),
            Field::Content => {
                model.content.move_end();
                model.ensure_cursor_visible();
            }
        },
        Message::MoveWordLeft => match model.focus {
            Field::Title => model.title.move_word_left(),
            Field::Content => {
                model.content.move_word_left();
                model.ensure_cursor_visible();
            }
        },
        Message::MoveWordRight => match model.focus {
            Field::Title => model.title.move_word_right(),
            Field::Content => {
                model.content.move_word_right();
                model.ensure_cursor_visible();
            }
        },
        Message::MoveToStart => match model.focus {
            Field::Title => model.title.move_to_start(),
            Field::Content => {
                model.content.move_to_start();
                model.ensure_cursor_visible();
            }
        },
        Message::MoveToEnd => match model.focus {
            Field::Title => model.title.move_to_end(),
            Field::Content => {
                model.content.move_to_end();
                model.ensure_cursor_visible();
            }
        },
        Message::MoveTo(line, col) => {
            model.focus = Field::Content;
            model.content.move_to(line, col);
            model.ensure_cursor_visible();
        }
        Message::ScrollUp(n) => {
            model.scroll_offset = model.scroll_offset.saturating_sub(n);
        }
        Message::ScrollDown(n) => {
            let total = model.content.wrapped_rows(model.content_width());
            let max = total.saturating_sub(usize::from(model.content_rows));
            model.scroll_offset = (model.scroll_offset + n).min(max);
        }

        // Remote lifecycle
        Message::LoadArrived(note) => {
            // The fetched note replaces local state even if the user typed
            // while the fetch was outstanding (unmitigated race).
            model.title.set_text(&note.title);
            model.content.set_text(&note.content);
            model.loading = false;
            model.loaded = true;
            model.scroll_offset = 0;
            model.resize_content_area();
        }
        Message::LoadFailed => {
            model.loading = false;
            model.loaded = true;
        }
        Message::SaveDispatched => {
            model.saving = true;
            model.title.mark_clean();
            model.content.mark_clean();
        }
        Message::SaveSettled { ok: _ } => {
            // Success and failure look the same here: the indicator clears
            // and the failure was already logged at the worker.
            model.saving = false;
        }
        // FlushSave: handled in the event loop (side effect)
        // Redraw: no state change needed
        Message::FlushSave | Message::Redraw => {}

        // Window
        Message::Resize(width, height) => {
            model.frame_width = width;
            model.frame_height = height;
            model.resize_content_area();
        }

        // Application
        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,
        Message::Quit => model.should_quit = true,
    }

    model
}
