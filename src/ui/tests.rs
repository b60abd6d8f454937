use ratatui::Terminal;
use ratatui::backend::TestBackend;

use super::render;
use crate::app::{Field, Message, Model, update};
use crate::remote::NoteRecord;

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(80, 24);
    Terminal::new(backend).unwrap()
}

fn draw(model: &Model) -> String {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(ratatui::buffer::Cell::symbol)
        .collect()
}

fn linked_model() -> Model {
    Model::new(
        Some("abc123".to_string()),
        Some(NoteRecord {
            title: "Groceries".to_string(),
            content: "milk and eggs".to_string(),
        }),
        "NoteSpace".to_string(),
        false,
        (80, 24),
    )
}

#[test]
fn test_loading_state_renders_placeholder_without_inputs() {
    let model = Model::new(
        Some("abc123".to_string()),
        None,
        "NoteSpace".to_string(),
        false,
        (80, 24),
    );
    assert!(model.loading);

    let content = draw(&model);
    assert!(content.contains("Loading note"));
    assert!(
        !content.contains("Title"),
        "loading view must not render inputs"
    );
    assert!(content.contains("[loading]"));
}

#[test]
fn test_expired_state_renders_notice_without_inputs() {
    let model = Model::new(
        Some("abc123".to_string()),
        None,
        "NoteSpace".to_string(),
        true,
        (80, 24),
    );
    assert!(!model.loading, "expired notes do not load");

    let content = draw(&model);
    assert!(content.contains("This note has expired."));
    assert!(content.contains("Open notespace again to start a new note."));
    assert!(!content.contains("Title"));
    assert!(content.contains("[expired]"));
}

#[test]
fn test_editor_renders_title_content_and_note_label() {
    let content = draw(&linked_model());
    assert!(content.contains("Title"));
    assert!(content.contains("Groceries"));
    assert!(content.contains("milk and eggs"));
    assert!(content.contains("Note abc123"));
    assert!(content.contains("NoteSpace"));
}

#[test]
fn test_scratch_mode_is_labelled() {
    let model = Model::new(None, None, "NoteSpace".to_string(), false, (80, 24));
    let content = draw(&model);
    assert!(content.contains("Scratch"));
    assert!(content.contains("scratch"));
}

#[test]
fn test_empty_title_shows_placeholder() {
    let model = Model::new(None, None, "NoteSpace".to_string(), false, (80, 24));
    assert_eq!(model.focus, Field::Content);
    let content = draw(&model);
    assert!(content.contains("Untitled"));
}

#[test]
fn test_saving_indicator_appears_while_write_in_flight() {
    let mut model = linked_model();
    assert!(!draw(&model).contains("Saving"));

    model = update(model, Message::SaveDispatched);
    assert!(model.saving);
    let content = draw(&model);
    assert!(content.contains("Saving"));
    assert!(content.contains("[saving"));

    model = update(model, Message::SaveSettled { ok: true });
    assert!(!draw(&model).contains("Saving"));
}

#[test]
fn test_saving_indicator_clears_on_failure_too() {
    let mut model = linked_model();
    model = update(model, Message::SaveDispatched);
    model = update(model, Message::SaveSettled { ok: false });
    // Failure is silent: the indicator disappears, nothing else is shown.
    let content = draw(&model);
    assert!(!content.contains("Saving"));
    assert!(!content.contains("error"));
}

#[test]
fn test_help_overlay_lists_bindings() {
    let model = update(linked_model(), Message::ToggleHelp);
    let content = draw(&model);
    assert!(content.contains("Help"));
    assert!(content.contains("Ctrl+S"));
}

#[test]
fn test_content_area_grows_with_text() {
    let mut model = Model::new(None, None, "NoteSpace".to_string(), false, (80, 24));
    let initial_rows = model.content_rows;

    for _ in 0..6 {
        model = update(model, Message::InsertChar('x'));
        model = update(model, Message::InsertNewline);
    }
    assert!(model.content_rows > initial_rows);

    // And it is clamped to what the frame can hold.
    for _ in 0..40 {
        model = update(model, Message::InsertNewline);
    }
    assert_eq!(model.content_rows, model.max_content_rows());
}

#[test]
fn test_editor_areas_track_content_rows() {
    let model = linked_model();
    let area = ratatui::layout::Rect::new(0, 0, 80, 24);
    let areas = super::editor_areas(&model, area);
    assert_eq!(areas.title.height, super::TITLE_HEIGHT);
    assert_eq!(
        areas.content.height,
        model.content_rows + super::CONTENT_CHROME
    );
    assert_eq!(areas.content.y, areas.title.height);
}
