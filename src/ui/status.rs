use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Model;

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let note_label = model
        .note_id
        .as_deref()
        .map_or_else(|| "scratch".to_string(), |id| format!("note {id}"));

    let cursor = model.content.cursor();
    let cursor_info = format!("Ln {}, Col {}", cursor.line + 1, cursor.col + 1);

    let state_indicator = if model.loading {
        " [loading]"
    } else if model.expired {
        " [expired]"
    } else if model.saving {
        " [saving…]"
    } else if model.backend_linked() && model.is_dirty() {
        " [unsaved]"
    } else {
        ""
    };

    let status = format!(
        " {}  {}  {}{}  F1:help",
        model.logo_text, note_label, cursor_info, state_indicator
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        crate::app::ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        crate::app::ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
