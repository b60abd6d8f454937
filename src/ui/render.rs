use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{Field, Model};

use super::{CONTENT_CHROME, FOOTER_ROWS, TITLE_HEIGHT, overlays, status};

/// Top-anchored input areas of the editor view. Also used by mouse
/// hit-testing, so render and input always agree on the layout.
#[derive(Debug, Clone, Copy)]
pub struct EditorAreas {
    pub title: Rect,
    pub content: Rect,
}

/// Columns available to content text inside the bordered block.
pub fn content_inner_width(frame_width: u16) -> u16 {
    frame_width.saturating_sub(CONTENT_CHROME).max(1)
}

/// Rows the content area may grow to at the given frame height.
pub fn max_content_rows(frame_height: u16) -> u16 {
    frame_height
        .saturating_sub(TITLE_HEIGHT + CONTENT_CHROME + FOOTER_ROWS)
        .max(1)
}

/// Compute the title and content rects for the current model.
///
/// The content block wraps `model.content_rows` text rows; everything is
/// top-anchored so the footer rows never shift the inputs.
pub fn editor_areas(model: &Model, area: Rect) -> EditorAreas {
    let title = Rect {
        height: TITLE_HEIGHT.min(area.height),
        ..area
    };
    // Whatever does not fit simply renders zero-height; rects never extend
    // past the frame.
    let avail = area.height.saturating_sub(title.height + FOOTER_ROWS);
    let content = Rect {
        y: area.y + title.height,
        height: (model.content_rows + CONTENT_CHROME).min(avail),
        ..area
    };
    EditorAreas { title, content }
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();

    if model.loading {
        render_loading(model, frame, area);
        return;
    }
    if model.expired {
        render_expired(model, frame, area);
        return;
    }

    render_editor(model, frame, area);

    if model.help_visible {
        overlays::render_help_overlay(frame, area);
    }
}

fn render_loading(model: &Model, frame: &mut Frame, area: Rect) {
    let body_area = body_rect(area);
    let placeholder = Paragraph::new(vec![
        Line::raw(""),
        Line::styled("Loading note…", Style::default().fg(Color::DarkGray)),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(placeholder, body_area);
    status::render_status_bar(model, frame, status_rect(area));
}

fn render_expired(model: &Model, frame: &mut Frame, area: Rect) {
    let body_area = body_rect(area);
    let notice = Paragraph::new(vec![
        Line::raw(""),
        Line::styled(
            "This note has expired.",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::raw("Open notespace again to start a new note."),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(notice, body_area);
    status::render_status_bar(model, frame, status_rect(area));
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let areas = editor_areas(model, area);
    let toast_active = model.active_toast().is_some();
    let toast_area = Rect {
        y: area.y + area.height.saturating_sub(2),
        height: 1,
        ..area
    };

    render_title_input(model, frame, areas.title);
    render_content_area(model, frame, areas.content);

    if toast_active && area.height > TITLE_HEIGHT + CONTENT_CHROME + 1 {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, status_rect(area));
}

fn render_title_input(model: &Model, frame: &mut Frame, area: Rect) {
    let focused = model.focus == Field::Title;
    let block = Block::default()
        .title(" Title ")
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });

    let text = model.title.line_at(0).unwrap_or_default();
    let line = if focused {
        Line::from(cursor_spans(&text, model.title.cursor().col))
    } else if text.is_empty() {
        Line::styled("Untitled", Style::default().fg(Color::DarkGray))
    } else {
        Line::raw(text)
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_content_area(model: &Model, frame: &mut Frame, area: Rect) {
    let focused = model.focus == Field::Content;
    let label = model
        .note_id
        .as_deref()
        .map_or_else(|| " Scratch ".to_string(), |id| format!(" Note {id} "));

    let mut block = Block::default()
        .title(label)
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    if model.saving {
        block = block.title(
            Line::styled(" Saving… ", Style::default().fg(Color::Cyan)).right_aligned(),
        );
    }

    let cursor = model.content.cursor();
    let mut lines: Vec<Line> = Vec::with_capacity(model.content.line_count());
    for idx in 0..model.content.line_count() {
        let text = model.content.line_at(idx).unwrap_or_default();
        if focused && idx == cursor.line {
            lines.push(Line::from(cursor_spans(&text, cursor.col)));
        } else {
            lines.push(Line::raw(text));
        }
    }

    let scroll = u16::try_from(model.scroll_offset).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(block);
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

/// Split a line at the cursor byte column, highlighting the cursor cell.
fn cursor_spans(text: &str, col: usize) -> Vec<Span<'static>> {
    let col = col.min(text.len());
    let before = &text[..col];
    let cursor_char = text
        .get(col..)
        .and_then(|rest| rest.chars().next())
        .map_or(" ".to_string(), String::from);
    let after_start = col + cursor_char.len();
    let after = text.get(after_start..).unwrap_or("");

    let mut spans = Vec::with_capacity(3);
    if !before.is_empty() {
        spans.push(Span::raw(before.to_string()));
    }
    spans.push(Span::styled(
        cursor_char,
        Style::default().bg(Color::White).fg(Color::Black),
    ));
    if !after.is_empty() {
        spans.push(Span::raw(after.to_string()));
    }
    spans
}

const fn body_rect(area: Rect) -> Rect {
    Rect {
        height: area.height.saturating_sub(FOOTER_ROWS),
        ..area
    }
}

const fn status_rect(area: Rect) -> Rect {
    Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    }
}
