use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

const HELP_TEXT: &[(&str, &str)] = &[
    ("Tab", "switch between title and content"),
    ("Enter", "new line (in title: jump to content)"),
    ("Ctrl+S", "save now"),
    ("Ctrl+Left/Right", "move by word"),
    ("Ctrl+Home/End", "start / end of note"),
    ("PgUp/PgDn", "scroll"),
    ("F1", "toggle this help"),
    ("Esc", "quit"),
];

pub fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let height = u16::try_from(HELP_TEXT.len() + 2).unwrap_or(u16::MAX);
    let popup = centered_rect(area, 46, height);

    let lines: Vec<Line> = HELP_TEXT
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(
                    format!(" {key:<16}"),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw((*action).to_string()),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
