use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::{App, DraftField, IssueModal};

pub fn render(frame: &mut Frame, app: &App) {
    let (draft, error, submitting) = match &app.modal {
        IssueModal::Editing { draft, error } => (draft, error.as_deref(), false),
        IssueModal::Submitting { draft } => (draft, None, true),
        IssueModal::Closed => return,
    };

    let area = centered_rect(60, 12, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        " New Issue ",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    render_field(
        frame,
        chunks[0],
        "Title",
        &draft.title,
        !submitting && draft.field == DraftField::Title,
    );
    render_field(
        frame,
        chunks[1],
        "Description",
        &draft.body,
        !submitting && draft.field == DraftField::Body,
    );

    let footer = if submitting {
        Line::from(Span::styled(
            "Creating...",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(message) = error {
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::from(Span::styled(
            "Enter: create | Tab: switch field | Esc: cancel",
            Style::default().fg(Color::Gray),
        ))
    };
    frame.render_widget(Paragraph::new(footer), chunks[2]);
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let field = Paragraph::new(value).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", label))
            .border_style(border_style),
    );
    frame.render_widget(field, area);

    if focused {
        let cursor_x = area.x + 1 + value.chars().count() as u16;
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// Create a centered rect inside the outer rect
fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let popup_width = width.min(outer.width);
    let popup_height = height.min(outer.height);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((outer.height.saturating_sub(popup_height)) / 2),
            Constraint::Length(popup_height),
            Constraint::Min(0),
        ])
        .split(outer);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((outer.width.saturating_sub(popup_width)) / 2),
            Constraint::Length(popup_width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}
