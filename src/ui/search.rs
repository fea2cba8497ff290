use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::{App, SearchFocus};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_input(frame, app, chunks[0]);
    render_results(frame, app, chunks[1]);
    render_avatar_hint(frame, app, chunks[2]);
}

/// Terminals don't render avatars; surface the URL for the highlighted user.
fn render_avatar_hint(frame: &mut Frame, app: &App, area: Rect) {
    let Some(user) = app.users.get(app.user_index) else {
        return;
    };
    if user.avatar_url.is_empty() {
        return;
    }
    let hint = Paragraph::new(Line::from(vec![
        Span::styled("avatar: ", Style::default().fg(Color::DarkGray)),
        Span::styled(user.avatar_url.as_str(), Style::default().fg(Color::Gray)),
    ]));
    frame.render_widget(hint, area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.search_focus == SearchFocus::Input;
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let input = Paragraph::new(app.query.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search GitHub Users ")
            .border_style(border_style),
    );
    frame.render_widget(input, area);

    if focused {
        let cursor_x = area.x + 1 + app.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.search_focus == SearchFocus::Results;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Users ({}) ", app.users.len()))
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        });

    if app.users.is_empty() && !app.search_status.loading {
        let empty = Paragraph::new("No users - enter a query and press Enter")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .users
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let style = if focused && i == app.user_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let login = if user.login.len() > 30 {
                format!("{}...", &user.login[..27])
            } else {
                user.login.clone()
            };

            let line = Line::from(vec![
                Span::styled(format!("{:<30}", login), style),
                Span::raw(" "),
                Span::styled(
                    format!("{:>5} repos", user.repository_count),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    if !app.users.is_empty() {
        state.select(Some(app.user_index));
    }

    frame.render_stateful_widget(list, area, &mut state);
}
