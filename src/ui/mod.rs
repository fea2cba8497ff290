mod issue_list;
mod issue_modal;
mod repo_list;
mod search;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, Screen, SearchFocus};
use crate::pagination::Pager;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.screen() {
        Screen::Search => search::render(frame, app, chunks[1]),
        Screen::Repositories => repo_list::render(frame, app, chunks[1]),
        Screen::Issues => issue_list::render(frame, app, chunks[1]),
    }

    if app.modal.is_open() {
        issue_modal::render(frame, app);
    }

    render_status_bar(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.screen() {
        Screen::Search => "hubble - User Search".to_string(),
        Screen::Repositories => match &app.selected_login {
            Some(login) => format!("hubble - {}'s repositories", login),
            None => "hubble - Repositories".to_string(),
        },
        Screen::Issues => match (&app.selected_login, &app.selected_repo) {
            (Some(login), Some(repo)) => format!("hubble - {}/{} issues", login, repo.name),
            _ => "hubble - Issues".to_string(),
        },
    };

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.current_status();
    let line = if let Some(error) = &status.error {
        Line::from(vec![Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )])
    } else if status.loading {
        Line::from(vec![Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = if app.modal.is_open() {
            "type to edit | Tab: field | Enter: create | Esc: cancel"
        } else {
            match app.screen() {
                Screen::Search => match app.search_focus {
                    SearchFocus::Input => "type to edit | Enter: search | Tab: results | Esc: quit",
                    SearchFocus::Results => {
                        "j/k: nav | Enter: select | /: edit query | o: browser | y: yank | q: quit"
                    }
                },
                Screen::Repositories => {
                    "j/k: nav | n/p: page | Enter: select | o: browser | y: yank | q: back"
                }
                Screen::Issues => {
                    "j/k: nav | n/p: page | c: new issue | o: browser | y: yank | q: back"
                }
            }
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

/// One-line pagination footer shared by the paged lists. The Previous/Next
/// affordances only appear when the corresponding page exists.
pub(super) fn render_page_bar(frame: &mut Frame, pager: &Pager, area: Rect) {
    let mut spans = vec![Span::styled(
        format!("Page {} of {}", pager.current_page(), pager.total_pages()),
        Style::default().fg(Color::Gray),
    )];
    if pager.has_previous() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "[p] Previous",
            Style::default().fg(Color::Cyan),
        ));
    }
    if pager.has_next() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("[n] Next", Style::default().fg(Color::Cyan)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
