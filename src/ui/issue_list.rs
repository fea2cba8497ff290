use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    render_list(frame, app, chunks[0]);
    super::render_page_bar(frame, &app.issue_pager, chunks[1]);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(format!(
        " Open Issues ({}) ",
        app.issue_pager.total_count()
    ));

    if app.issues.is_empty() && !app.issue_status.loading {
        let empty = Paragraph::new("No open issues - press c to create one")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;
    let fixed = 29; // date(10) + space(1) + @author(16) + spaces(2)
    let flex = w.saturating_sub(fixed).max(10);

    let items: Vec<ListItem> = app
        .issues
        .iter()
        .enumerate()
        .map(|(i, issue)| {
            let style = if i == app.issue_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let title = if issue.title.len() > flex {
                format!("{}...", &issue.title[..flex.saturating_sub(3)])
            } else {
                issue.title.clone()
            };

            // "ghost" is GitHub's stand-in for deleted accounts.
            let author = issue.author_login.as_deref().unwrap_or("ghost");
            let author = if author.len() > 15 {
                format!("{}...", &author[..12])
            } else {
                author.to_string()
            };

            let line = Line::from(vec![
                Span::styled(format!("{:<flex$}", title), style),
                Span::raw(" "),
                Span::styled(
                    issue.created_at.format("%Y-%m-%d").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw("  "),
                Span::styled(format!("@{:<15}", author), Style::default().fg(Color::Gray)),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    if !app.issues.is_empty() {
        state.select(Some(app.issue_index));
    }

    frame.render_stateful_widget(list, area, &mut state);
}
