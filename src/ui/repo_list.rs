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
    super::render_page_bar(frame, &app.repo_pager, chunks[1]);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let title = match &app.selected_login {
        Some(login) => format!(
            " {}'s Repositories ({}) ",
            login,
            app.repo_pager.total_count()
        ),
        None => " Repositories ".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if app.repos.is_empty() && !app.repo_status.loading {
        let empty = Paragraph::new("No repositories found")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;
    let fixed = 50; // name(30) + space(1) + stars(8) + space(1) + watchers(8) + spaces(2)
    let flex = w.saturating_sub(fixed).max(10);

    let items: Vec<ListItem> = app
        .repos
        .iter()
        .enumerate()
        .map(|(i, repo)| {
            let style = if i == app.repo_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let name = if repo.name.len() > 30 {
                format!("{}...", &repo.name[..27])
            } else {
                repo.name.clone()
            };

            let description = repo
                .description
                .as_ref()
                .map(|d| {
                    if d.len() > flex {
                        format!("{}...", &d[..flex.saturating_sub(3)])
                    } else {
                        d.clone()
                    }
                })
                .unwrap_or_default();

            let line = Line::from(vec![
                Span::styled(format!("{:<30}", name), style),
                Span::raw(" "),
                Span::styled(
                    format!("★ {:>6}", repo.stargazer_count),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("⊙ {:>6}", repo.watcher_count),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("{:<flex$}", description),
                    Style::default().fg(Color::Gray),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    if !app.repos.is_empty() {
        state.select(Some(app.repo_index));
    }

    frame.render_stateful_widget(list, area, &mut state);
}
