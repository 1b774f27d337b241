mod browse;
mod detail;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode, Screen, ViewMode};

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

    match app.screen {
        Screen::Browse => browse::render(frame, app, chunks[1]),
        Screen::Detail => detail::render(frame, app, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.screen {
        Screen::Browse => {
            if app.browse.query.search.is_empty() {
                format!("reel - {} Movies", app.browse.category)
            } else {
                format!("reel - Search: \"{}\"", app.browse.query.search)
            }
        }
        Screen::Detail => {
            if let Some(movie) = &app.detail {
                format!("reel - {}", movie.title)
            } else {
                "reel - Movie".to_string()
            }
        }
    };

    let mut spans = vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    // The bookmarkable position, always visible while it is non-default.
    if !app.position.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("?{}", app.position),
            Style::default().fg(Color::Gray),
        ));
    }

    if let Some(name) = &app.profile_name {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("@{}", name),
            Style::default().fg(Color::Yellow),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(notice) = &app.notice {
        Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(error) = active_error(app) {
        Line::from(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        ))
    } else if is_loading(app) {
        Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        let help = if app.input_mode == InputMode::Search {
            "type to search | Enter: apply | Esc: done"
        } else {
            match (app.screen, app.view_mode) {
                (Screen::Browse, ViewMode::Paged) => {
                    "/: search | j/k: select | h/l: page | g/G: first/last | 1/2/3: category | v: infinite | Enter: open | y: yank | q: quit"
                }
                (Screen::Browse, ViewMode::Infinite) => {
                    "/: search | j/k: scroll | g/G: top/bottom | 1/2/3: category | v: paged | r: retry | Enter: open | q: quit"
                }
                (Screen::Detail, _) => "j/k: scroll | y: yank | o: browser | q: back",
            }
        };
        Line::from(Span::styled(help, Style::default().fg(Color::Gray)))
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

fn active_error(app: &App) -> Option<&str> {
    match (app.screen, app.view_mode) {
        (Screen::Browse, ViewMode::Paged) => app.browse.error.as_deref(),
        (Screen::Browse, ViewMode::Infinite) => app.feed.error.as_deref(),
        (Screen::Detail, _) => None,
    }
}

fn is_loading(app: &App) -> bool {
    if app.detail_loading {
        return true;
    }
    match (app.screen, app.view_mode) {
        (Screen::Browse, ViewMode::Paged) => app.browse.loading,
        (Screen::Browse, ViewMode::Infinite) => app.feed.fetching,
        (Screen::Detail, _) => false,
    }
}

/// 1234567 -> "1,234,567"
pub(super) fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
