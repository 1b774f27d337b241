use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::{App, InputMode, ViewMode};
use crate::types::Movie;
use crate::window::PagerEntry;

use super::thousands;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    render_search_bar(frame, app, chunks[0]);

    match app.view_mode {
        ViewMode::Paged => {
            render_movie_list(frame, app, &app.browse.movies, app.browse_index, chunks[1]);
            render_pager(frame, app, chunks[2]);
        }
        ViewMode::Infinite => {
            render_movie_list(frame, app, &app.feed.items, app.feed_index, chunks[1]);
            render_feed_tail(frame, app, chunks[2]);
        }
    }
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let active = app.input_mode == InputMode::Search;

    let text = if active {
        format!("{}▏", app.search_input)
    } else if app.browse.query.search.is_empty() {
        "Press / to search".to_string()
    } else {
        app.browse.query.search.clone()
    };

    let style = if active || !app.browse.query.search.is_empty() {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Search ")
        .border_style(if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        });

    frame.render_widget(Paragraph::new(text).style(style).block(block), area);
}

fn render_movie_list(frame: &mut Frame, app: &App, movies: &[Movie], selected: usize, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Movies ");

    if movies.is_empty() {
        let message = if app.browse.loading || app.feed.fetching {
            "Loading movies...".to_string()
        } else if !app.browse.query.search.is_empty() {
            format!(
                "No movies found for \"{}\" - press c to clear the search",
                app.browse.query.search
            )
        } else {
            "No movies found".to_string()
        };
        let empty = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;
    let fixed = 62; // title(40) + rating(6) + date(10) + spaces(6)
    let flex = w.saturating_sub(fixed).max(10);

    let items: Vec<ListItem> = movies
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            let style = if i == selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let title = truncate(&movie.title, 40);
            let date = movie
                .release_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "          ".to_string());
            let overview = truncate(movie.overview.lines().next().unwrap_or(""), flex);

            let line = Line::from(vec![
                Span::styled(format!("{:<40}", title), style),
                Span::raw("  "),
                Span::styled(
                    format!("★ {:>4.1}", movie.vote_average),
                    Style::default().fg(rating_color(movie.vote_average)),
                ),
                Span::raw("  "),
                Span::styled(date, Style::default().fg(Color::DarkGray)),
                Span::raw("  "),
                Span::styled(
                    format!("{:<flex$}", overview),
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
    state.select(Some(selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_pager(frame: &mut Frame, app: &App, area: Rect) {
    let browse = &app.browse;
    let block = Block::default().borders(Borders::ALL);

    let window = browse.pager_window();
    if window.is_empty() {
        let summary = format!("{} results", thousands(browse.total_results));
        frame.render_widget(
            Paragraph::new(summary)
                .style(Style::default().fg(Color::Gray))
                .block(block),
            area,
        );
        return;
    }

    let mut spans: Vec<Span> = Vec::with_capacity(window.len() + 2);
    for entry in window {
        match entry {
            PagerEntry::Page(p) if p == browse.query.page => {
                spans.push(Span::styled(
                    format!(" {} ", p),
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ));
            }
            PagerEntry::Page(p) => {
                spans.push(Span::styled(
                    format!(" {} ", p),
                    Style::default().fg(Color::Gray),
                ));
            }
            PagerEntry::Ellipsis => {
                spans.push(Span::styled(" … ", Style::default().fg(Color::DarkGray)));
            }
        }
    }

    spans.push(Span::raw("   "));
    spans.push(Span::styled(
        format!(
            "Page {} of {} | {} results",
            browse.query.page,
            browse.total_pages,
            thousands(browse.total_results)
        ),
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_feed_tail(frame: &mut Frame, app: &App, area: Rect) {
    let feed = &app.feed;
    let block = Block::default().borders(Borders::ALL);

    let line = if let Some(error) = &feed.error {
        Line::from(vec![
            Span::styled(format!("Error: {}", error), Style::default().fg(Color::Red)),
            Span::raw("  "),
            Span::styled("r: retry", Style::default().fg(Color::Gray)),
        ])
    } else if feed.fetching {
        Line::from(Span::styled(
            "Loading more...",
            Style::default().fg(Color::Yellow),
        ))
    } else if feed.exhausted {
        Line::from(Span::styled(
            format!("{} movies loaded - end of results", feed.items.len()),
            Style::default().fg(Color::Gray),
        ))
    } else {
        Line::from(Span::styled(
            format!(
                "{} of {} loaded",
                feed.items.len(),
                thousands(feed.total_results)
            ),
            Style::default().fg(Color::DarkGray),
        ))
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn rating_color(vote_average: f64) -> Color {
    if vote_average >= 7.0 {
        Color::Green
    } else if vote_average >= 5.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
