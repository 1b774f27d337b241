use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::tmdb;
use crate::types::MovieDetail;

use super::thousands;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(movie) = &app.detail else {
        let block = Block::default().borders(Borders::ALL).title(" Movie ");
        let empty = Paragraph::new("No movie selected")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(0),
            Constraint::Length(7),
        ])
        .split(area);

    render_header(frame, movie, chunks[0]);
    render_overview(frame, app, movie, chunks[1]);
    render_facts(frame, app, movie, chunks[2]);
}

fn render_header(frame: &mut Frame, movie: &MovieDetail, area: Rect) {
    let rating_color = if movie.vote_average >= 7.0 {
        Color::Green
    } else if movie.vote_average >= 5.0 {
        Color::Yellow
    } else {
        Color::Red
    };

    let mut meta = vec![Span::styled(
        format!("★ {:.1}/10", movie.vote_average),
        Style::default()
            .fg(rating_color)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(date) = movie.release_date {
        meta.push(Span::raw(" | "));
        meta.push(Span::raw(date.format("%B %e, %Y").to_string()));
    }
    if let Some(runtime) = movie.runtime {
        meta.push(Span::raw(" | "));
        meta.push(Span::raw(format!("{}h {:02}m", runtime / 60, runtime % 60)));
    }

    let genres = movie
        .genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        Line::from(Span::styled(
            movie.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(meta),
        Line::from(Span::styled(genres, Style::default().fg(Color::Cyan))),
    ];

    if let Some(tagline) = movie.tagline.as_deref().filter(|t| !t.is_empty()) {
        lines.push(Line::from(Span::styled(
            format!("\"{}\"", tagline),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let header =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Details "));
    frame.render_widget(header, area);
}

fn render_overview(frame: &mut Frame, app: &App, movie: &MovieDetail, area: Rect) {
    let overview = if movie.overview.is_empty() {
        "No overview available."
    } else {
        movie.overview.as_str()
    };

    // The overview is usually one long paragraph, so estimate its wrapped
    // height to bound scrolling rather than counting raw lines.
    let inner_height = area.height.saturating_sub(2) as usize;
    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let wrapped_lines: usize = overview
        .lines()
        .map(|l| l.chars().count().div_ceil(inner_width).max(1))
        .sum();
    let max_scroll = wrapped_lines.saturating_sub(inner_height);
    let scroll_offset = app.scroll_offset.min(max_scroll);

    let lines: Vec<Line> = overview.lines().map(Line::from).collect();
    let body = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .scroll((scroll_offset as u16, 0))
        .block(Block::default().borders(Borders::ALL).title(" Overview "));

    frame.render_widget(body, area);
}

fn render_facts(frame: &mut Frame, app: &App, movie: &MovieDetail, area: Rect) {
    let label = Style::default().fg(Color::Gray);

    let lines = vec![
        Line::from(vec![
            Span::styled("Status:   ", label),
            Span::raw(movie.status.clone()),
        ]),
        Line::from(vec![
            Span::styled("Language: ", label),
            Span::raw(movie.original_language.to_uppercase()),
        ]),
        Line::from(vec![
            Span::styled("Budget:   ", label),
            Span::raw(format!("${}", thousands(movie.budget))),
            Span::raw("   "),
            Span::styled("Revenue: ", label),
            Span::raw(format!("${}", thousands(movie.revenue))),
        ]),
        Line::from(vec![
            Span::styled("Poster:   ", label),
            Span::styled(
                tmdb::image_url(movie.poster_path.as_deref(), &app.poster_size),
                Style::default().fg(Color::Blue),
            ),
        ]),
        Line::from(Span::styled(
            "Data provided by The Movie Database (TMDB)",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let facts = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(facts, area);
}
