// src/ui/widgets/summary.rs

use crate::app::{App, AppState};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
};

/// Renders the summary widget: scan progress and counters by outcome.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary_container = Block::default().borders(Borders::ALL).title("Summary");
    frame.render_widget(summary_container, area);

    let summary_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Progress label
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Counters
        ])
        .split(area);

    if let AppState::Idle = app.state {
        return;
    }

    let summary = &app.summary;
    let state_label = match app.state {
        AppState::Scanning => "Scanning".cyan(),
        _ => "Done".green(),
    };
    let progress = Text::from(vec![
        Line::from(state_label.bold()),
        Line::from(format!("{}/{} domains", summary.completed, summary.requested)),
    ]);
    frame.render_widget(Paragraph::new(progress).alignment(Alignment::Center), summary_chunks[0]);

    let percent = if summary.requested == 0 {
        0
    } else {
        (summary.completed * 100 / summary.requested).min(100) as u16
    };
    let gauge = Gauge::default()
        .percent(percent)
        .label("")
        .style(Style::default().fg(Color::Cyan));
    frame.render_widget(gauge, summary_chunks[1]);

    let counter = |label: &'static str, value: usize, color: Color| {
        Line::from(vec![
            Span::raw(format!("{label}: ")),
            Span::styled(value.to_string(), Style::default().fg(color)),
        ])
    };
    let counters = vec![
        counter("2xx", summary.success, Color::Green),
        counter("4xx/5xx", summary.http_errors, Color::Red),
        counter("Unreachable", summary.unreachable, Color::Yellow),
        counter("WordPress", summary.wordpress, Color::Cyan),
    ];
    let counters_block = Block::default().title("OUTCOMES".bold());
    frame.render_widget(Paragraph::new(counters).block(counters_block), summary_chunks[3]);
}
