// src/ui/widgets/results.rs

use crate::app::{App, AppState, SPINNER_CHARS};
use crate::core::models::{ProbeResult, StatusClass};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Renders one card per finished domain, newest at the bottom.
pub fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Results (Navigate with ↑ ↓)");

    if app.results.is_empty() {
        let placeholder = match app.state {
            AppState::Idle => Paragraph::new("Results will appear here, one card per domain."),
            AppState::Scanning => Paragraph::new(Line::from(vec![
                Span::styled(
                    format!("{} ", SPINNER_CHARS[app.spinner_frame]),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw("Probing the first domain..."),
            ])),
            AppState::Finished => Paragraph::new("No results."),
        };
        frame.render_widget(placeholder.alignment(Alignment::Center).block(block), area);
        return;
    }

    let lines: Vec<Line> = app.results.iter().flat_map(card_lines).collect();
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, area);
}

/// Card colour follows the status: green for 2xx, red for 4xx/5xx, yellow
/// for everything else.
fn status_color(result: &ProbeResult) -> Color {
    match result.http_status.class() {
        StatusClass::Success => Color::Green,
        StatusClass::Failure => Color::Red,
        StatusClass::Other => Color::Yellow,
    }
}

fn card_lines(result: &ProbeResult) -> Vec<Line<'static>> {
    let color = status_color(result);
    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {label} = "), Style::default().fg(Color::DarkGray)),
            Span::raw(value),
        ])
    };

    vec![
        Line::from(Span::styled(result.hostname.clone(), Style::default().fg(color).bold())),
        Line::from(vec![
            Span::styled("  Status = ", Style::default().fg(Color::DarkGray)),
            Span::styled(result.http_status.to_string(), Style::default().fg(color)),
        ]),
        field("A", result.a_record.clone()),
        field("NS", result.nameservers.clone()),
        field("WP THEME", result.theme.to_string()),
        Line::from(""),
    ]
}
