// src/main.rs

use clap::Parser;
use color_eyre::eyre::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io::{stdout, Write};
use std::time::Duration;
use tracing::info;

mod app;
mod cli;
mod core;
mod logging;
mod ui;

use app::{App, AppState};
use cli::Cli;
use crate::core::config::ScanConfig;
use crate::core::scanner::normalizer::split_tokens;
use crate::core::scanner::Scanner;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let log_path = logging::initialize_logging()?;
    info!(log = %log_path.display(), "Logging initialized.");

    let config = cli.apply(ScanConfig::load(cli.config.as_deref())?).validated()?;
    let scanner = Scanner::new(config)?;

    if cli.domains.is_empty() {
        run_tui(&scanner)
    } else {
        let tokens: Vec<String> = cli.domains.iter().flat_map(|arg| split_tokens(arg)).collect();
        run_headless(&scanner, tokens, cli.json).await
    }
}

/// Streams results to stdout as each domain completes.
async fn run_headless(scanner: &Scanner, tokens: Vec<String>, json: bool) -> Result<()> {
    let mut results = scanner.scan(tokens);
    while let Some(result) = results.next().await {
        let mut out = stdout().lock();
        if json {
            writeln!(out, "{}", serde_json::to_string(&result)?)?;
        } else {
            writeln!(out, "{}\n", result.share_text())?;
        }
        out.flush()?;
    }
    Ok(())
}

fn run_tui(scanner: &Scanner) -> Result<()> {
    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let outcome = event_loop(&mut terminal, scanner);

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    outcome
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, scanner: &Scanner) -> Result<()> {
    let mut app = App::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(&mut app, scanner)?;
        }

        app.poll_results();
        app.on_tick();
    }
    Ok(())
}

fn handle_events(app: &mut App, scanner: &Scanner) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            match app.state {
                AppState::Idle => handle_idle_input(app, key.code, scanner),
                AppState::Scanning => handle_scanning_input(app, key.code),
                AppState::Finished => handle_finished_input(app, key.code),
            }
        }
    }
    Ok(())
}

/// Handles input while the user is typing domains.
fn handle_idle_input(app: &mut App, key_code: KeyCode, scanner: &Scanner) {
    match key_code {
        KeyCode::Char('q') if app.input.is_empty() => app.quit(),
        KeyCode::Esc => app.quit(),
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Enter => app.start_scan(scanner),
        _ => {}
    }
}

fn handle_scanning_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc => app.cancel_scan(),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        _ => {}
    }
}

/// Handles input once every result is on screen.
fn handle_finished_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('n') => app.reset(),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        _ => {}
    }
}
