// src/app.rs

use crate::core::models::{HttpStatus, ProbeResult, StatusClass};
use crate::core::scanner::normalizer::split_tokens;
use crate::core::scanner::Scanner;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::info;

pub const SPINNER_CHARS: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub enum AppState {
    Idle,
    Scanning,
    Finished,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub requested: usize,
    pub completed: usize,
    pub success: usize,
    pub http_errors: usize,
    pub unreachable: usize,
    pub wordpress: usize,
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    pub results: Vec<ProbeResult>,
    pub summary: ScanSummary,
    pub scroll_offset: usize,
    pub spinner_frame: usize,
    pub receiver: Option<mpsc::Receiver<ProbeResult>>,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            state: AppState::Idle,
            input: String::new(),
            results: Vec::new(),
            summary: ScanSummary::default(),
            scroll_offset: 0,
            spinner_frame: 0,
            receiver: None,
        }
    }

    /// Starts scanning the domains typed in the input box. Does nothing when
    /// the input holds no domain.
    pub fn start_scan(&mut self, scanner: &Scanner) {
        let tokens = split_tokens(&self.input);
        if tokens.is_empty() {
            return;
        }
        info!(domains = tokens.len(), "Scan requested from the UI.");
        self.results.clear();
        self.scroll_offset = 0;
        self.summary = ScanSummary { requested: tokens.len(), ..Default::default() };
        self.receiver = Some(scanner.spawn(tokens));
        self.state = AppState::Scanning;
    }

    /// Moves every result that has arrived so far into the view.
    pub fn poll_results(&mut self) {
        let Some(receiver) = self.receiver.as_mut() else { return };
        loop {
            match receiver.try_recv() {
                Ok(result) => self.results.push(result),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.receiver = None;
                    self.state = AppState::Finished;
                    break;
                }
            }
        }
        self.update_summary();
    }

    /// Abandons the running scan; the worker stops once it notices.
    pub fn cancel_scan(&mut self) {
        if self.receiver.take().is_some() {
            info!(completed = self.results.len(), "Scan cancelled from the UI.");
            self.state = AppState::Finished;
        }
    }

    pub fn update_summary(&mut self) {
        let mut summary = ScanSummary {
            requested: self.summary.requested,
            completed: self.results.len(),
            ..Default::default()
        };
        for result in &self.results {
            match (result.http_status, result.http_status.class()) {
                (HttpStatus::Failed(_), _) => summary.unreachable += 1,
                (_, StatusClass::Success) => summary.success += 1,
                (_, StatusClass::Failure) => summary.http_errors += 1,
                _ => {}
            }
            if result.theme.is_wordpress() {
                summary.wordpress += 1;
            }
        }
        self.summary = summary;
    }

    pub fn on_tick(&mut self) {
        if let AppState::Scanning = self.state {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    pub fn quit(&mut self) {
        self.cancel_scan();
        self.should_quit = true;
    }

    pub fn reset(&mut self) {
        self.cancel_scan();
        self.state = AppState::Idle;
        self.input = String::new();
        self.results.clear();
        self.summary = ScanSummary::default();
        self.scroll_offset = 0;
        self.spinner_frame = 0;
    }
}
