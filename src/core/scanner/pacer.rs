// src/core/scanner/pacer.rs

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// A token bucket holding a single token, refilled `interval` after it was
/// taken.
///
/// Runs on the tokio clock, so a test with a paused runtime can fast-forward
/// through the waits instead of sleeping for real.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    next_token: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval, next_token: None }
    }

    /// Waits until the token is available. Returns at once on a fresh pacer.
    pub async fn until_ready(&self) {
        if let Some(at) = self.next_token {
            sleep_until(at).await;
        }
    }

    /// Takes the token; the next `until_ready` waits a full interval from now.
    pub fn consume(&mut self) {
        self.next_token = Some(Instant::now() + self.interval);
    }
}
