// src/core/scanner/http_scanner.rs

use tracing::{debug, info, warn};

use crate::core::config::ScanConfig;
use crate::core::models::{HttpStatus, Page, ProbeFailure};
use color_eyre::eyre::{Result, WrapErr};
use fastrand::Rng;
use reqwest::header::USER_AGENT;
use reqwest::{Client, Response};
use std::error::Error as _;
use std::io;
use std::sync::Arc;

/// Picks one identity from the pool. Returns `None` for an empty pool.
pub fn pick_user_agent<'a>(pool: &'a [String], rng: &mut Rng) -> Option<&'a str> {
    rng.choice(pool.iter()).map(String::as_str)
}

/// Issues the GET requests of the scan pipeline.
///
/// One `reqwest::Client` is shared by every probe (and by the theme detector)
/// so connections are pooled across a batch. Connection failures are retried
/// at the transport level, up to `retries` extra attempts, before surfacing.
#[derive(Clone)]
pub struct HttpProber {
    client: Client,
    config: Arc<ScanConfig>,
}

impl HttpProber {
    pub fn new(config: Arc<ScanConfig>) -> Result<Self> {
        let client = Client::builder()
            .use_rustls_tls()
            .timeout(config.request_timeout())
            .build()
            .wrap_err("failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    /// Probes `url` for liveness.
    ///
    /// On a response, returns its status code and, when the body could be
    /// read, the page itself for reuse by the theme detector.
    pub async fn probe(&self, url: &str) -> (HttpStatus, Option<Page>) {
        info!(url, "Probing HTTP endpoint.");
        let response = match self.send(url).await {
            Ok(response) => response,
            Err(failure) => return (HttpStatus::Failed(failure), None),
        };

        let status = response.status().as_u16();
        info!(url, status, "Received HTTP response.");
        match response.text().await {
            Ok(body) => {
                debug!(bytes = body.len(), "Read response body.");
                (HttpStatus::Code(status), Some(Page { status, body }))
            }
            Err(e) => {
                warn!(url, error = %e, "Failed to read response body.");
                (HttpStatus::Code(status), None)
            }
        }
    }

    /// Fetches `url` and reads its body, whatever the status code.
    pub async fn fetch(&self, url: &str) -> Result<Page, ProbeFailure> {
        let response = self.send(url).await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            warn!(url, error = %e, "Failed to read response body.");
            ProbeFailure::RequestError
        })?;
        Ok(Page { status, body })
    }

    async fn send(&self, url: &str) -> Result<Response, ProbeFailure> {
        let user_agent = pick_user_agent(&self.config.user_agents, &mut Rng::new());
        let mut attempt = 0;
        loop {
            let mut request = self.client.get(url);
            if let Some(user_agent) = user_agent {
                request = request.header(USER_AGENT, user_agent);
            }

            match request.send().await {
                Ok(response) => return Ok(response),
                Err(e) if should_retry(&e, attempt, self.config.retries) => {
                    attempt += 1;
                    debug!(url, attempt, error = %e, "Connection failed, retrying.");
                }
                Err(e) => {
                    let failure = classify(&e);
                    warn!(url, error = %e, %failure, "HTTP request failed.");
                    return Err(failure);
                }
            }
        }
    }
}

/// Maps a transport error to exactly one failure kind, in priority order:
/// TLS, connection, deadline, anything else.
pub fn classify(error: &reqwest::Error) -> ProbeFailure {
    if is_tls_failure(error) {
        ProbeFailure::SslError
    } else if error.is_connect() {
        ProbeFailure::Unreachable
    } else if error.is_timeout() {
        ProbeFailure::Timeout
    } else {
        ProbeFailure::RequestError
    }
}

/// The TLS stack reports handshake and certificate problems as I/O errors of
/// kind `InvalidData`, or `UnexpectedEof` when the peer hangs up mid-handshake.
/// The connector wraps that error in another `io::Error`, whose `source()`
/// skips the wrapped error, so each I/O layer is also opened by hand down to
/// the `rustls::Error`.
fn is_tls_failure(error: &reqwest::Error) -> bool {
    let mut source = error.source();
    while let Some(err) = source {
        if is_tls_io_error(err) {
            return true;
        }
        source = err.source();
    }
    false
}

fn is_tls_io_error(error: &(dyn std::error::Error + 'static)) -> bool {
    if error.is::<rustls::Error>() {
        return true;
    }
    let Some(io_err) = error.downcast_ref::<io::Error>() else {
        return false;
    };
    matches!(io_err.kind(), io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof)
        || io_err.get_ref().is_some_and(|inner| is_tls_io_error(inner))
}

fn is_retryable(error: &reqwest::Error) -> bool {
    error.is_connect() && !error.is_timeout() && !is_tls_failure(error)
}

/// Whether a failed attempt number `attempt` (zero-based) may be followed by
/// another one.
fn should_retry(error: &reqwest::Error, attempt: u32, retries: u32) -> bool {
    attempt < retries && is_retryable(error)
}
