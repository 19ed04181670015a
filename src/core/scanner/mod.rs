// src/core/scanner/mod.rs

// This file acts as the public interface for the `scanner` module.
// It declares every stage of the pipeline and the orchestrator that runs them.
pub mod dns_scanner;
pub mod http_scanner;
pub mod normalizer;
pub mod pacer;
pub mod theme_scanner;

use crate::core::config::ScanConfig;
use crate::core::models::ProbeResult;
use self::dns_scanner::DnsResolver;
use self::http_scanner::HttpProber;
use self::normalizer::normalize;
use self::pacer::Pacer;
use self::theme_scanner::detect_theme;
use chrono::Utc;
use color_eyre::eyre::Result;
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// How many finished results may wait in the channel for a slow consumer.
const RESULT_BUFFER: usize = 16;

/// Runs the probe pipeline over batches of domains.
///
/// The HTTP client and the resolver are built once and shared by every
/// domain of every batch. Cloning a `Scanner` is cheap and shares them too.
#[derive(Clone)]
pub struct Scanner {
    config: Arc<ScanConfig>,
    dns: DnsResolver,
    http: HttpProber,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Result<Self> {
        let config = Arc::new(config);
        Ok(Self {
            dns: DnsResolver::new(&config),
            http: HttpProber::new(Arc::clone(&config))?,
            config,
        })
    }

    /// Probes a single domain and assembles its result.
    ///
    /// DNS lookups and the HTTP probe are independent and run concurrently;
    /// theme detection waits for the probe so it can reuse the fetched page.
    /// Every stage degrades to a sentinel on failure, so this never fails.
    pub async fn probe_domain(&self, token: &str) -> ProbeResult {
        let target = normalize(token);
        info!(host = %target.hostname, url = %target.canonical_url, "Starting domain probe.");

        let (a_record, nameservers, (http_status, page)) = tokio::join!(
            self.dns.resolve_a(&target.hostname),
            self.dns.resolve_ns(&target.hostname),
            self.http.probe(&target.canonical_url)
        );
        let theme = detect_theme(&self.http, &target.canonical_url, page.as_ref()).await;

        info!(host = %target.hostname, status = %http_status, theme = %theme, "Domain probe finished.");
        ProbeResult {
            hostname: target.hostname,
            http_status,
            a_record,
            nameservers,
            theme,
            checked_at: Utc::now(),
        }
    }

    /// Scans `tokens` one domain at a time, yielding each result as soon as
    /// it is complete.
    ///
    /// Blank tokens are skipped. Results come out in input order, and once a
    /// result has been yielded the next domain waits for the configured
    /// delay. Dropping the stream stops the scan.
    pub fn scan<I, S>(&self, tokens: I) -> BoxStream<'static, ProbeResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let queue: VecDeque<String> = tokens
            .into_iter()
            .map(|token| token.as_ref().trim().to_string())
            .filter(|token| !token.is_empty())
            .collect();
        info!(domains = queue.len(), delay = ?self.config.delay(), "Starting scan.");

        let pacer = Pacer::new(self.config.delay());
        stream::unfold((self.clone(), queue, pacer), |(scanner, mut queue, mut pacer)| async move {
            let token = queue.pop_front()?;
            pacer.until_ready().await;
            let result = scanner.probe_domain(&token).await;
            pacer.consume();
            debug!(remaining = queue.len(), "Emitting result.");
            Some((result, (scanner, queue, pacer)))
        })
        .boxed()
    }

    /// Runs [`Scanner::scan`] on a background task and hands results over a
    /// channel.
    ///
    /// When the receiver is dropped the worker stops without starting another
    /// domain; a probe already in flight is abandoned.
    pub fn spawn<I, S>(&self, tokens: I) -> mpsc::Receiver<ProbeResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (tx, rx) = mpsc::channel(RESULT_BUFFER);
        let mut results = self.scan(tokens);

        tokio::spawn(async move {
            let mut emitted = 0usize;
            loop {
                let next = tokio::select! {
                    _ = tx.closed() => {
                        info!(emitted, "Result receiver dropped, stopping scan.");
                        break;
                    }
                    next = results.next() => next,
                };
                let Some(result) = next else {
                    info!(emitted, "Scan finished.");
                    break;
                };
                if tx.send(result).await.is_err() {
                    info!(emitted, "Result receiver dropped, stopping scan.");
                    break;
                }
                emitted += 1;
            }
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{HttpStatus, ProbeFailure, ThemeOutcome, NOT_AVAILABLE};
    use std::time::{Duration, Instant};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const WP_PAGE: &str = r#"<link rel="stylesheet" href="/wp-content/themes/foo-theme/style.css">"#;

    fn scanner(delay_secs: f64) -> Scanner {
        let config = ScanConfig {
            delay_secs,
            timeout_secs: 5.0,
            dns_timeout_secs: 2.0,
            ..Default::default()
        };
        Scanner::new(config).unwrap()
    }

    fn refused_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}")
    }

    async fn wordpress_server() -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wp-content/themes/foo-theme/style.css"))
            .respond_with(ResponseTemplate::new(200).set_body_string("/*\nTheme Name: Foo Deluxe\n*/"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(WP_PAGE))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn one_result_per_non_blank_token_in_order() {
        let mock_server = wordpress_server().await;
        let refused = refused_url();
        let tokens = vec![mock_server.uri(), "   ".to_string(), String::new(), refused.clone()];

        let results: Vec<ProbeResult> = scanner(0.0).scan(tokens).collect().await;
        assert_eq!(results.len(), 2);

        let live = &results[0];
        assert_eq!(live.hostname, mock_server.uri().trim_start_matches("http://"));
        assert_eq!(live.http_status, HttpStatus::Code(200));
        assert_eq!(live.a_record, "127.0.0.1");
        assert_eq!(live.nameservers, NOT_AVAILABLE);
        assert_eq!(live.theme, ThemeOutcome::Detected("Foo Deluxe".to_string()));

        let dead = &results[1];
        assert_eq!(dead.hostname, refused.trim_start_matches("http://"));
        assert_eq!(dead.http_status, HttpStatus::Failed(ProbeFailure::Unreachable));
        assert_eq!(dead.theme, ThemeOutcome::DetectionFailed);
    }

    #[tokio::test]
    async fn empty_batch_yields_nothing() {
        let results: Vec<ProbeResult> = scanner(0.0).scan([" ", "\t"]).collect().await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn batch_drains_no_faster_than_the_delay_allows() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;
        let tokens = vec![mock_server.uri(); 3];

        let start = Instant::now();
        let results: Vec<ProbeResult> = scanner(0.2).scan(tokens).collect().await;
        assert_eq!(results.len(), 3);
        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn spawned_scan_delivers_results_over_the_channel() {
        let mock_server = wordpress_server().await;
        let mut rx = scanner(0.0).spawn([mock_server.uri(), mock_server.uri()]);

        let mut statuses = Vec::new();
        while let Some(result) = rx.recv().await {
            statuses.push(result.http_status.to_string());
        }
        assert_eq!(statuses, vec!["200", "200"]);
    }

    #[tokio::test]
    async fn dropping_the_receiver_stops_further_probes() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;
        let base = mock_server.uri();
        let tokens = ["/a", "/b", "/c"].map(|p| format!("{base}{p}"));

        let mut rx = scanner(0.3).spawn(tokens);
        let first = rx.recv().await.unwrap();
        assert_eq!(first.http_status, HttpStatus::Code(200));
        drop(rx);

        tokio::time::sleep(Duration::from_millis(800)).await;
        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests.iter().all(|r| r.url.path() == "/a"));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn live_domains_end_to_end() {
        let results: Vec<ProbeResult> = scanner(0.0)
            .scan(normalizer::split_tokens("example.com, not-a-real-domain-xyz123.test"))
            .collect()
            .await;
        assert_eq!(results.len(), 2);

        assert!(matches!(results[0].http_status, HttpStatus::Code(_)));
        assert!(results[0].a_record.parse::<std::net::Ipv4Addr>().is_ok());

        let missing = &results[1];
        assert_eq!(missing.a_record, NOT_AVAILABLE);
        assert_eq!(missing.nameservers, NOT_AVAILABLE);
        assert!(matches!(
            missing.http_status,
            HttpStatus::Failed(ProbeFailure::Unreachable | ProbeFailure::RequestError)
        ));
    }
}
