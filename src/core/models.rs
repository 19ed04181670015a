// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use strum::Display;

/// Sentinel used by the DNS fields when a lookup produced nothing.
pub const NOT_AVAILABLE: &str = "N/A";

// --- Input Models ---

/// A raw domain token after normalization.
///
/// `canonical_url` always carries an explicit `http://` or `https://` scheme,
/// `hostname` never carries a scheme or a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTarget {
    pub canonical_url: String,
    pub hostname: String,
}

// --- HTTP Prober Models ---

/// The closed set of reasons an HTTP probe can fail.
///
/// Variants are ordered by classification priority: a TLS failure wins over
/// a connection failure, which wins over a deadline, which wins over the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ProbeFailure {
    #[strum(to_string = "SSL Error")]
    SslError,
    #[strum(to_string = "Down / Unreachable")]
    Unreachable,
    #[strum(to_string = "Timeout")]
    Timeout,
    #[strum(to_string = "Request Error")]
    RequestError,
}

/// Outcome of the liveness probe for one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpStatus {
    /// The server answered with this status code.
    Code(u16),
    /// No response could be obtained.
    Failed(ProbeFailure),
    #[default]
    Unknown,
}

/// Coarse grouping of a status, used to colour result cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Failure,
    Other,
}

impl HttpStatus {
    pub fn class(&self) -> StatusClass {
        match self {
            HttpStatus::Code(200..=299) => StatusClass::Success,
            HttpStatus::Code(400..=599) => StatusClass::Failure,
            _ => StatusClass::Other,
        }
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpStatus::Code(code) => write!(f, "{}", code),
            HttpStatus::Failed(failure) => write!(f, "{}", failure),
            HttpStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Serialize for HttpStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A page fetched by the HTTP prober, handed over to the theme detector so
/// the same document is not downloaded twice.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

// --- Theme Detector Models ---

/// Three-way result of WordPress theme detection.
///
/// "Not WordPress" is a normal outcome and is kept apart from a detection
/// that broke halfway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeOutcome {
    /// The declared theme name, or the theme slug when no name was declared.
    Detected(String),
    NotWordPress,
    DetectionFailed,
}

impl ThemeOutcome {
    pub fn is_wordpress(&self) -> bool {
        matches!(self, ThemeOutcome::Detected(_))
    }
}

impl fmt::Display for ThemeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeOutcome::Detected(name) => write!(f, "{}", name),
            ThemeOutcome::NotWordPress => write!(f, "No WP Theme"),
            ThemeOutcome::DetectionFailed => write!(f, "Error Detecting"),
        }
    }
}

impl Serialize for ThemeOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// --- Main Result ---

/// The fully assembled result for one domain. Every field is populated,
/// possibly with a sentinel, before the result leaves the scanner.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub hostname: String,
    pub http_status: HttpStatus,
    pub a_record: String,
    pub nameservers: String,
    pub theme: ThemeOutcome,
    pub checked_at: DateTime<Utc>,
}

impl ProbeResult {
    /// Plain-text card, suitable for pasting into a chat or ticket.
    pub fn share_text(&self) -> String {
        format!(
            "{}\nStatus: {}\nA: {}\nNS: {}\nWP THEME: {}",
            self.hostname, self.http_status, self.a_record, self.nameservers, self.theme
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProbeResult {
        ProbeResult {
            hostname: "example.com".to_string(),
            http_status: HttpStatus::Code(200),
            a_record: "93.184.215.14".to_string(),
            nameservers: "a.iana-servers.net., b.iana-servers.net.".to_string(),
            theme: ThemeOutcome::NotWordPress,
            checked_at: Utc::now(),
        }
    }

    #[test]
    fn status_labels_match_the_closed_taxonomy() {
        assert_eq!(HttpStatus::Code(404).to_string(), "404");
        assert_eq!(HttpStatus::Failed(ProbeFailure::SslError).to_string(), "SSL Error");
        assert_eq!(HttpStatus::Failed(ProbeFailure::Unreachable).to_string(), "Down / Unreachable");
        assert_eq!(HttpStatus::Failed(ProbeFailure::Timeout).to_string(), "Timeout");
        assert_eq!(HttpStatus::Failed(ProbeFailure::RequestError).to_string(), "Request Error");
        assert_eq!(HttpStatus::default().to_string(), "Unknown");
    }

    #[test]
    fn status_class_follows_code_ranges() {
        assert_eq!(HttpStatus::Code(204).class(), StatusClass::Success);
        assert_eq!(HttpStatus::Code(503).class(), StatusClass::Failure);
        assert_eq!(HttpStatus::Code(301).class(), StatusClass::Other);
        assert_eq!(HttpStatus::Failed(ProbeFailure::Timeout).class(), StatusClass::Other);
    }

    #[test]
    fn theme_outcome_keeps_three_labels_apart() {
        assert_eq!(ThemeOutcome::Detected("Astra".into()).to_string(), "Astra");
        assert_eq!(ThemeOutcome::NotWordPress.to_string(), "No WP Theme");
        assert_eq!(ThemeOutcome::DetectionFailed.to_string(), "Error Detecting");
    }

    #[test]
    fn result_serializes_labels_as_strings() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["http_status"], "200");
        assert_eq!(json["theme"], "No WP Theme");
        assert_eq!(json["a_record"], "93.184.215.14");
    }

    #[test]
    fn share_text_lists_every_field() {
        let text = sample().share_text();
        assert_eq!(
            text,
            "example.com\nStatus: 200\nA: 93.184.215.14\nNS: a.iana-servers.net., b.iana-servers.net.\nWP THEME: No WP Theme"
        );
    }
}
