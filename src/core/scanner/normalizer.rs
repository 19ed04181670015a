// src/core/scanner/normalizer.rs

use crate::core::models::NormalizedTarget;

const HTTP: &str = "http://";
const HTTPS: &str = "https://";

/// Splits free text into domain tokens.
///
/// Newlines count as separators just like commas; blank entries are dropped.
pub fn split_tokens(input: &str) -> Vec<String> {
    input
        .split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Turns a raw token into a canonical URL and a bare hostname.
///
/// Tokens without a scheme are assumed to be served over HTTPS.
pub fn normalize(raw: &str) -> NormalizedTarget {
    let trimmed = raw.trim();
    let canonical_url = if trimmed.starts_with(HTTP) || trimmed.starts_with(HTTPS) {
        trimmed.to_string()
    } else {
        format!("{HTTPS}{trimmed}")
    };

    let without_scheme = canonical_url
        .strip_prefix(HTTPS)
        .or_else(|| canonical_url.strip_prefix(HTTP))
        .unwrap_or(&canonical_url);
    let hostname = without_scheme.split('/').next().unwrap_or_default().to_string();

    NormalizedTarget { canonical_url, hostname }
}
