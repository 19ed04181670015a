// src/core/mod.rs

// The `core` module holds everything that is not presentation: the data
// models, the scan configuration and the probe pipeline itself.

/// Result types shared by the pipeline and its consumers, such as
/// `ProbeResult`, `HttpStatus` and `ThemeOutcome`.
pub mod models;

/// The `ScanConfig` settings and how they are loaded from disk.
pub mod config;

/// The probe stages (normalizer, DNS, HTTP, theme detection, pacing) and the
/// `Scanner` that sequences them over a batch of domains.
pub mod scanner;
