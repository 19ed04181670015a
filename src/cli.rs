// src/cli.rs

use crate::core::config::ScanConfig;
use clap::Parser;
use std::path::PathBuf;

/// Checks whether websites are up and reports their DNS records and
/// WordPress theme.
///
/// Without domains an interactive terminal UI starts. With domains, results
/// are printed to stdout as each one completes.
#[derive(Parser, Debug)]
#[command(name = "isitdown-rs", version, about)]
pub struct Cli {
    /// Domains or URLs to check; commas inside an argument also separate domains
    pub domains: Vec<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seconds to wait between two domains
    #[arg(long)]
    pub delay: Option<f64>,

    /// Seconds before an HTTP request is abandoned
    #[arg(long)]
    pub timeout: Option<f64>,

    /// How many times a failed connection is retried
    #[arg(long)]
    pub retries: Option<u32>,

    /// Print one JSON object per line instead of text cards
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Command-line flags take precedence over the configuration file.
    pub fn apply(&self, mut config: ScanConfig) -> ScanConfig {
        if let Some(delay) = self.delay {
            config.delay_secs = delay;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(retries) = self.retries {
            config.retries = retries;
        }
        config
    }
}
