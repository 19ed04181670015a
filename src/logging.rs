// src/logging.rs

use crate::core::config;
use color_eyre::eyre::{Result, WrapErr};
use lazy_static::lazy_static;
use std::fs::{self, File};
use std::path::PathBuf;
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

lazy_static! {
    /// Consulted when `RUST_LOG` is unset, e.g. `ISITDOWN_RS_LOGLEVEL=debug`.
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", env!("CARGO_CRATE_NAME").to_uppercase());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

fn filter_directive() -> String {
    std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_ENV.as_str()))
        .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")))
}

/// Sends every event to a log file in the data directory, truncated on each
/// run, and returns the file's path.
///
/// Nothing is logged to the terminal: stdout belongs to the TUI or to the
/// headless result stream.
pub fn initialize_logging() -> Result<PathBuf> {
    let directory = config::data_dir();
    fs::create_dir_all(&directory)
        .wrap_err_with(|| format!("could not create data directory {}", directory.display()))?;
    let log_path = directory.join(LOG_FILE.as_str());
    let log_file =
        File::create(&log_path).wrap_err_with(|| format!("could not create log file {}", log_path.display()))?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::new(filter_directive()));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_derive_from_the_package() {
        assert_eq!(LOG_ENV.as_str(), "ISITDOWN_RS_LOGLEVEL");
        assert_eq!(LOG_FILE.as_str(), "isitdown-rs.log");
    }
}
