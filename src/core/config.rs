// src/core/config.rs

use color_eyre::eyre::{Result, WrapErr, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Browser identities rotated through the `User-Agent` header so that the
/// probes are not turned away as an obvious bot.
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (iPad; CPU OS 16_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.4 Mobile/15E148 Safari/604.1",
];

const CONFIG_FILE: &str = "config.toml";

/// Settings shared by every component of the scan pipeline.
///
/// Built once at startup and handed out behind an `Arc`; nothing mutates it
/// after the scanner has been constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Pause between two domains, in seconds.
    pub delay_secs: f64,
    /// Deadline for a single HTTP request, in seconds.
    pub timeout_secs: f64,
    /// Deadline for a single DNS query, in seconds.
    pub dns_timeout_secs: f64,
    /// How many times a failed connection is re-attempted.
    pub retries: u32,
    pub user_agents: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            delay_secs: 2.0,
            timeout_secs: 10.0,
            dns_timeout_secs: 5.0,
            retries: 3,
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScanConfig {
    /// Loads the configuration.
    ///
    /// An explicit path must exist. Without one, `config.toml` in the
    /// platform config directory is used when present, and the built-in
    /// defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("No configuration file found, using defaults.");
                    Self::default()
                }
            },
        };
        config.validated()
    }

    fn from_file(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "Loading configuration file.");
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("could not read config file {}", path.display()))?;
        toml::from_str(&raw).wrap_err_with(|| format!("invalid config file {}", path.display()))
    }

    /// Rejects unusable durations and restores the identity pool if it was
    /// configured empty.
    pub fn validated(mut self) -> Result<Self> {
        for (name, value) in [
            ("delay_secs", self.delay_secs),
            ("timeout_secs", self.timeout_secs),
            ("dns_timeout_secs", self.dns_timeout_secs),
        ] {
            // Also rejects values too large to be represented as a `Duration`.
            if Duration::try_from_secs_f64(value).is_err() {
                bail!("{name} must be a non-negative number of seconds, got {value}");
            }
        }
        if self.timeout_secs == 0.0 {
            bail!("timeout_secs must be greater than zero");
        }

        self.user_agents.retain(|ua| !ua.trim().is_empty());
        if self.user_agents.is_empty() {
            warn!("Empty user agent pool configured, falling back to the built-in pool.");
            self.user_agents = Self::default().user_agents;
        }
        Ok(self)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.dns_timeout_secs)
    }
}

/// Platform directories of the application, shared by the configuration
/// lookup and the log file.
pub fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "isitdown-rs", env!("CARGO_PKG_NAME"))
}

pub fn data_dir() -> PathBuf {
    match project_directory() {
        Some(dirs) => dirs.data_local_dir().to_path_buf(),
        None => PathBuf::from(".").join(".data"),
    }
}

fn default_config_path() -> Option<PathBuf> {
    project_directory().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
