//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::args::CliArgs;
use crate::infrastructure::http::{DEFAULT_USER_AGENT, TransportConfig};
use crate::infrastructure::image::disk_cache::{DEFAULT_MAX_CACHE_SIZE, default_cache_dir};
use crate::infrastructure::image::memory_cache::DEFAULT_CACHE_SIZE;

const APP_NAME: &str = "cached-image";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from TOML and overridden by CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path. Logs go to stderr when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Cache and transport settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Cache and transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum responses kept in memory.
    #[serde(default = "default_memory_entries")]
    pub memory_entries: usize,

    /// Disk cache directory.
    #[serde(default)]
    pub disk_dir: Option<PathBuf>,

    /// Maximum disk cache size in bytes.
    #[serde(default = "default_disk_max_bytes")]
    pub disk_max_bytes: u64,

    /// Request timeout in seconds. Unset keeps the HTTP client default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User agent sent with requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl CacheConfig {
    /// Returns the effective disk cache directory.
    #[must_use]
    pub fn effective_disk_dir(&self) -> PathBuf {
        self.disk_dir.clone().unwrap_or_else(default_cache_dir)
    }

    /// Returns transport options derived from this configuration.
    #[must_use]
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout_secs.map(Duration::from_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_entries: default_memory_entries(),
            disk_dir: None,
            disk_max_bytes: default_disk_max_bytes(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_memory_entries() -> usize {
    DEFAULT_CACHE_SIZE
}

fn default_disk_max_bytes() -> u64 {
    DEFAULT_MAX_CACHE_SIZE
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(cache_dir) = &args.cache_dir {
            self.cache.disk_dir = Some(cache_dir.clone());
        }
        if let Some(timeout) = args.timeout {
            self.cache.timeout_secs = Some(timeout);
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            cache: CacheConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"

            [cache]
            memory_entries = 8
            timeout_secs = 15
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.cache.memory_entries, 8);
        assert_eq!(config.cache.timeout_secs, Some(15));
        assert_eq!(config.cache.disk_max_bytes, DEFAULT_MAX_CACHE_SIZE);
        assert_eq!(config.cache.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.log_path.is_none());
        assert_eq!(config.cache.memory_entries, DEFAULT_CACHE_SIZE);
        assert!(config.cache.transport_config().timeout.is_none());
    }

    #[test]
    fn test_args_override_file_values() {
        let mut config: AppConfig = toml::from_str(
            r#"
            log_level = "warn"
            [cache]
            disk_dir = "/var/cache/a"
            "#,
        )
        .expect("Failed to parse config");
        let args = CliArgs::parse_from([
            "cachedimg",
            "--log-level",
            "trace",
            "--cache-dir",
            "/tmp/b",
            "--timeout",
            "3",
            "lookup",
            "https://example.com/a.png",
        ]);

        config.merge_with_args(&args);

        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.cache.effective_disk_dir(), PathBuf::from("/tmp/b"));
        assert_eq!(
            config.cache.transport_config().timeout,
            Some(Duration::from_secs(3))
        );
    }
}
