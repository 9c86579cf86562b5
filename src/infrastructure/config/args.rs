//! Command-line arguments.

use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use reqwest::Url;
use std::path::PathBuf;

/// Command-line arguments for `cachedimg`.
#[derive(Debug, Parser)]
#[command(
    name = "cachedimg",
    version,
    about = "Fetch remote images through a persistent response cache",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Disk cache directory.
    #[arg(long, value_name = "PATH", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Action to run.
    #[command(subcommand)]
    pub command: Command,
}

/// `cachedimg` subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load images, serving from the network and populating the cache.
    Fetch {
        /// Image URLs.
        #[arg(required = true)]
        urls: Vec<Url>,
    },
    /// Report which images are already cached.
    Lookup {
        /// Image URLs.
        #[arg(required = true)]
        urls: Vec<Url>,
    },
}
