//! Configuration structures and loading logic.

use crate::config::modes::ReportFormat;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default number of simultaneous fetches.
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Default per-file timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

/// Default timeout for fetching the listing page, in seconds.
pub const DEFAULT_LISTING_TIMEOUT_SECONDS: u64 = 40;

/// Default write granularity in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 80 * 1024;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Where the list of files comes from. Exactly one field must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL of an HTML directory listing whose links are downloaded.
    #[serde(default)]
    pub listing_url: Option<String>,

    /// Text file with one URL per line.
    #[serde(default)]
    pub urls_file: Option<PathBuf>,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Directory the files are saved into. Created if absent.
    #[serde(default = "default_download_directory")]
    pub download_directory: PathBuf,

    /// Maximum number of files fetched at the same time.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Seconds before a single file download is abandoned.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Seconds before the listing page request is abandoned.
    #[serde(default = "default_listing_timeout_seconds")]
    pub listing_timeout_seconds: u64,

    /// Bytes written per chunk; also the progress granularity.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whether to show progress and per-file lines.
    #[serde(default = "default_true")]
    pub show_downloads: bool,

    /// Whether to show files skipped because they already exist.
    #[serde(default)]
    pub show_skipped_downloads: bool,

    /// Format of the final summary.
    #[serde(default)]
    pub report_format: ReportFormat,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: default_download_directory(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            listing_timeout_seconds: DEFAULT_LISTING_TIMEOUT_SECONDS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            user_agent: default_user_agent(),
            show_downloads: true,
            show_skipped_downloads: false,
            report_format: ReportFormat::default(),
        }
    }
}

fn default_download_directory() -> PathBuf {
    PathBuf::from("downloaded_files")
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_listing_timeout_seconds() -> u64 {
    DEFAULT_LISTING_TIMEOUT_SECONDS
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

pub(crate) fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.4896.127 Safari/537.36".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the effective download directory.
    pub fn download_directory(&self) -> &Path {
        &self.options.download_directory
    }

    /// Per-file timeout.
    pub fn item_timeout(&self) -> Duration {
        Duration::from_secs(self.options.timeout_seconds)
    }

    /// Listing page timeout.
    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.options.listing_timeout_seconds)
    }
}
