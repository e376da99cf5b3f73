//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, ReportFormat};

/// Bulk downloader for HTTP directory listings.
#[derive(Parser, Debug)]
#[command(
    name = "listing-downloader",
    version,
    about = "Download every file linked from an HTTP directory listing",
    long_about = "Download every file linked from an HTTP directory listing page, \
                  or from a file of URLs, with a bounded number of parallel transfers.\n\n\
                  Files that already exist with content are skipped, so interrupted runs \
                  can simply be started again."
)]
pub struct Args {
    /// URL of the directory listing page.
    pub url: Option<String>,

    /// Read URLs from a file (one per line) instead of a listing page.
    #[arg(short = 'i', long = "input-file", conflicts_with = "url")]
    pub input_file: Option<PathBuf>,

    /// Directory the files are saved into.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Maximum number of simultaneous downloads.
    #[arg(short = 'j', long, env = "LISTING_DL_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// Seconds before a single file download is abandoned.
    #[arg(short = 't', long = "timeout", env = "LISTING_DL_TIMEOUT")]
    pub timeout_seconds: Option<u64>,

    /// Seconds before the listing page request is abandoned.
    #[arg(long = "listing-timeout")]
    pub listing_timeout_seconds: Option<u64>,

    /// Bytes written per chunk.
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Browser user agent string.
    #[arg(short = 'a', long = "user-agent", env = "LISTING_DL_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Format of the final summary.
    #[arg(long, value_enum)]
    pub format: Option<ReportFormatArg>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Hide download progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Show information about skipped downloads.
    #[arg(long)]
    pub show_skipped: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI report format argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    /// Human-readable summary.
    Text,
    /// JSON document on stdout.
    Json,
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(arg: ReportFormatArg) -> Self {
        match arg {
            ReportFormatArg::Text => ReportFormat::Text,
            ReportFormatArg::Json => ReportFormat::Json,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        // A source given on the command line replaces the configured one
        if let Some(url) = self.url {
            config.source.listing_url = Some(url);
            config.source.urls_file = None;
        } else if let Some(path) = self.input_file {
            config.source.listing_url = None;
            config.source.urls_file = Some(path);
        }

        if let Some(dir) = self.download_directory {
            config.options.download_directory = dir;
        }

        if let Some(concurrency) = self.concurrency {
            config.options.concurrency = concurrency;
        }

        if let Some(timeout) = self.timeout_seconds {
            config.options.timeout_seconds = timeout;
        }

        if let Some(timeout) = self.listing_timeout_seconds {
            config.options.listing_timeout_seconds = timeout;
        }

        if let Some(chunk_size) = self.chunk_size {
            config.options.chunk_size = chunk_size;
        }

        if let Some(user_agent) = self.user_agent {
            config.options.user_agent = user_agent;
        }

        if let Some(format) = self.format {
            config.options.report_format = format.into();
        }

        // Boolean flags (only override if set to non-default)
        if self.quiet {
            config.options.show_downloads = false;
            config.options.show_skipped_downloads = false;
        }

        if self.show_skipped {
            config.options.show_skipped_downloads = true;
        }
    }
}
