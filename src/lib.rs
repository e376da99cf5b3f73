//! Listing Downloader - bulk downloads from HTTP directory listings.
//!
//! This library fetches every file linked from a directory listing page (or
//! named in a URL file) with a bounded number of parallel transfers.
//!
//! # Features
//!
//! - Link discovery from HTML directory listings
//! - Bounded-concurrency downloads with per-file timeouts
//! - Skip-if-present, so interrupted runs can be resumed
//! - Atomic writes through hidden partial files
//! - Live progress and a text or JSON run summary
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use listing_downloader::{
//!     discover, download_all, Config, Fetcher, HttpClient, ProgressAggregator, WorkerPool,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.source.listing_url = Some("https://example.com/music/".to_string());
//!
//!     let client = HttpClient::new(&config.options.user_agent)?;
//!     let items = discover(&client, &config).await?;
//!
//!     let pool = WorkerPool::new(Fetcher::from_config(client, &config), 8)?;
//!     let aggregator = Arc::new(ProgressAggregator::new(items.len() as u64));
//!     let summary = download_all(
//!         &pool,
//!         items,
//!         config.download_directory(),
//!         aggregator,
//!         CancellationToken::new(),
//!         |_| {},
//!     )
//!     .await?;
//!
//!     println!("{} downloaded", summary.files_succeeded);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod http;
pub mod listing;
pub mod output;

// Re-exports for convenience
pub use config::{Config, ReportFormat};
pub use download::{
    download_all, Completion, FailureKind, FetchOutcome, Fetcher, ItemFetcher, ProgressAggregator,
    RunSummary, WorkerPool,
};
pub use error::{Error, Result};
pub use http::HttpClient;
pub use listing::{discover, WorkItem};
