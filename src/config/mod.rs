//! Configuration module for the listing-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - CLI argument parsing and merging
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{
    Config, OptionsConfig, SourceConfig, DEFAULT_CHUNK_SIZE, DEFAULT_CONCURRENCY,
    DEFAULT_LISTING_TIMEOUT_SECONDS, DEFAULT_TIMEOUT_SECONDS,
};
pub use modes::ReportFormat;
pub use validation::{parse_listing_url, validate_config, MAX_CONCURRENCY};
