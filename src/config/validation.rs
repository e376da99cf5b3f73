//! Configuration validation logic.

use url::Url;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Upper bound on simultaneous fetches.
pub const MAX_CONCURRENCY: usize = 256;

/// Smallest accepted chunk size (1 KiB).
const MIN_CHUNK_SIZE: usize = 1024;

/// Largest accepted chunk size (16 MiB).
const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_source(config)?;
    validate_concurrency(config.options.concurrency)?;
    validate_timeout("timeout_seconds", config.options.timeout_seconds)?;
    validate_timeout(
        "listing_timeout_seconds",
        config.options.listing_timeout_seconds,
    )?;
    validate_chunk_size(config.options.chunk_size)?;
    validate_user_agent(&config.options.user_agent)?;

    Ok(())
}

/// Validate that exactly one file source is configured.
pub fn validate_source(config: &Config) -> Result<()> {
    match (&config.source.listing_url, &config.source.urls_file) {
        (Some(_), Some(_)) => Err(Error::ConfigValidation {
            field: "source".to_string(),
            message: "Give either a listing URL or a URL file, not both".to_string(),
        }),
        (None, None) => Err(Error::MissingConfig(
            "source (a listing URL or --input-file)".to_string(),
        )),
        (Some(url), None) => parse_listing_url(url).map(|_| ()),
        (None, Some(_)) => Ok(()),
    }
}

/// Validate the concurrency limit.
pub fn validate_concurrency(concurrency: usize) -> Result<()> {
    if !(1..=MAX_CONCURRENCY).contains(&concurrency) {
        return Err(Error::ConfigValidation {
            field: "concurrency".to_string(),
            message: format!(
                "Must be between 1 and {} (got {})",
                MAX_CONCURRENCY, concurrency
            ),
        });
    }

    Ok(())
}

/// Validate a timeout given in seconds.
pub fn validate_timeout(field: &str, seconds: u64) -> Result<()> {
    if seconds == 0 {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: "Timeout must be at least 1 second".to_string(),
        });
    }

    Ok(())
}

/// Validate the chunk size.
pub fn validate_chunk_size(chunk_size: usize) -> Result<()> {
    if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&chunk_size) {
        return Err(Error::ConfigValidation {
            field: "chunk_size".to_string(),
            message: format!(
                "Must be between {} and {} bytes (got {})",
                MIN_CHUNK_SIZE, MAX_CHUNK_SIZE, chunk_size
            ),
        });
    }

    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.trim().is_empty() {
        return Err(Error::MissingConfig("user_agent".to_string()));
    }

    Ok(())
}

/// Parse a listing URL, accepting only http and https.
pub fn parse_listing_url(input: &str) -> Result<Url> {
    let url = Url::parse(input.trim())?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::ConfigValidation {
            field: "listing_url".to_string(),
            message: format!("Unsupported scheme '{}' in {}", scheme, input),
        }),
    }
}
