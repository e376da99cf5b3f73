//! Error types for the listing-downloader application.
//!
//! Only run-level failures live here. A single file failing to download is
//! not an error of the run; it is reported as a [`FetchOutcome`] instead.
//!
//! [`FetchOutcome`]: crate::download::FetchOutcome

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Discovery errors
    #[error("Listing error: {0}")]
    Listing(String),

    // Destination errors
    #[error("Cannot use destination directory {}: {source}", path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // File system errors
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    // Run outcome errors
    #[error("Interrupted, {0} file(s) were not attempted")]
    Aborted(u64),

    #[error("{0} file(s) failed to download")]
    ItemsFailed(u64),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_)
            | Error::ConfigValidation { .. }
            | Error::MissingConfig(_)
            | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
            Error::Listing(_) | Error::Http(_) | Error::UrlParse(_) => exit_codes::NETWORK_ERROR,
            Error::Destination { .. } => exit_codes::DESTINATION_ERROR,
            Error::Aborted(_) => exit_codes::ABORT,
            Error::ItemsFailed(_) => exit_codes::SOME_ITEMS_FAILED,
            _ => exit_codes::UNEXPECTED_ERROR,
        }
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ABORT: i32 = 1;
    pub const NETWORK_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DESTINATION_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const SOME_ITEMS_FAILED: i32 = 6;
}
