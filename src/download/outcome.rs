//! Per-item download outcomes.

use std::fmt;

use serde::Serialize;

/// Why a fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The per-item deadline expired.
    Timeout,
    /// DNS, connection, TLS or body read error, or a truncated body.
    Transport,
    /// The server answered with a non-2xx status.
    HttpStatus(u16),
    /// Writing the file locally failed.
    Io,
    /// The fetch task panicked or was cancelled.
    Unexpected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Transport => write!(f, "transport"),
            FailureKind::HttpStatus(code) => write!(f, "http {}", code),
            FailureKind::Io => write!(f, "io"),
            FailureKind::Unexpected => write!(f, "unexpected"),
        }
    }
}

impl From<&reqwest::Error> for FailureKind {
    fn from(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            FailureKind::Timeout
        } else if let Some(status) = err.status() {
            FailureKind::HttpStatus(status.as_u16())
        } else {
            FailureKind::Transport
        }
    }
}

/// The classified result of attempting one work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The destination already held a complete file; nothing was fetched.
    Skipped,
    /// The file was downloaded in full.
    Succeeded { bytes_transferred: u64 },
    /// The file could not be downloaded.
    Failed { kind: FailureKind, reason: String },
}

impl FetchOutcome {
    /// Build a failure outcome.
    pub fn failed(kind: FailureKind, reason: impl Into<String>) -> Self {
        FetchOutcome::Failed {
            kind,
            reason: reason.into(),
        }
    }

    /// Bytes this outcome contributes to the run total.
    pub fn bytes_transferred(&self) -> u64 {
        match self {
            FetchOutcome::Succeeded { bytes_transferred } => *bytes_transferred,
            _ => 0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed { .. })
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Skipped => "skipped",
            FetchOutcome::Succeeded { .. } => "succeeded",
            FetchOutcome::Failed { .. } => "failed",
        }
    }
}
