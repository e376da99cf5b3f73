//! Final run summary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::download::outcome::{FailureKind, FetchOutcome};
use crate::download::pool::Completion;
use crate::download::state::AggregateCounters;

/// A failed item, with enough detail to retry it by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedItem {
    pub name: String,
    pub url: String,
    pub kind: FailureKind,
    pub reason: String,
}

/// Totals of one finished run. A pure view of the final counters.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub destination: PathBuf,
    pub files_identified: u64,
    pub files_succeeded: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    /// Items never dispatched because the run was interrupted.
    pub files_not_attempted: u64,
    pub bytes_transferred: u64,
    #[serde(rename = "duration_seconds", serialize_with = "serialize_seconds")]
    pub duration: Duration,
    pub interrupted: bool,
    /// Failed items sorted by name.
    pub failures: Vec<FailedItem>,
}

impl RunSummary {
    /// Build the summary from the final counters and the completions.
    pub fn new(
        counters: &AggregateCounters,
        completions: &[Completion],
        destination: &Path,
        interrupted: bool,
    ) -> Self {
        let mut failures: Vec<FailedItem> = completions
            .iter()
            .filter_map(|completion| match &completion.outcome {
                FetchOutcome::Failed { kind, reason } => Some(FailedItem {
                    name: completion.item.name().to_string(),
                    url: completion.item.url().to_string(),
                    kind: *kind,
                    reason: reason.clone(),
                }),
                _ => None,
            })
            .collect();
        failures.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            started_at: counters.started_at,
            destination: destination.to_path_buf(),
            files_identified: counters.files_identified,
            files_succeeded: counters.files_succeeded,
            files_skipped: counters.files_skipped,
            files_failed: counters.files_failed,
            files_not_attempted: counters.files_pending(),
            bytes_transferred: counters.bytes_transferred,
            duration: counters.elapsed(),
            interrupted,
            failures,
        }
    }

    pub fn megabytes_transferred(&self) -> f64 {
        self.bytes_transferred as f64 / (1024.0 * 1024.0)
    }

    /// Whether every identified item ended up on disk.
    pub fn is_complete(&self) -> bool {
        self.files_failed == 0 && self.files_not_attempted == 0
    }
}

fn serialize_seconds<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
