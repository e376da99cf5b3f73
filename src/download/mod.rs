//! Download module for fetching the work list.
//!
//! This module provides:
//! - Single file fetching with chunked writes
//! - The bounded worker pool
//! - Run-wide progress accounting
//! - The final run summary

pub mod batch;
pub mod fetch;
pub mod outcome;
pub mod pool;
pub mod state;
pub mod summary;

pub use batch::download_all;
pub use fetch::{Fetcher, ItemFetcher};
pub use outcome::{FailureKind, FetchOutcome};
pub use pool::{Completion, WorkerPool};
pub use state::{AggregateCounters, InFlightFetch, ProgressAggregator};
pub use summary::{FailedItem, RunSummary};
