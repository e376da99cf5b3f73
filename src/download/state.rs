//! Run-wide progress accounting.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::download::outcome::FetchOutcome;

/// Run-wide tally of finished items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateCounters {
    pub files_identified: u64,
    pub files_succeeded: u64,
    pub files_failed: u64,
    pub files_skipped: u64,
    pub bytes_transferred: u64,
    pub start_time: Instant,
    pub end_time: Option<Instant>,
    /// Wall-clock start, for reports.
    pub started_at: DateTime<Utc>,
}

impl AggregateCounters {
    fn new(files_identified: u64) -> Self {
        Self {
            files_identified,
            files_succeeded: 0,
            files_failed: 0,
            files_skipped: 0,
            bytes_transferred: 0,
            start_time: Instant::now(),
            end_time: None,
            started_at: Utc::now(),
        }
    }

    /// Items that have produced an outcome.
    pub fn files_completed(&self) -> u64 {
        self.files_succeeded + self.files_failed + self.files_skipped
    }

    /// Identified items without an outcome.
    pub fn files_pending(&self) -> u64 {
        self.files_identified.saturating_sub(self.files_completed())
    }

    /// Time since the run started, frozen once it has finished.
    pub fn elapsed(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }
}

/// Live view of one running fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlightFetch {
    pub id: u64,
    pub name: String,
    pub bytes: u64,
}

/// Thread-safe owner of the [`AggregateCounters`] for one run.
///
/// Completed items are applied through [`record`](Self::record), one lock
/// acquisition per item, so the outcome counter and the byte total move
/// together. Per-chunk progress, the running fetches and their count are kept
/// apart from the counters: they feed live display only.
#[derive(Debug)]
pub struct ProgressAggregator {
    counters: Mutex<AggregateCounters>,
    live_bytes: AtomicU64,
    active_fetches: AtomicUsize,
    peak_active_fetches: AtomicUsize,
    next_fetch_id: AtomicU64,
    in_flight: Mutex<BTreeMap<u64, InFlightFetch>>,
}

impl ProgressAggregator {
    /// Start accounting for a run of `files_identified` items.
    pub fn new(files_identified: u64) -> Self {
        Self {
            counters: Mutex::new(AggregateCounters::new(files_identified)),
            live_bytes: AtomicU64::new(0),
            active_fetches: AtomicUsize::new(0),
            peak_active_fetches: AtomicUsize::new(0),
            next_fetch_id: AtomicU64::new(0),
            in_flight: Mutex::new(BTreeMap::new()),
        }
    }

    /// Apply one finished item.
    pub fn record(&self, outcome: &FetchOutcome) {
        let mut counters = self.counters.lock();
        match outcome {
            FetchOutcome::Skipped => counters.files_skipped += 1,
            FetchOutcome::Succeeded { .. } => counters.files_succeeded += 1,
            FetchOutcome::Failed { .. } => counters.files_failed += 1,
        }
        counters.bytes_transferred += outcome.bytes_transferred();
        debug_assert!(counters.files_completed() <= counters.files_identified);
    }

    /// Note bytes written by the in-flight fetch `id`.
    pub fn record_chunk(&self, id: u64, delta: u64) {
        self.live_bytes.fetch_add(delta, Ordering::Relaxed);
        if let Some(fetch) = self.in_flight.lock().get_mut(&id) {
            fetch.bytes += delta;
        }
    }

    /// Note that a fetch of `name` started. Returns its id for later updates.
    pub fn fetch_started(&self, name: &str) -> u64 {
        let id = self.next_fetch_id.fetch_add(1, Ordering::Relaxed);
        self.in_flight.lock().insert(
            id,
            InFlightFetch {
                id,
                name: name.to_string(),
                bytes: 0,
            },
        );

        let active = self.active_fetches.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_active_fetches.fetch_max(active, Ordering::SeqCst);
        id
    }

    /// Note that the fetch `id` ended.
    pub fn fetch_finished(&self, id: u64) {
        self.in_flight.lock().remove(&id);
        self.active_fetches.fetch_sub(1, Ordering::SeqCst);
    }

    /// Running fetches, oldest first.
    pub fn in_flight(&self) -> Vec<InFlightFetch> {
        self.in_flight.lock().values().cloned().collect()
    }

    /// Consistent copy of the counters.
    pub fn snapshot(&self) -> AggregateCounters {
        *self.counters.lock()
    }

    /// Bytes written so far, including those of unfinished and failed items.
    pub fn live_bytes(&self) -> u64 {
        self.live_bytes.load(Ordering::Relaxed)
    }

    /// Fetches currently in flight.
    pub fn active_fetches(&self) -> usize {
        self.active_fetches.load(Ordering::SeqCst)
    }

    /// Highest number of fetches that were in flight at once.
    pub fn peak_active_fetches(&self) -> usize {
        self.peak_active_fetches.load(Ordering::SeqCst)
    }

    /// Stamp the end time (once) and return the final counters.
    pub fn finish(&self) -> AggregateCounters {
        let mut counters = self.counters.lock();
        if counters.end_time.is_none() {
            counters.end_time = Some(Instant::now());
        }
        *counters
    }
}
