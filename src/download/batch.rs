//! Whole-batch download entry point.

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::download::fetch::ItemFetcher;
use crate::download::pool::{Completion, WorkerPool};
use crate::download::state::ProgressAggregator;
use crate::download::summary::RunSummary;
use crate::error::{Error, Result};
use crate::fs::ensure_destination_dir;
use crate::listing::WorkItem;

/// Download every item into `destination` and summarize the run.
///
/// `aggregator` must be fresh and created for `items.len()` items; callers
/// keep a handle to it for live progress. Errors (a mismatched aggregator or
/// an unusable destination directory) are reported before anything is
/// dispatched. Item failures end up in the summary.
pub async fn download_all<T, F>(
    pool: &WorkerPool<T>,
    items: Vec<WorkItem>,
    destination: &Path,
    aggregator: Arc<ProgressAggregator>,
    shutdown: CancellationToken,
    on_completion: F,
) -> Result<RunSummary>
where
    T: ItemFetcher,
    F: FnMut(&Completion),
{
    let initial = aggregator.snapshot();
    if initial.files_identified != items.len() as u64 || initial.files_completed() > 0 {
        return Err(Error::Config(format!(
            "Progress tracker expects {} item(s) with {} already recorded, but {} were given",
            initial.files_identified,
            initial.files_completed(),
            items.len()
        )));
    }

    if ensure_destination_dir(destination).await? {
        tracing::info!("Created download folder: {}", destination.display());
    } else {
        tracing::debug!("Download folder already exists: {}", destination.display());
    }

    let completions = pool
        .run(items, &aggregator, &shutdown, on_completion)
        .await;
    let counters = aggregator.finish();

    tracing::info!(
        "Download process complete: {} succeeded, {} skipped, {} failed in {:.2}s",
        counters.files_succeeded,
        counters.files_skipped,
        counters.files_failed,
        counters.elapsed().as_secs_f64()
    );

    Ok(RunSummary::new(
        &counters,
        &completions,
        destination,
        shutdown.is_cancelled(),
    ))
}
