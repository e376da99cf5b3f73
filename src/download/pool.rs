//! Bounded worker pool driving the fetcher.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::validation::validate_concurrency;
use crate::download::fetch::{Fetcher, ItemFetcher};
use crate::download::outcome::{FailureKind, FetchOutcome};
use crate::download::state::ProgressAggregator;
use crate::error::Result;
use crate::listing::WorkItem;

/// A work item paired with its outcome.
#[derive(Debug, Clone)]
pub struct Completion {
    pub item: WorkItem,
    pub outcome: FetchOutcome,
}

/// Runs at most `concurrency` fetches at a time over a shared queue.
///
/// Every item is popped from the queue exactly once, so it is attempted at
/// most once per run. A failing, timing out or panicking fetch only affects
/// its own item.
#[derive(Debug, Clone)]
pub struct WorkerPool<T = Fetcher> {
    fetcher: T,
    concurrency: usize,
}

impl<T: ItemFetcher> WorkerPool<T> {
    /// Create a pool. Fails if `concurrency` is outside `1..=MAX_CONCURRENCY`.
    pub fn new(fetcher: T, concurrency: usize) -> Result<Self> {
        validate_concurrency(concurrency)?;
        Ok(Self {
            fetcher,
            concurrency,
        })
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Process every item and return the completions in arrival order.
    ///
    /// Each completion is applied to `aggregator` and handed to
    /// `on_completion` as soon as it arrives. Once `shutdown` is cancelled no
    /// new item is dispatched; fetches already running finish normally.
    pub async fn run<F>(
        &self,
        items: Vec<WorkItem>,
        aggregator: &Arc<ProgressAggregator>,
        shutdown: &CancellationToken,
        mut on_completion: F,
    ) -> Vec<Completion>
    where
        F: FnMut(&Completion),
    {
        let total = items.len();
        let queue = Arc::new(Mutex::new(VecDeque::from(items)));
        let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();

        let worker_count = self.concurrency.min(total);
        tracing::debug!(
            "Starting {} workers for {} items (limit {})",
            worker_count,
            total,
            self.concurrency
        );

        let mut workers = JoinSet::new();
        for worker_id in 0..worker_count {
            workers.spawn(worker_loop(
                worker_id,
                Arc::clone(&queue),
                self.fetcher.clone(),
                Arc::clone(aggregator),
                tx.clone(),
                shutdown.clone(),
            ));
        }
        drop(tx);

        let mut completions = Vec::with_capacity(total);
        while let Some(completion) = rx.recv().await {
            aggregator.record(&completion.outcome);
            on_completion(&completion);
            completions.push(completion);
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("Worker task ended abnormally: {}", e);
            }
        }

        let undispatched = queue.lock().len();
        if undispatched > 0 {
            tracing::info!("{} items were not dispatched", undispatched);
        }

        completions
    }
}

async fn worker_loop<T: ItemFetcher>(
    worker_id: usize,
    queue: Arc<Mutex<VecDeque<WorkItem>>>,
    fetcher: T,
    aggregator: Arc<ProgressAggregator>,
    tx: mpsc::UnboundedSender<Completion>,
    shutdown: CancellationToken,
) {
    loop {
        if shutdown.is_cancelled() {
            tracing::debug!("Worker {} stopping: shutdown requested", worker_id);
            break;
        }

        let next = { queue.lock().pop_front() };
        let Some(item) = next else {
            break;
        };

        let outcome = fetch_isolated(&fetcher, &item, &aggregator).await;
        tracing::debug!("Worker {}: {} {}", worker_id, item.name(), outcome.label());

        if tx.send(Completion { item, outcome }).is_err() {
            break;
        }
    }
}

/// Run one fetch in its own task so a panic becomes a failed outcome.
async fn fetch_isolated<T: ItemFetcher>(
    fetcher: &T,
    item: &WorkItem,
    aggregator: &Arc<ProgressAggregator>,
) -> FetchOutcome {
    let fetcher = fetcher.clone();
    let task_item = item.clone();
    let task_aggregator = Arc::clone(aggregator);

    let fetch_id = aggregator.fetch_started(item.name());
    let joined = tokio::spawn(async move {
        fetcher
            .fetch_item(&task_item, |delta| {
                task_aggregator.record_chunk(fetch_id, delta)
            })
            .await
    })
    .await;
    aggregator.fetch_finished(fetch_id);

    joined.unwrap_or_else(|e| {
        FetchOutcome::failed(FailureKind::Unexpected, format!("Fetch task failed: {}", e))
    })
}
