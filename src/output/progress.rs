//! Progress bar utilities.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{HumanBytes, MultiProgress, ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;

use crate::download::{InFlightFetch, ProgressAggregator};

/// Create a spinner for long-running operations.
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Create a progress bar for item counts, with live byte totals as its message.
pub fn create_item_bar(total: u64, message: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    let template = format!(
        "{{spinner:.green}} {} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {{msg}}",
        message
    );
    if let Ok(style) = ProgressStyle::default_bar().template(&template) {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar
}

/// Create the line shown under the overall bar for one running file.
pub fn create_file_bar(name: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("  {spinner:.blue} {msg} {bytes} ({bytes_per_sec})")
    {
        bar.set_style(style);
    }
    bar.set_message(name.to_string());
    bar
}

/// Refresh the display from the aggregator every `interval`.
///
/// `overall` gets the live byte total as its message. With `show_files`, one
/// line per running fetch is kept in `multi` below it. The returned task runs
/// until aborted.
pub fn spawn_progress_ticker(
    multi: MultiProgress,
    overall: ProgressBar,
    aggregator: Arc<ProgressAggregator>,
    interval: Duration,
    show_files: bool,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut file_bars = HashMap::new();
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            overall.set_message(progress_message(&aggregator));
            if show_files {
                sync_file_bars(&multi, &mut file_bars, &aggregator.in_flight());
            }
        }
    })
}

fn progress_message(aggregator: &ProgressAggregator) -> String {
    format!(
        "{} written, {} active",
        HumanBytes(aggregator.live_bytes()),
        aggregator.active_fetches()
    )
}

/// Add bars for new fetches, advance running ones, drop finished ones.
fn sync_file_bars(
    multi: &MultiProgress,
    bars: &mut HashMap<u64, ProgressBar>,
    running: &[InFlightFetch],
) {
    bars.retain(|id, bar| {
        let still_running = running.iter().any(|fetch| fetch.id == *id);
        if !still_running {
            bar.finish_and_clear();
            multi.remove(bar);
        }
        still_running
    });

    for fetch in running {
        let bar = bars
            .entry(fetch.id)
            .or_insert_with(|| multi.add(create_file_bar(&fetch.name)));
        bar.set_position(fetch.bytes);
    }
}
