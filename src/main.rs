//! Listing Downloader - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use indicatif::{MultiProgress, ProgressDrawTarget};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use listing_downloader::{
    cli::Args,
    config::{validate_config, Config, ReportFormat},
    download::{download_all, Completion, FetchOutcome, Fetcher, ProgressAggregator, WorkerPool},
    error::{exit_codes, Error, Result},
    http::HttpClient,
    listing::discover,
    output::{
        create_item_bar, create_spinner, print_banner, print_config_summary, print_error,
        print_info, print_run_summary, print_skipped, print_success, print_summary_json,
        print_warning, spawn_progress_ticker,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        tracing::debug!(
            "Configuration file not found: {}, using defaults",
            config_path.display()
        );
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    let text_report = config.options.report_format == ReportFormat::Text;
    if text_report {
        print_banner();
        print_config_summary(
            &source_description(&config),
            &config.download_directory().display().to_string(),
            config.options.concurrency,
            config.options.timeout_seconds,
        );
    }

    // Discover the work list
    let client = HttpClient::new(&config.options.user_agent)?;
    let spinner = create_spinner("Collecting file links...");
    let discovered = discover(&client, &config).await;
    spinner.finish_and_clear();
    let items = discovered?;

    if text_report {
        print_info(&format!("Found {} file(s) to download", items.len()));
    }

    // Stop dispatching on Ctrl-C; in-flight transfers finish
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, finishing active downloads");
                shutdown.cancel();
            }
        });
    }

    let fetcher = Fetcher::from_config(client, &config);
    let pool = WorkerPool::new(fetcher, config.options.concurrency)?;
    let aggregator = Arc::new(ProgressAggregator::new(items.len() as u64));

    let show_progress = config.options.show_downloads && text_report;
    let multi = if show_progress {
        MultiProgress::new()
    } else {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    };
    let bar = multi.add(create_item_bar(items.len() as u64, "Downloading"));
    let ticker = spawn_progress_ticker(
        multi.clone(),
        bar.clone(),
        Arc::clone(&aggregator),
        Duration::from_millis(250),
        show_progress,
    );

    let show_downloads = config.options.show_downloads;
    let show_skipped = config.options.show_skipped_downloads;
    let summary = download_all(
        &pool,
        items,
        config.download_directory(),
        Arc::clone(&aggregator),
        shutdown,
        |completion| {
            if text_report {
                multi.suspend(|| report_completion(completion, show_downloads, show_skipped));
            }
            bar.inc(1);
        },
    )
    .await;

    ticker.abort();
    bar.finish_and_clear();
    if let Err(e) = multi.clear() {
        tracing::debug!("Could not clear progress display: {}", e);
    }
    let summary = summary?;

    match config.options.report_format {
        ReportFormat::Text => print_run_summary(&summary),
        ReportFormat::Json => print_summary_json(&summary)?,
    }

    if summary.interrupted {
        return Err(Error::Aborted(summary.files_not_attempted));
    }

    if summary.files_failed > 0 {
        return Err(Error::ItemsFailed(summary.files_failed));
    }

    Ok(())
}

/// Print one line for a finished file.
fn report_completion(completion: &Completion, show_downloads: bool, show_skipped: bool) {
    let name = completion.item.name();
    match &completion.outcome {
        FetchOutcome::Succeeded { bytes_transferred } if show_downloads => {
            print_success(&format!("{} ({} bytes)", name, bytes_transferred));
        }
        FetchOutcome::Skipped if show_skipped => {
            print_skipped(&format!("{} (already downloaded)", name));
        }
        FetchOutcome::Failed { kind, reason } => {
            print_warning(&format!("{} failed [{}]: {}", name, kind, reason));
        }
        _ => {}
    }
}

fn source_description(config: &Config) -> String {
    match (&config.source.listing_url, &config.source.urls_file) {
        (Some(url), _) => url.clone(),
        (None, Some(path)) => format!("URL file {}", path.display()),
        (None, None) => "none".to_string(),
    }
}
