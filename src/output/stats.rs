//! Run summary reporting.

use console::style;

use crate::download::RunSummary;
use crate::error::Result;

/// Print the human-readable run summary.
pub fn print_run_summary(summary: &RunSummary) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Download Summary:").bold());
    println!("  Directory:   {}", summary.destination.display());
    println!("  Identified:  {}", summary.files_identified);
    println!("  Downloaded:  {}", style(summary.files_succeeded).green());
    println!("  Skipped:     {} (already present)", summary.files_skipped);
    if summary.files_failed > 0 {
        println!("  Failed:      {}", style(summary.files_failed).red());
    }
    if summary.interrupted {
        println!(
            "  Interrupted: {} not attempted",
            style(summary.files_not_attempted).yellow()
        );
    }
    println!("  Transferred: {:.2} MB", summary.megabytes_transferred());
    println!("  Time:        {:.2} seconds", summary.duration.as_secs_f64());

    if !summary.failures.is_empty() {
        println!();
        println!("{}", style("Failed files:").bold());
        for failure in &summary.failures {
            println!("  {} ({})", style(&failure.name).red(), failure.url);
            println!("    {}: {}", failure.kind, failure.reason);
        }
    }
    println!("{}", style("═".repeat(50)).dim());
}

/// Print the run summary as pretty JSON on stdout.
pub fn print_summary_json(summary: &RunSummary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
