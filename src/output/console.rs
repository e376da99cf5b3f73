//! Console output utilities.

use console::{style, StyledObject};

fn status_line(tag: StyledObject<&str>, message: &str) -> String {
    format!("{} {}", tag, message)
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{}", status_line(style("INFO").cyan().bold(), message));
}

/// Print a finished download.
pub fn print_success(message: &str) {
    println!("{}", status_line(style("OK").green().bold(), message));
}

/// Print a skipped-file message.
pub fn print_skipped(message: &str) {
    println!("{}", status_line(style("SKIP").dim(), message));
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{}", status_line(style("WARN").yellow().bold(), message));
}

/// Print an error message to stderr.
pub fn print_error(message: &str) {
    eprintln!("{}", status_line(style("ERROR").red().bold(), message));
}

pub fn print_banner() {
    println!(
        "{} {}",
        style("listing-downloader").cyan().bold(),
        style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
    );
}

/// Print where files come from and how they will be fetched.
pub fn print_config_summary(source: &str, download_dir: &str, concurrency: usize, timeout_seconds: u64) {
    println!("  {:<12} {}", style("Source").bold(), source);
    println!("  {:<12} {}", style("Directory").bold(), download_dir);
    println!(
        "  {:<12} {} at a time, {}s timeout per file",
        style("Downloads").bold(),
        concurrency,
        timeout_seconds
    );
    println!();
}
