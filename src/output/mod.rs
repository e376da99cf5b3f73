//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Progress bars
//! - Run summary reporting

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{
    print_banner, print_config_summary, print_error, print_info, print_skipped, print_success,
    print_warning,
};
pub use progress::{create_file_bar, create_item_bar, create_spinner, spawn_progress_ticker};
pub use stats::{print_run_summary, print_summary_json};
