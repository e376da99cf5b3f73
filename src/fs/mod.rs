//! Filesystem module.
//!
//! Provides:
//! - Destination directory management
//! - Filename sanitizing and partial-file naming

pub mod naming;
pub mod paths;

pub use naming::{partial_path, sanitize_filename, PARTIAL_SUFFIX};
pub use paths::{ensure_destination_dir, is_complete_file, remove_if_exists};
