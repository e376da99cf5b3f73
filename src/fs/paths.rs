//! Destination directory and file state checks.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;

use crate::error::{Error, Result};

/// Ensure the destination directory exists and is a directory.
///
/// Returns `true` if the directory had to be created.
pub async fn ensure_destination_dir(path: &Path) -> Result<bool> {
    let destination_error = |source| Error::Destination {
        path: path.to_path_buf(),
        source,
    };

    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(false),
        Ok(_) => Err(destination_error(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "path exists and is not a directory",
        ))),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::create_dir_all(path).await.map_err(destination_error)?;
            Ok(true)
        }
        Err(e) => Err(destination_error(e)),
    }
}

/// Whether `path` holds a finished download: a regular file with content.
///
/// A zero-byte file is treated as incomplete.
pub async fn is_complete_file(path: &Path) -> std::io::Result<bool> {
    match fs::metadata(path).await {
        Ok(meta) => Ok(meta.is_file() && meta.len() > 0),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Remove a leftover file, ignoring it if already gone.
pub async fn remove_if_exists(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != ErrorKind::NotFound {
            tracing::warn!("Could not remove {}: {}", path.display(), e);
        }
    }
}
