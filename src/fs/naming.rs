//! Destination filename handling.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Suffix of the hidden file a download is streamed into before the rename.
pub const PARTIAL_SUFFIX: &str = ".part";

/// Validate and sanitize a filename taken from a remote URL.
///
/// Returns an error if the name could escape the destination directory or
/// collides with the naming scheme used for in-progress downloads.
pub fn sanitize_filename(name: &str) -> Result<String> {
    if name == "." || name == ".." {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    if is_partial_name(name) {
        return Err(Error::InvalidFilename(format!(
            "Name is reserved for in-progress downloads: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

/// Path of the temporary file used while `destination` is being downloaded.
///
/// `dir/name.ext` becomes `dir/.name.ext.part`, so it shares the directory
/// (and filesystem) with the destination and the final rename is atomic.
pub fn partial_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.with_file_name(format!(".{}{}", name, PARTIAL_SUFFIX))
}

fn is_partial_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(PARTIAL_SUFFIX)
}
