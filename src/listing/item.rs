//! Work item representation.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::Result;
use crate::fs::sanitize_filename;

/// One file to fetch: where it lives remotely and where it goes locally.
///
/// Immutable once built; fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    url: Url,
    name: String,
    destination: PathBuf,
}

impl WorkItem {
    /// Create an item saving `url` as `name` inside `destination_dir`.
    ///
    /// The name is sanitized; names that could escape the directory are
    /// rejected.
    pub fn new(url: Url, name: &str, destination_dir: &Path) -> Result<Self> {
        let name = sanitize_filename(name)?;
        let destination = destination_dir.join(&name);

        Ok(Self {
            url,
            name,
            destination,
        })
    }

    /// Remote locator.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Destination file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full destination path.
    pub fn destination_path(&self) -> &Path {
        &self.destination
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_joins_destination() {
        let url = Url::parse("https://example.com/media/a.mp3").unwrap();
        let item = WorkItem::new(url, "a.mp3", Path::new("/tmp/out")).unwrap();
        assert_eq!(item.name(), "a.mp3");
        assert_eq!(item.destination_path(), Path::new("/tmp/out/a.mp3"));
        assert_eq!(item.url().path(), "/media/a.mp3");
    }

    #[test]
    fn test_new_rejects_traversal() {
        let url = Url::parse("https://example.com/x").unwrap();
        assert!(WorkItem::new(url, "../x", Path::new("/tmp/out")).is_err());
    }
}
