//! Listing parsing utilities.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use crate::listing::item::WorkItem;

#[allow(clippy::expect_used)]
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Extract every anchor href from an HTML page, in document order.
///
/// Attribute values come back with character references decoded. Anchors
/// inside comments or script bodies are not elements and are never returned.
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(|href| href.trim().to_string())
        .collect()
}

/// Whether an href points at a directory, a sort link, or back up the tree.
pub fn is_navigation_href(href: &str) -> bool {
    href.is_empty()
        || href == "../"
        || href == "./"
        || href.ends_with('/')
        || href.starts_with('?')
        || href.starts_with('#')
}

/// Derive a destination name from the last path segment of a URL.
///
/// Percent-encoding is decoded. Returns `None` if the URL has no file name.
pub fn derive_name(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.last()?;
    if segment.is_empty() {
        return None;
    }

    let name = match urlencoding::decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment.to_string(),
    };

    Some(name)
}

/// Turn a directory listing page into work items.
///
/// Links are resolved against `base`. Navigation links, non-HTTP links and
/// links without a usable file name are dropped; the first link wins when two
/// resolve to the same destination name.
pub fn parse_listing(base: &Url, html: &str, destination_dir: &Path) -> Vec<WorkItem> {
    let mut collector = ItemCollector::new(destination_dir);

    for href in extract_hrefs(html) {
        if is_navigation_href(&href) {
            continue;
        }

        match base.join(&href) {
            Ok(url) => collector.push(url),
            Err(e) => tracing::debug!("Ignoring unresolvable link '{}': {}", href, e),
        }
    }

    collector.finish()
}

/// Turn a plain text list of URLs into work items.
///
/// One URL per line; blank lines and lines starting with `#` are ignored.
/// Invalid lines are logged and skipped.
pub fn parse_url_list(text: &str, destination_dir: &Path) -> Vec<WorkItem> {
    let mut collector = ItemCollector::new(destination_dir);

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match Url::parse(line) {
            Ok(url) => collector.push(url),
            Err(e) => tracing::warn!("Line {}: invalid URL '{}': {}", index + 1, line, e),
        }
    }

    collector.finish()
}

/// Builds a de-duplicated item list.
struct ItemCollector<'a> {
    destination_dir: &'a Path,
    seen: HashSet<String>,
    items: Vec<WorkItem>,
}

impl<'a> ItemCollector<'a> {
    fn new(destination_dir: &'a Path) -> Self {
        Self {
            destination_dir,
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }

    fn push(&mut self, url: Url) {
        if !matches!(url.scheme(), "http" | "https") {
            tracing::debug!("Ignoring non-HTTP link: {}", url);
            return;
        }

        let Some(name) = derive_name(&url) else {
            tracing::debug!("Ignoring link without a file name: {}", url);
            return;
        };

        let item = match WorkItem::new(url, &name, self.destination_dir) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!("Skipping link with unusable name: {}", e);
                return;
            }
        };

        if !self.seen.insert(item.name().to_string()) {
            tracing::debug!("Ignoring duplicate destination: {}", item.name());
            return;
        }

        self.items.push(item);
    }

    fn finish(self) -> Vec<WorkItem> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APACHE_INDEX: &str = r#"
<html><body><h1>Index of /track_media</h1>
<a href="?C=N;O=D">Name</a>
<a href="../">Parent Directory</a>
<a href="./">.</a>
<a href="subdir/">subdir/</a>
<a href="first%20track.mp3">first track.mp3</a>
<A HREF='second.mp3'>second.mp3</A>
<a class="x" href=third.mp3>third.mp3</a>
<a href="https://cdn.example.org/other/fourth.mp3?sig=1&amp;t=2">fourth</a>
<a href="second.mp3">duplicate</a>
<a href="mailto:admin@example.com">mail</a>
</body></html>
"#;

    fn base() -> Url {
        Url::parse("https://example.com/storage/track_media/").unwrap()
    }

    #[test]
    fn test_extract_hrefs_all_quote_styles() {
        let hrefs = extract_hrefs(APACHE_INDEX);
        assert!(hrefs.contains(&"second.mp3".to_string()));
        assert!(hrefs.contains(&"third.mp3".to_string()));
        assert!(hrefs.contains(&"https://cdn.example.org/other/fourth.mp3?sig=1&t=2".to_string()));
    }

    #[test]
    fn test_navigation_hrefs() {
        assert!(is_navigation_href("../"));
        assert!(is_navigation_href("./"));
        assert!(is_navigation_href("subdir/"));
        assert!(is_navigation_href("?C=M;O=A"));
        assert!(is_navigation_href(""));
        assert!(!is_navigation_href("song.mp3"));
    }

    #[test]
    fn test_derive_name() {
        let url = Url::parse("https://example.com/a/b%20c.mp3?x=1").unwrap();
        assert_eq!(derive_name(&url).as_deref(), Some("b c.mp3"));

        let url = Url::parse("https://example.com/a/").unwrap();
        assert_eq!(derive_name(&url), None);
    }

    #[test]
    fn test_parse_listing() {
        let dir = Path::new("/downloads");
        let items = parse_listing(&base(), APACHE_INDEX, dir);
        let names: Vec<&str> = items.iter().map(|i| i.name()).collect();

        assert_eq!(
            names,
            vec!["first track.mp3", "second.mp3", "third.mp3", "fourth.mp3"]
        );
        assert_eq!(
            items[1].url().as_str(),
            "https://example.com/storage/track_media/second.mp3"
        );
        assert_eq!(items[3].url().host_str(), Some("cdn.example.org"));
        assert_eq!(
            items[0].destination_path(),
            Path::new("/downloads/first track.mp3")
        );
    }

    #[test]
    fn test_hidden_anchors_are_ignored() {
        let html = r#"
<!-- <a href="hidden.mp3">hidden</a> -->
<script>document.write('<a href="scripted.mp3">x</a>');</script>
<a href="visible.mp3">visible</a>
"#;
        assert_eq!(extract_hrefs(html), vec!["visible.mp3"]);
    }

    #[test]
    fn test_entity_encoded_hrefs_are_decoded() {
        let html = r#"<a href="a&#38;b.mp3">a</a><a href="c&quot;d.mp3">c</a><a href="e&#x26;f.mp3">e</a>"#;
        let items = parse_listing(&base(), html, Path::new("/out"));
        let names: Vec<&str> = items.iter().map(|i| i.name()).collect();

        assert_eq!(names, vec!["a&b.mp3", "c_d.mp3", "e&f.mp3"]);
        assert_eq!(
            items[0].url().as_str(),
            "https://example.com/storage/track_media/a&b.mp3"
        );
        assert_eq!(items[0].url().fragment(), None);
        assert_eq!(
            items[1].url().as_str(),
            "https://example.com/storage/track_media/c%22d.mp3"
        );
    }

    #[test]
    fn test_names_with_repeated_dots_are_kept() {
        let html = r#"<a href="Vol..1.mp3">1</a><a href="track...mp3">2</a><a href="ok.mp3">3</a>"#;
        let items = parse_listing(&base(), html, Path::new("/out"));
        let names: Vec<&str> = items.iter().map(|i| i.name()).collect();

        assert_eq!(names, vec!["Vol..1.mp3", "track...mp3", "ok.mp3"]);
    }

    #[test]
    fn test_parse_url_list() {
        let text = "\
# comment
https://example.com/a.bin

not a url
https://example.com/other/a.bin
ftp://example.com/b.bin
https://example.com/c.bin
";
        let items = parse_url_list(text, Path::new("/out"));
        let names: Vec<&str> = items.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["a.bin", "c.bin"]);
    }
}
