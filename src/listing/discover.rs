//! Building the work list from a configured source.

use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::config::{parse_listing_url, Config};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::listing::item::WorkItem;
use crate::listing::parser::{parse_listing, parse_url_list};

/// Discover work items from whichever source the configuration names.
pub async fn discover(client: &HttpClient, config: &Config) -> Result<Vec<WorkItem>> {
    let destination = config.download_directory();

    match (&config.source.listing_url, &config.source.urls_file) {
        (Some(url), _) => {
            let url = parse_listing_url(url)?;
            discover_from_listing(client, &url, config.listing_timeout(), destination).await
        }
        (None, Some(path)) => discover_from_file(path, destination).await,
        (None, None) => Err(Error::MissingConfig(
            "source (a listing URL or --input-file)".to_string(),
        )),
    }
}

/// Fetch a directory listing page and collect the files it links to.
pub async fn discover_from_listing(
    client: &HttpClient,
    listing_url: &Url,
    timeout: Duration,
    destination_dir: &Path,
) -> Result<Vec<WorkItem>> {
    tracing::info!("Fetching listing: {}", listing_url);

    let html = client.get_text(listing_url, timeout).await?;
    let items = parse_listing(listing_url, &html, destination_dir);

    tracing::debug!("Listing {} yielded {} files", listing_url, items.len());
    Ok(items)
}

/// Read a URL list file and collect its entries.
pub async fn discover_from_file(path: &Path, destination_dir: &Path) -> Result<Vec<WorkItem>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::Listing(format!("Could not read {}: {}", path.display(), e)))?;

    let items = parse_url_list(&text, destination_dir);

    tracing::debug!("{} yielded {} files", path.display(), items.len());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_discover_from_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/media/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a href="../">up</a><a href="one.mp3">1</a><a href="two.mp3">2</a>"#,
            ))
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.source.listing_url = Some(format!("{}/media/", server.uri()));
        config.options.download_directory = "/tmp/unused".into();

        let client = HttpClient::new("test-agent/1.0").unwrap();
        let items = discover(&client, &config).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].url().as_str(), format!("{}/media/one.mp3", server.uri()));
    }

    #[tokio::test]
    async fn test_discover_from_listing_unreachable() {
        let client = HttpClient::new("test-agent/1.0").unwrap();
        let url = Url::parse("http://127.0.0.1:1/media/").unwrap();
        let err = discover_from_listing(&client, &url, Duration::from_secs(5), Path::new("/tmp"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Listing(_)));
    }

    #[tokio::test]
    async fn test_discover_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("urls.txt");
        std::fs::write(&list, "https://example.com/a.bin\nhttps://example.com/b.bin\n").unwrap();

        let items = discover_from_file(&list, dir.path()).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].destination_path(), dir.path().join("b.bin"));
    }

    #[tokio::test]
    async fn test_discover_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_from_file(&dir.path().join("nope.txt"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Listing(_)));
    }
}
