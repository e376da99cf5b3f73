//! Shared HTTP client.

use std::time::Duration;

use reqwest::{header, Client, Response};
use url::Url;

use crate::error::{Error, Result};

/// HTTP client shared by listing discovery and every file fetch.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Build a client sending browser-like headers with every request.
    pub fn new(user_agent: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("en-US,en;q=0.5"),
        );
        headers.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            header::HeaderValue::from_static("1"),
        );

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Start a streaming GET. The body is not read.
    ///
    /// Status codes are not checked here; callers classify them.
    pub async fn get(&self, url: &Url) -> reqwest::Result<Response> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        tracing::debug!("Response status for {}: {}", url, response.status());
        Ok(response)
    }

    /// Fetch a page as text, failing on any non-success status.
    pub async fn get_text(&self, url: &Url, timeout: Duration) -> Result<String> {
        tracing::debug!("GET {} (timeout {}s)", url, timeout.as_secs());

        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| describe_listing_error(url, timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Listing(format!("HTTP {} from {}", status, url)));
        }

        response
            .text()
            .await
            .map_err(|e| describe_listing_error(url, timeout, e))
    }
}

fn describe_listing_error(url: &Url, timeout: Duration, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Listing(format!(
            "Connection to {} timed out after {} seconds",
            url,
            timeout.as_secs()
        ))
    } else {
        Error::Listing(format!("Could not fetch {}: {}", url, err))
    }
}
