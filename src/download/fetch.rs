//! Single file fetching.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::download::outcome::{FailureKind, FetchOutcome};
use crate::fs::{is_complete_file, partial_path, remove_if_exists};
use crate::http::HttpClient;
use crate::listing::WorkItem;

/// Downloads one work item at a time. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: HttpClient,
    timeout: Duration,
    chunk_size: usize,
}

impl Fetcher {
    /// Create a fetcher with a per-item timeout and write chunk size.
    pub fn new(client: HttpClient, timeout: Duration, chunk_size: usize) -> Self {
        Self {
            client,
            timeout,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Create a fetcher from the validated configuration.
    pub fn from_config(client: HttpClient, config: &Config) -> Self {
        Self::new(client, config.item_timeout(), config.options.chunk_size)
    }

    /// Fetch one item, producing exactly one outcome.
    ///
    /// `on_chunk` receives the size of every chunk written to disk. The
    /// destination only ever appears complete: bytes go to a hidden partial
    /// file that is renamed into place after the last chunk, and removed on
    /// failure.
    pub async fn fetch<F>(&self, item: &WorkItem, mut on_chunk: F) -> FetchOutcome
    where
        F: FnMut(u64) + Send,
    {
        let destination = item.destination_path();

        match is_complete_file(destination).await {
            Ok(true) => {
                tracing::debug!("Skipping {} (already downloaded)", item.name());
                return FetchOutcome::Skipped;
            }
            Ok(false) => {}
            Err(e) => {
                return FetchOutcome::failed(
                    FailureKind::Io,
                    format!("Cannot inspect {}: {}", destination.display(), e),
                )
            }
        }

        let partial = partial_path(destination);
        let streamed = tokio::time::timeout(
            self.timeout,
            self.stream_to_file(item, &partial, &mut on_chunk),
        )
        .await;

        let outcome = match streamed {
            Ok(Ok(bytes)) => match fs::rename(&partial, destination).await {
                Ok(()) => FetchOutcome::Succeeded {
                    bytes_transferred: bytes,
                },
                Err(e) => FetchOutcome::failed(
                    FailureKind::Io,
                    format!("Could not move download into place: {}", e),
                ),
            },
            Ok(Err(failure)) => failure.into(),
            Err(_) => FetchOutcome::failed(
                FailureKind::Timeout,
                format!(
                    "Connection timed out after {:.1} seconds",
                    self.timeout.as_secs_f64()
                ),
            ),
        };

        if outcome.is_failed() {
            remove_if_exists(&partial).await;
        }

        outcome
    }

    /// Stream the response body into `partial`, returning the byte count.
    async fn stream_to_file<F>(
        &self,
        item: &WorkItem,
        partial: &Path,
        on_chunk: &mut F,
    ) -> Result<u64, Failure>
    where
        F: FnMut(u64) + Send,
    {
        let response = self
            .client
            .get(item.url())
            .await
            .map_err(Failure::from_request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Failure::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("HTTP {}", status),
            ));
        }

        let expected = response.content_length();
        let file = File::create(partial)
            .await
            .map_err(|e| Failure::io(partial, e))?;
        let mut writer = ChunkWriter::new(file, self.chunk_size);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(Failure::from_request)?;
            writer
                .write(&chunk, on_chunk)
                .await
                .map_err(|e| Failure::io(partial, e))?;
        }

        let written = writer
            .finish(on_chunk)
            .await
            .map_err(|e| Failure::io(partial, e))?;

        if let Some(expected) = expected {
            if written != expected {
                return Err(Failure::new(
                    FailureKind::Transport,
                    format!(
                        "Incomplete body: expected {} bytes, got {}",
                        expected, written
                    ),
                ));
            }
        }

        Ok(written)
    }
}

/// Turns one work item into exactly one outcome.
///
/// [`WorkerPool`](crate::download::WorkerPool) drives any implementation;
/// [`Fetcher`] is the HTTP one.
pub trait ItemFetcher: Clone + Send + Sync + 'static {
    fn fetch_item<F>(
        &self,
        item: &WorkItem,
        on_chunk: F,
    ) -> impl Future<Output = FetchOutcome> + Send
    where
        F: FnMut(u64) + Send;
}

impl ItemFetcher for Fetcher {
    fn fetch_item<F>(
        &self,
        item: &WorkItem,
        on_chunk: F,
    ) -> impl Future<Output = FetchOutcome> + Send
    where
        F: FnMut(u64) + Send,
    {
        self.fetch(item, on_chunk)
    }
}

/// Internal failure carried out of the streaming step.
#[derive(Debug)]
struct Failure {
    kind: FailureKind,
    reason: String,
}

impl Failure {
    fn new(kind: FailureKind, reason: String) -> Self {
        Self { kind, reason }
    }

    fn from_request(err: reqwest::Error) -> Self {
        Self::new(FailureKind::from(&err), error_chain(&err))
    }

    fn io(path: &Path, err: std::io::Error) -> Self {
        Self::new(
            FailureKind::Io,
            format!("Writing {} failed: {}", path.display(), err),
        )
    }
}

impl From<Failure> for FetchOutcome {
    fn from(failure: Failure) -> Self {
        FetchOutcome::failed(failure.kind, failure.reason)
    }
}

/// Render an error with its sources, e.g. "error sending request: connection refused".
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Regroups arbitrary network chunks into fixed-size writes.
struct ChunkWriter {
    file: File,
    buffer: Vec<u8>,
    chunk_size: usize,
    written: u64,
}

impl ChunkWriter {
    fn new(file: File, chunk_size: usize) -> Self {
        Self {
            file,
            buffer: Vec::with_capacity(chunk_size),
            chunk_size,
            written: 0,
        }
    }

    async fn write<F: FnMut(u64)>(
        &mut self,
        mut data: &[u8],
        on_chunk: &mut F,
    ) -> std::io::Result<()> {
        while !data.is_empty() {
            let take = (self.chunk_size - self.buffer.len()).min(data.len());
            self.buffer.extend_from_slice(&data[..take]);
            data = &data[take..];

            if self.buffer.len() == self.chunk_size {
                self.flush_chunk(on_chunk).await?;
            }
        }
        Ok(())
    }

    async fn flush_chunk<F: FnMut(u64)>(&mut self, on_chunk: &mut F) -> std::io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.file.write_all(&self.buffer).await?;
        let len = self.buffer.len() as u64;
        self.written += len;
        self.buffer.clear();
        on_chunk(len);
        Ok(())
    }

    async fn finish<F: FnMut(u64)>(mut self, on_chunk: &mut F) -> std::io::Result<u64> {
        self.flush_chunk(on_chunk).await?;
        self.file.flush().await?;
        self.file.sync_all().await?;
        Ok(self.written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(timeout: Duration) -> Fetcher {
        Fetcher::new(HttpClient::new("test-agent/1.0").unwrap(), timeout, 1024)
    }

    fn item(base: &str, name: &str, dir: &Path) -> WorkItem {
        let url = Url::parse(&format!("{}/{}", base, name)).unwrap();
        WorkItem::new(url, name, dir).unwrap()
    }

    async fn serve(server: &MockServer, route: &str, body: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_writes_file_in_chunks() {
        let server = MockServer::start().await;
        let body: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        serve(&server, "/track.mp3", body.clone()).await;

        let dir = tempfile::tempdir().unwrap();
        let item = item(&server.uri(), "track.mp3", dir.path());
        let mut deltas = Vec::new();

        let outcome = fetcher(Duration::from_secs(10))
            .fetch(&item, |d| deltas.push(d))
            .await;

        assert_eq!(
            outcome,
            FetchOutcome::Succeeded {
                bytes_transferred: 5000
            }
        );
        assert_eq!(std::fs::read(item.destination_path()).unwrap(), body);
        assert_eq!(deltas, vec![1024, 1024, 1024, 1024, 904]);
        assert!(!partial_path(item.destination_path()).exists());
    }

    #[tokio::test]
    async fn test_fetch_skips_complete_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let item = item(&server.uri(), "done.mp3", dir.path());
        std::fs::write(item.destination_path(), b"old content").unwrap();

        let outcome = fetcher(Duration::from_secs(10)).fetch(&item, |_| {}).await;

        assert_eq!(outcome, FetchOutcome::Skipped);
        assert_eq!(
            std::fs::read(item.destination_path()).unwrap(),
            b"old content"
        );
    }

    #[tokio::test]
    async fn test_fetch_refetches_empty_file() {
        let server = MockServer::start().await;
        serve(&server, "/empty.mp3", b"fresh".to_vec()).await;

        let dir = tempfile::tempdir().unwrap();
        let item = item(&server.uri(), "empty.mp3", dir.path());
        std::fs::write(item.destination_path(), b"").unwrap();

        let outcome = fetcher(Duration::from_secs(10)).fetch(&item, |_| {}).await;

        assert_eq!(
            outcome,
            FetchOutcome::Succeeded {
                bytes_transferred: 5
            }
        );
        assert_eq!(std::fs::read(item.destination_path()).unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn test_fetch_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let item = item(&server.uri(), "missing.mp3", dir.path());

        let outcome = fetcher(Duration::from_secs(10)).fetch(&item, |_| {}).await;

        assert!(matches!(
            outcome,
            FetchOutcome::Failed {
                kind: FailureKind::HttpStatus(404),
                ..
            }
        ));
        assert!(!item.destination_path().exists());
        assert!(!partial_path(item.destination_path()).exists());
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let dir = tempfile::tempdir().unwrap();
        let item = item("http://127.0.0.1:1", "nowhere.mp3", dir.path());

        let outcome = fetcher(Duration::from_secs(10)).fetch(&item, |_| {}).await;

        assert!(matches!(
            outcome,
            FetchOutcome::Failed {
                kind: FailureKind::Transport,
                ..
            }
        ));
        assert!(!item.destination_path().exists());
    }

    #[tokio::test]
    async fn test_fetch_short_body_fails() {
        use tokio::io::AsyncReadExt;
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 2048];
            let _ = socket.read(&mut request).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 4096\r\nConnection: close\r\n\r\n")
                .await
                .unwrap();
            socket.write_all(&[9u8; 1000]).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let dir = tempfile::tempdir().unwrap();
        let item = item(&format!("http://{}", addr), "short.mp3", dir.path());

        let outcome = fetcher(Duration::from_secs(10)).fetch(&item, |_| {}).await;

        assert!(matches!(
            outcome,
            FetchOutcome::Failed {
                kind: FailureKind::Transport,
                ..
            }
        ));
        assert!(!item.destination_path().exists());
        assert!(!partial_path(item.destination_path()).exists());
    }

    #[tokio::test]
    async fn test_fetch_timeout_leaves_nothing_behind() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![1u8; 2048])
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let item = item(&server.uri(), "slow.mp3", dir.path());

        let outcome = fetcher(Duration::from_millis(300))
            .fetch(&item, |_| {})
            .await;

        match outcome {
            FetchOutcome::Failed { kind, reason } => {
                assert_eq!(kind, FailureKind::Timeout);
                assert!(reason.contains("timed out"));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(!item.destination_path().exists());
        assert!(!partial_path(item.destination_path()).exists());
    }
}
