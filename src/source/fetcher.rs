//! HTTP retrieval of the feed document.
//!
//! [`HttpFetcher`] performs exactly one GET per call.  The connect deadline
//! and the read timeout are configured separately on the client: the first
//! bounds TCP/TLS setup, the second bounds every wait for response bytes
//! once connected.  The response (and with it the pooled connection) is
//! owned by the fetch and dropped on every return path.
//!
//! The client is reqwest's async one, driven by a small current-thread
//! runtime owned by the fetcher, so callers still see a blocking call.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tokio::runtime::{Builder, Runtime};
use url::Url;

use super::{Fetch, FetchError};

/// Default deadline for establishing the TCP/TLS connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(1500);
/// Default limit on any single wait for response data.
pub const READ_TIMEOUT: Duration = Duration::from_millis(1000);
/// Bodies above this size are rejected rather than buffered.
pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Blocking GeoJSON fetcher.
///
/// Must not be called from the UI thread: a dead host can hold a call for
/// the whole connect deadline.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    runtime: Arc<Runtime>,
    max_body_size: usize,
}

impl HttpFetcher {
    /// Build a fetcher with explicit connect and read bounds.
    pub fn with_timeouts(connect: Duration, read: Duration) -> Result<Self, FetchError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(FetchError::Runtime)?;

        let client = Client::builder()
            .connect_timeout(connect)
            .read_timeout(read)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::NetworkFailure)?;

        Ok(Self {
            client,
            runtime: Arc::new(runtime),
            max_body_size: MAX_BODY_SIZE,
        })
    }

    /// Override the body size limit.
    pub fn max_body_size(mut self, limit: usize) -> Self {
        self.max_body_size = limit;
        self
    }

    async fn get_text(&self, url: Url) -> Result<String, FetchError> {
        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let limit = self.max_body_size;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(FetchError::ResponseTooLarge { limit });
        }

        // Streamed so the limit holds even without Content-Length.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len().saturating_add(chunk.len()) > limit {
                return Err(FetchError::ResponseTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        String::from_utf8(body).map_err(|_| FetchError::InvalidBody)
    }
}

/// Accept only absolute http(s) URLs.
fn validate_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw).map_err(|e| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let url = validate_url(url)?;

        tracing::debug!(url = %url, "fetching feed");
        self.runtime.block_on(self.get_text(url))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
