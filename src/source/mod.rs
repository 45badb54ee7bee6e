//! Earthquake feed pipeline: fetch → parse → repository.
//!
//! This module defines the [`Fetch`] trait, the error taxonomy shared by the
//! pipeline, and re-exports the concrete pieces:
//!
//! * [`HttpFetcher`] — one GET with separate connect and read timeouts.
//! * [`parse`] — GeoJSON text into [`EarthquakeRecord`]s, isolating bad items.
//! * [`FeedRepository`] — glues the two together and never fails the caller.
//!
//! ## For contributors
//!
//! Errors are values all the way up to [`FeedRepository::try_load`].  Only
//! [`FeedRepository::load`] collapses them into an empty list, after logging,
//! because that is the shape the list front-end wants.

mod earthquake;
mod fetcher;
mod geojson;
mod repository;

pub use earthquake::EarthquakeRecord;
pub use fetcher::{HttpFetcher, CONNECT_TIMEOUT, MAX_BODY_SIZE, READ_TIMEOUT};
pub use geojson::{parse, ParseOutcome};
pub use repository::FeedRepository;

use thiserror::Error;

/// Failures of a single network fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be parsed or is not http/https.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    /// DNS, connect, TLS or transport failure.
    #[error("network failure: {0}")]
    NetworkFailure(#[source] reqwest::Error),
    /// Connect or read deadline elapsed.
    #[error("request timed out")]
    Timeout,
    /// The server answered with something other than 200.
    #[error("HTTP status {0}")]
    HttpStatus(u16),
    /// Body exceeded the size limit.
    #[error("response body larger than {limit} bytes")]
    ResponseTooLarge { limit: usize },
    /// Body was not valid UTF-8.
    #[error("response body is not valid UTF-8")]
    InvalidBody,
    /// The runtime driving the HTTP client could not be started.
    #[error("failed to start HTTP runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::NetworkFailure(err)
        }
    }
}

/// The feed document as a whole could not be used.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed feed: {0}")]
    MalformedFeed(String),
}

/// Any failure that stops a load from producing records.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Something that can retrieve a feed document as text.
///
/// [`FeedRepository`] is generic over this so that tests can substitute a
/// canned response for the network.  Implementations are called from a
/// background loader thread, hence `Send + Sync`.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
