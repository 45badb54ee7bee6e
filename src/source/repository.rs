//! Fetch-then-parse orchestration.

use super::{parse, EarthquakeRecord, FeedError, Fetch, ParseOutcome};

/// Loads a feed through a [`Fetch`] implementation and decodes it.
///
/// Holds no state between calls: every load is a full new fetch.
pub struct FeedRepository<F> {
    fetcher: F,
}

impl<F: Fetch> FeedRepository<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Fetch and parse, keeping the failure kind.
    ///
    /// The raw body is dropped as soon as parsing returns.
    pub fn try_load(&self, url: &str) -> Result<ParseOutcome, FeedError> {
        let body = self.fetcher.fetch(url)?;
        let outcome = parse(&body)?;
        Ok(outcome)
    }

    /// Fetch and parse, degrading every failure to an empty list.
    ///
    /// Failures are logged; skipped features are counted in the log but the
    /// surviving records are still returned.
    pub fn load(&self, url: &str) -> Vec<EarthquakeRecord> {
        match self.try_load(url) {
            Ok(outcome) => {
                if !outcome.skipped.is_empty() {
                    tracing::warn!(
                        url,
                        skipped = outcome.skipped.len(),
                        "dropped malformed features"
                    );
                }
                tracing::info!(url, count = outcome.records.len(), "feed loaded");
                outcome.records
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "feed load failed");
                Vec::new()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
