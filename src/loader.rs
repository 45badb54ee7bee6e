//! Background feed loading.
//!
//! Each [`Loader::request`] runs one [`FeedRepository::load`] on its own
//! thread and sends the result back to the UI thread over an [`mpsc`]
//! channel, tagged with a generation number.  The UI keeps the generation of
//! the newest request it started and ignores anything older, so a slow
//! earlier load can never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use crate::source::{EarthquakeRecord, Fetch, FeedRepository};

/// Message sent from a loader thread to the UI thread.
#[derive(Debug)]
pub struct LoadMsg {
    /// Which request produced this result.
    pub generation: u64,
    /// Loaded records; empty on failure.
    pub records: Vec<EarthquakeRecord>,
}

/// Starts loads off the UI thread.
pub struct Loader<F> {
    repository: Arc<FeedRepository<F>>,
    generation: Arc<AtomicU64>,
    tx: mpsc::Sender<LoadMsg>,
    rx: mpsc::Receiver<LoadMsg>,
}

impl<F: Fetch + 'static> Loader<F> {
    pub fn new(repository: FeedRepository<F>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            repository: Arc::new(repository),
            generation: Arc::new(AtomicU64::new(0)),
            tx,
            rx,
        }
    }

    /// Start a load of `url` and return its generation.
    ///
    /// Generations increase strictly with each call.
    pub fn request(&self, url: &str) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let repository = Arc::clone(&self.repository);
        let latest = Arc::clone(&self.generation);
        let tx = self.tx.clone();
        let url = url.to_string();

        thread::spawn(move || {
            let records = repository.load(&url);

            // Superseded while in flight; the UI would drop it anyway.
            if latest.load(Ordering::SeqCst) != generation {
                tracing::debug!(generation, "discarding stale load");
                return;
            }
            // Receiver gone means the UI has exited.
            let _ = tx.send(LoadMsg {
                generation,
                records,
            });
        });

        tracing::debug!(generation, "load requested");
        generation
    }

    /// Non-blocking receive of the next finished load.
    pub fn try_recv(&self) -> Option<LoadMsg> {
        self.rx.try_recv().ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FetchError;
    use std::sync::mpsc::RecvTimeoutError;
    use std::time::Duration;

    /// Responds after a per-URL delay so tests can force completion order.
    struct DelayedFetcher;

    impl Fetch for DelayedFetcher {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            let (delay_ms, place) = url.split_once('/').ok_or(FetchError::Timeout)?;
            let delay_ms: u64 = delay_ms.parse().map_err(|_| FetchError::Timeout)?;
            thread::sleep(Duration::from_millis(delay_ms));
            Ok(format!(
                r#"{{"features": [{{"properties": {{"mag": 1.0, "place": "{place}", "time": 1}}}}]}}"#
            ))
        }
    }

    fn recv(loader: &Loader<DelayedFetcher>) -> Result<LoadMsg, RecvTimeoutError> {
        loader.rx.recv_timeout(Duration::from_secs(5))
    }

    #[test]
    fn generations_increase() {
        let loader = Loader::new(FeedRepository::new(DelayedFetcher));
        let a = loader.request("0/a");
        let b = loader.request("0/b");
        assert!(b > a);
    }

    #[test]
    fn delivers_records_off_thread() {
        let loader = Loader::new(FeedRepository::new(DelayedFetcher));
        let generation = loader.request("0/here");

        let msg = recv(&loader).unwrap();

        assert_eq!(msg.generation, generation);
        assert_eq!(msg.records[0].location, "here");
    }

    #[test]
    fn failed_fetch_delivers_empty_list() {
        let loader = Loader::new(FeedRepository::new(DelayedFetcher));
        loader.request("garbage");

        let msg = recv(&loader).unwrap();

        assert!(msg.records.is_empty());
    }

    #[test]
    fn late_stale_result_is_not_delivered() {
        let loader = Loader::new(FeedRepository::new(DelayedFetcher));
        loader.request("300/old");
        let newest = loader.request("0/new");

        let msg = recv(&loader).unwrap();
        assert_eq!(msg.generation, newest);
        assert_eq!(msg.records[0].location, "new");

        // The slow first load finishes later and must stay silent.
        assert!(loader.rx.recv_timeout(Duration::from_millis(600)).is_err());
    }
}
