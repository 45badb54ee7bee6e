//! Record → row binding for the list view.
//!
//! [`RowAdapter`] owns the currently displayed records and hands out
//! [`RowSurface`]s on demand.  The renderer asks only for the rows it is
//! about to draw and passes back surfaces from the previous frame so they can
//! be rebound instead of reallocated.
//!
//! ## For contributors
//!
//! The record slice is shared as `Arc<[EarthquakeRecord]>` and is only ever
//! replaced wholesale by [`RowAdapter::replace`].  Never mutate records in
//! place; a row bound mid-frame must see either the old list or the new one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::source::EarthquakeRecord;

/// Requested row index is past the end of the list.  This is a caller bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("row index {index} out of range for {len} rows")]
pub struct IndexOutOfRange {
    pub index: usize,
    pub len: usize,
}

/// Reusable display unit for one list position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSurface {
    /// List index this surface is currently bound to.
    pub position: usize,
    pub magnitude: f64,
    pub location: String,
    pub time_ms: i64,
}

impl RowSurface {
    /// Overwrite every displayed field from `record`.
    ///
    /// The location buffer is reused, so rebinding a recycled surface does
    /// not allocate unless the new text is longer than any seen before.
    pub fn bind(&mut self, position: usize, record: &EarthquakeRecord) {
        self.position = position;
        self.magnitude = record.magnitude;
        self.location.clear();
        self.location.push_str(&record.location);
        self.time_ms = record.time_ms;
    }

    /// Magnitude as decimal text without adding or dropping precision;
    /// whole values keep one decimal place (`4` → `"4.0"`).
    pub fn magnitude_label(&self) -> String {
        if self.magnitude.fract() == 0.0 {
            format!("{:.1}", self.magnitude)
        } else {
            self.magnitude.to_string()
        }
    }

    /// Origin time as a UTC timestamp, or `None` if the epoch value is
    /// outside chrono's representable range.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.time_ms)
    }
}

/// Serves rows for the current record list.
#[derive(Debug, Clone)]
pub struct RowAdapter {
    records: Arc<[EarthquakeRecord]>,
}

impl Default for RowAdapter {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl RowAdapter {
    pub fn new(records: Vec<EarthquakeRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// Swap in a freshly loaded list.
    pub fn replace(&mut self, records: Vec<EarthquakeRecord>) {
        self.records = records.into();
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Bind the record at `index`, reusing `reusable` when given.
    ///
    /// Panics in debug builds when `index` is out of range.
    pub fn row_at(
        &self,
        index: usize,
        reusable: Option<RowSurface>,
    ) -> Result<RowSurface, IndexOutOfRange> {
        let len = self.records.len();
        debug_assert!(index < len, "row index {index} out of range for {len} rows");
        let record = self
            .records
            .get(index)
            .ok_or(IndexOutOfRange { index, len })?;

        let mut row = reusable.unwrap_or_default();
        row.bind(index, record);
        Ok(row)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
