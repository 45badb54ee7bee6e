//! The validated record produced from one feed feature.
//!
//! `EarthquakeRecord` is what the parser hands to the rest of the
//! application.  By the time one exists, every required property has been
//! found and type-checked; there is no "partially decoded" state.
//!
//! ## Time representation
//!
//! `time_ms` is the feed's own value: milliseconds since the Unix epoch,
//! UTC.  It is kept as an integer everywhere in the pipeline and only turned
//! into a calendar date when a row is drawn.

/// One seismic event, normalised from a GeoJSON feature.
#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeRecord {
    /// Event magnitude.  Always finite; may be negative for micro-quakes.
    pub magnitude: f64,

    /// Free-text description of the location (e.g. "10km N of X").
    /// May be empty.
    pub location: String,

    /// Origin time in epoch milliseconds (UTC).
    pub time_ms: i64,
}

impl EarthquakeRecord {
    pub fn new(magnitude: f64, location: impl Into<String>, time_ms: i64) -> Self {
        Self {
            magnitude,
            location: location.into(),
            time_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
