//! GeoJSON feed decoding.
//!
//! The document is decoded in two stages.  First the envelope: the body must
//! be a JSON object with a `features` array, otherwise the whole feed is
//! rejected with [`ParseError::MalformedFeed`].  Then each feature is decoded
//! on its own, so one bad element is reported as an [`ItemError`] and skipped
//! while its neighbours still come through.
//!
//! Output order is always the order of the `features` array.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::{EarthquakeRecord, ParseError};

/// Records decoded from one feed, plus diagnostics for the features that
/// were dropped.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParseOutcome {
    pub records: Vec<EarthquakeRecord>,
    pub skipped: Vec<ItemError>,
}

/// A single feature that could not become a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed item at index {index}: {reason}")]
pub struct ItemError {
    /// Position in the `features` array.
    pub index: usize,
    pub reason: String,
}

#[derive(Deserialize)]
struct Envelope {
    features: Vec<Value>,
}

#[derive(Deserialize)]
struct Feature {
    properties: Option<Properties>,
}

/// `Option` everywhere so that absent and `null` are both reported by name
/// instead of as a generic serde error.
#[derive(Deserialize)]
struct Properties {
    mag: Option<NumberOrText>,
    place: Option<String>,
    time: Option<NumberOrText>,
}

/// USGS sends numbers, but some mirrors quote them.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrText {
    fn to_magnitude(&self) -> Option<f64> {
        let value = match self {
            NumberOrText::Number(n) => n.as_f64()?,
            NumberOrText::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    fn to_epoch_millis(&self) -> Option<i64> {
        match self {
            NumberOrText::Number(n) => n.as_i64(),
            NumberOrText::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }
}

/// Decode a feed document.
///
/// Returns `Err` only when the envelope itself is unusable; bad individual
/// features end up in [`ParseOutcome::skipped`].
pub fn parse(text: &str) -> Result<ParseOutcome, ParseError> {
    let root: Value =
        serde_json::from_str(text).map_err(|e| ParseError::MalformedFeed(format!("invalid JSON: {e}")))?;

    if !root.is_object() {
        return Err(ParseError::MalformedFeed("top level is not an object".into()));
    }

    let envelope: Envelope = serde_json::from_value(root)
        .map_err(|e| ParseError::MalformedFeed(format!("missing or invalid \"features\": {e}")))?;

    let mut outcome = ParseOutcome::default();
    for (index, feature) in envelope.features.into_iter().enumerate() {
        match decode_feature(feature) {
            Ok(record) => outcome.records.push(record),
            Err(reason) => {
                tracing::debug!(index, reason = %reason, "skipping malformed feature");
                outcome.skipped.push(ItemError { index, reason });
            }
        }
    }

    Ok(outcome)
}

fn decode_feature(value: Value) -> Result<EarthquakeRecord, String> {
    let feature: Feature = serde_json::from_value(value).map_err(|e| e.to_string())?;
    let props = feature.properties.ok_or("missing properties")?;

    let magnitude = props
        .mag
        .ok_or("missing mag")?
        .to_magnitude()
        .ok_or("mag is not a finite number")?;
    let location = props.place.ok_or("missing place")?;
    let time_ms = props
        .time
        .ok_or("missing time")?
        .to_epoch_millis()
        .ok_or("time is not an integer")?;

    Ok(EarthquakeRecord::new(magnitude, location, time_ms))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
