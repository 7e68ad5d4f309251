//! Lenient decoding of feed records
//!
//! Feed records are never rejected: a missing or unparsable number reads
//! as `0.0`, a missing timestamp as `None`.

use serde_json::{Map, Value};
use tracing::warn;
use wv_core::{Dataset, Series, TimePoint, TIMESTAMP_KEYS};

use crate::config::NullConfig;
use crate::DataError;

/// Column names of the raw scraper exports, accepted after the feed names
const RAW_TIMESTAMP_KEY: &str = "Full Date";
const ACTUAL_KEYS: [&str; 2] = ["total_hourly_real", "Total Hourly Energy (REAL)"];
const BEST_KEYS: [&str; 2] = ["expected_best", "EXPECTED - BEST"];
const WORST_KEYS: [&str; 2] = ["expected_worst", "EXPECTED - WORST"];

/// Turns loosely typed feed values into time points
#[derive(Debug, Clone, Default)]
pub struct RecordDecoder {
    null_config: NullConfig,
}

impl RecordDecoder {
    pub fn new(null_config: NullConfig) -> Self {
        Self { null_config }
    }

    /// Decode a full feed response `{"solar": [...], "wind": [...]}`.
    ///
    /// An `{"error": ...}` body is how the feed reports a failed query and
    /// becomes [`DataError::Feed`]. A missing series decodes as empty.
    pub fn decode_feed(&self, value: &Value) -> Result<Dataset, DataError> {
        let Some(object) = value.as_object() else {
            return Err(DataError::Feed(format!("expected an object, got {}", type_name(value))));
        };

        if let Some(error) = object.get("error") {
            let message = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(DataError::Feed(message));
        }

        Ok(Dataset::new(
            self.decode_series(object.get("solar").unwrap_or(&Value::Null)),
            self.decode_series(object.get("wind").unwrap_or(&Value::Null)),
        ))
    }

    /// Decode an array of records; anything else is an empty series
    pub fn decode_series(&self, value: &Value) -> Series {
        match value {
            Value::Array(records) => records.iter().map(|r| self.decode_point(r)).collect(),
            Value::Null => Series::new(),
            other => {
                warn!(found = type_name(other), "series is not an array, treating as empty");
                Series::new()
            }
        }
    }

    /// Decode one record; non-object records become an all-default point
    pub fn decode_point(&self, value: &Value) -> TimePoint {
        let Some(record) = value.as_object() else {
            return TimePoint::default();
        };

        TimePoint {
            timestamp: timestamp(record),
            actual_output: self.first_number(record, &ACTUAL_KEYS),
            forecast_best: self.first_number(record, &BEST_KEYS),
            forecast_worst: self.first_number(record, &WORST_KEYS),
        }
    }

    /// Read a numeric field, falling back to `0.0`
    pub fn number(&self, value: Option<&Value>) -> f64 {
        let parsed = match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => self.parse_text(s),
            _ => None,
        };
        parsed.unwrap_or(0.0)
    }

    /// Parse a textual number; null markers and garbage yield `None`
    pub fn parse_text(&self, text: &str) -> Option<f64> {
        if self.null_config.is_null(text) {
            return None;
        }
        text.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    fn first_number(&self, record: &Map<String, Value>, keys: &[&str]) -> f64 {
        // Like the timestamp lookup, a key holding null counts as absent
        let value = keys
            .iter()
            .find_map(|key| record.get(*key).filter(|v| !v.is_null()));
        self.number(value)
    }
}

/// Timestamp of a record: the first of `tarih`, `full_date` (then the raw
/// export's `Full Date`) holding a non-null value.
pub fn timestamp(record: &Map<String, Value>) -> Option<String> {
    TIMESTAMP_KEYS
        .iter()
        .copied()
        .chain(std::iter::once(RAW_TIMESTAMP_KEY))
        .find_map(|key| match record.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
