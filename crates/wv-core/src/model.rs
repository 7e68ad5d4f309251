//! Energy data model
//!
//! Field names on the serialized forms are the ones the chart layer plots,
//! so they follow the upstream feed rather than Rust naming.

use std::fmt;
use std::str::FromStr;
use chrono::NaiveDateTime;
use serde::{Serialize, Deserialize};

/// Keys that may carry the timestamp of a feed record, in lookup order.
///
/// The feed has shipped both the localized `tarih` and the database column
/// name `full_date`; the first key present wins.
pub const TIMESTAMP_KEYS: [&str; 2] = ["tarih", "full_date"];

/// Timestamp layouts seen in `full_date` values
const TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// One hourly sample of one energy source
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TimePoint {
    /// Source-provided timestamp, kept verbatim
    #[serde(rename = "full_date")]
    pub timestamp: Option<String>,

    /// Measured output in MW
    #[serde(rename = "total_hourly_real")]
    pub actual_output: f64,

    /// Optimistic forecast in MW
    #[serde(rename = "expected_best")]
    pub forecast_best: f64,

    /// Pessimistic forecast in MW
    #[serde(rename = "expected_worst")]
    pub forecast_worst: f64,
}

impl TimePoint {
    pub fn new(timestamp: impl Into<String>, actual_output: f64, forecast_best: f64, forecast_worst: f64) -> Self {
        Self {
            timestamp: Some(timestamp.into()),
            actual_output,
            forecast_best,
            forecast_worst,
        }
    }

    /// Whether the measured output lies inside the forecast band
    pub fn within_forecast(&self) -> bool {
        let (low, high) = if self.forecast_worst <= self.forecast_best {
            (self.forecast_worst, self.forecast_best)
        } else {
            (self.forecast_best, self.forecast_worst)
        };
        self.actual_output >= low && self.actual_output <= high
    }
}

/// Ordered hourly samples of one source
pub type Series = Vec<TimePoint>;

/// Parse a feed timestamp, if it uses one of the known layouts
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Display mode of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Solar,
    Wind,
    #[default]
    Combined,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Solar, Mode::Wind, Mode::Combined];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Solar => "solar",
            Mode::Wind => "wind",
            Mode::Combined => "combined",
        }
    }

    /// Numeric fields the chart plots for this mode
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            Mode::Solar | Mode::Wind => &["expected_best", "total_hourly_real", "expected_worst"],
            Mode::Combined => &["solar_real", "wind_real"],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solar" => Ok(Mode::Solar),
            "wind" => Ok(Mode::Wind),
            "combined" => Ok(Mode::Combined),
            other => Err(format!("Unknown mode '{}' (expected solar, wind or combined)", other)),
        }
    }
}

/// Solar and wind actuals for one hour, built in combined mode
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CombinedPoint {
    #[serde(rename = "full_date")]
    pub timestamp: Option<String>,
    pub solar_real: f64,
    pub wind_real: f64,
}

/// Both series as delivered by the feed
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Dataset {
    pub solar: Series,
    pub wind: Series,
}

impl Dataset {
    pub fn new(solar: Series, wind: Series) -> Self {
        Self { solar, wind }
    }

    pub fn is_empty(&self) -> bool {
        self.solar.is_empty() && self.wind.is_empty()
    }

    /// Length of the series shown in `mode`
    pub fn view_len(&self, mode: Mode) -> usize {
        match mode {
            Mode::Solar | Mode::Combined => self.solar.len(),
            Mode::Wind => self.wind.len(),
        }
    }
}
