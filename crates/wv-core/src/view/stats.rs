//! Summary statistics over a visible slice

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::parse_timestamp;
use super::ViewSeries;

/// Statistics for one plotted field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStats {
    pub name: &'static str,
    /// Sum over the window; MWh for hourly data
    pub total: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Summary of a view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSummary {
    pub count: usize,
    pub first_timestamp: Option<String>,
    pub last_timestamp: Option<String>,
    /// Hours between first and last timestamp, when both parse
    pub span_hours: Option<i64>,
    pub fields: Vec<FieldStats>,
    /// Hours whose actual output lies inside the forecast band (single-source views)
    pub within_forecast: Option<usize>,
}

/// Summarize `view`; an empty view yields zero counts and no fields
pub fn summarize(view: &ViewSeries) -> ViewSummary {
    let count = view.len();
    let first_timestamp = view.timestamp(0).map(str::to_string);
    let last_timestamp = count.checked_sub(1).and_then(|i| view.timestamp(i)).map(str::to_string);

    let span_hours = match (
        first_timestamp.as_deref().and_then(parse_timestamp),
        last_timestamp.as_deref().and_then(parse_timestamp),
    ) {
        (Some(first), Some(last)) => Some(hours_between(first, last)),
        _ => None,
    };

    let fields = if count == 0 {
        Vec::new()
    } else {
        view.field_names()
            .iter()
            .copied()
            .enumerate()
            .map(|(column, name)| {
                let values = (0..count).filter_map(|i| view.values(i).map(|v| v[column]));
                field_stats(name, values, count)
            })
            .collect()
    };

    let within_forecast = match view {
        ViewSeries::Single { points, .. } => Some(points.iter().filter(|p| p.within_forecast()).count()),
        ViewSeries::Combined(_) => None,
    };

    ViewSummary {
        count,
        first_timestamp,
        last_timestamp,
        span_hours,
        fields,
        within_forecast,
    }
}

fn field_stats(name: &'static str, values: impl Iterator<Item = f64>, count: usize) -> FieldStats {
    let mut total = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values {
        total += value;
        min = min.min(value);
        max = max.max(value);
    }

    FieldStats {
        name,
        total,
        min,
        max,
        mean: total / count as f64,
    }
}

fn hours_between(first: NaiveDateTime, last: NaiveDateTime) -> i64 {
    (last - first).num_hours()
}
