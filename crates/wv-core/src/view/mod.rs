//! Displayable series derived from the dataset
//!
//! Everything here is a pure function of its inputs; views are recomputed
//! on demand instead of being cached.

mod compose;
mod slice;
mod stats;

pub use compose::compose;
pub use slice::slice;
pub use stats::{summarize, FieldStats, ViewSummary};

use serde::{Serialize, Serializer};
use crate::model::{CombinedPoint, Mode, TimePoint};

/// The series shown for the active mode
#[derive(Debug, Clone, PartialEq)]
pub enum ViewSeries {
    /// One source, as loaded
    Single {
        mode: Mode,
        points: Vec<TimePoint>,
    },
    /// Solar and wind actuals side by side
    Combined(Vec<CombinedPoint>),
}

impl ViewSeries {
    pub fn empty(mode: Mode) -> Self {
        match mode {
            Mode::Combined => ViewSeries::Combined(Vec::new()),
            mode => ViewSeries::Single { mode, points: Vec::new() },
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            ViewSeries::Single { mode, .. } => *mode,
            ViewSeries::Combined(_) => Mode::Combined,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ViewSeries::Single { points, .. } => points.len(),
            ViewSeries::Combined(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plot field names for this view
    pub fn field_names(&self) -> &'static [&'static str] {
        self.mode().field_names()
    }

    /// Timestamp of the point at `index`
    pub fn timestamp(&self, index: usize) -> Option<&str> {
        match self {
            ViewSeries::Single { points, .. } => points.get(index)?.timestamp.as_deref(),
            ViewSeries::Combined(points) => points.get(index)?.timestamp.as_deref(),
        }
    }

    /// Values of each plot field at `index`, in `field_names` order
    pub fn values(&self, index: usize) -> Option<Vec<f64>> {
        match self {
            ViewSeries::Single { points, .. } => {
                let point = points.get(index)?;
                Some(vec![point.forecast_best, point.actual_output, point.forecast_worst])
            }
            ViewSeries::Combined(points) => {
                let point = points.get(index)?;
                Some(vec![point.solar_real, point.wind_real])
            }
        }
    }
}

/// Serializes as the bare point array the chart consumes
impl Serialize for ViewSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ViewSeries::Single { points, .. } => points.serialize(serializer),
            ViewSeries::Combined(points) => points.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_point_array() {
        let view = ViewSeries::Combined(vec![CombinedPoint {
            timestamp: Some("2024-05-01 10:00:00".to_string()),
            solar_real: 3.5,
            wind_real: 0.0,
        }]);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json[0]["full_date"], "2024-05-01 10:00:00");
        assert_eq!(json[0]["solar_real"], 3.5);

        let single = ViewSeries::Single {
            mode: Mode::Wind,
            points: vec![TimePoint::new("t", 1.0, 2.0, 0.5)],
        };
        let json = serde_json::to_value(&single).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["expected_worst"], 0.5);
    }

    #[test]
    fn test_values_follow_field_names() {
        let single = ViewSeries::Single {
            mode: Mode::Solar,
            points: vec![TimePoint::new("t", 1.0, 2.0, 0.5)],
        };
        assert_eq!(single.field_names().len(), single.values(0).unwrap().len());
        assert_eq!(single.values(0), Some(vec![2.0, 1.0, 0.5]));
        assert_eq!(single.values(1), None);

        let empty = ViewSeries::empty(Mode::Combined);
        assert_eq!(empty.values(0), None);
        assert_eq!(empty.field_names(), &["solar_real", "wind_real"]);
    }
}
