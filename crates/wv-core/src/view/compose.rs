//! View composition per display mode

use crate::model::{CombinedPoint, Mode, Series};
use super::ViewSeries;

/// Derive the displayable series for `mode`.
///
/// In combined mode the solar series decides length and timestamps; hours
/// past the end of the wind series read as zero wind output.
pub fn compose(solar: &Series, wind: &Series, mode: Mode) -> ViewSeries {
    match mode {
        Mode::Solar => ViewSeries::Single {
            mode,
            points: solar.clone(),
        },
        Mode::Wind => ViewSeries::Single {
            mode,
            points: wind.clone(),
        },
        Mode::Combined => {
            let points = solar
                .iter()
                .enumerate()
                .map(|(i, point)| CombinedPoint {
                    timestamp: point.timestamp.clone(),
                    solar_real: point.actual_output,
                    wind_real: wind.get(i).map(|w| w.actual_output).unwrap_or(0.0),
                })
                .collect();
            ViewSeries::Combined(points)
        }
    }
}
