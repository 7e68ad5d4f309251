//! Range slicing of a composed view

use crate::navigation::Range;
use super::ViewSeries;

/// Visible part of `view`: indices `start..=min(end, len - 1)`.
///
/// A range left over from a longer series never indexes out of bounds; when
/// its start lies past the last point the result is empty.
pub fn slice(view: &ViewSeries, range: Range) -> ViewSeries {
    if view.is_empty() {
        return ViewSeries::empty(view.mode());
    }

    let last = view.len() - 1;
    let end = range.end.min(last);
    if range.start > end {
        return ViewSeries::empty(view.mode());
    }

    match view {
        ViewSeries::Single { mode, points } => ViewSeries::Single {
            mode: *mode,
            points: points[range.start..=end].to_vec(),
        },
        ViewSeries::Combined(points) => ViewSeries::Combined(points[range.start..=end].to_vec()),
    }
}
