//! Dual-handle range selector

use tracing::trace;
use super::position::{percent, Range};

/// Default visible window: one week of hourly data
pub const DEFAULT_WINDOW_HOURS: usize = 168;

/// Keeps a `(start, end)` index pair with `start < end` at all times.
///
/// Handles are only ordered against each other; they are not clamped
/// against the series length; `reset` is expected whenever the length
/// changes and the slice step keeps reads in bounds.
#[derive(Debug, Clone)]
pub struct RangeSelector {
    range: Range,
    window: usize,
}

impl RangeSelector {
    /// Create a selector with the default one-week window
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW_HOURS)
    }

    /// Create a selector whose `reset` opens `window` indices past the start
    pub fn with_window(window: usize) -> Self {
        Self {
            range: Range::new(0, 1),
            window: window.max(1),
        }
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Move the start handle; it stops one index short of the end handle
    pub fn set_start(&mut self, value: usize) {
        self.range.start = value.min(self.range.end - 1);
        trace!(requested = value, start = self.range.start, "range start moved");
    }

    /// Move the end handle; it stops one index past the start handle
    pub fn set_end(&mut self, value: usize) {
        self.range.end = value.max(self.range.start.saturating_add(1));
        trace!(requested = value, end = self.range.end, "range end moved");
    }

    /// Reopen the default window for a series of `length` points.
    ///
    /// The end is capped to the last index, but never drops below 1 so
    /// the handles stay ordered on series of zero or one point.
    pub fn reset(&mut self, length: usize) {
        let end = length.saturating_sub(1).min(self.window).max(1);
        self.range = Range::new(0, end);
        trace!(length, end, "range reset");
    }

    /// Slider positions of both handles, in percent of a `length`-point track
    pub fn positions(&self, length: usize) -> (f64, f64) {
        (percent(self.range.start, length), percent(self.range.end, length))
    }
}

impl Default for RangeSelector {
    fn default() -> Self {
        Self::new()
    }
}
