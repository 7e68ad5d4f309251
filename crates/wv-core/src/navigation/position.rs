use serde::{Serialize, Deserialize};

/// A pair of indices bounding the visible window, both inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of indices between the handles, inclusive
    pub fn span(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }
}

/// Slider position of `index` on a track of `length` points, in percent.
///
/// Divides by `max(length - 1, 1)`, so a one- or zero-point track maps
/// index 0 to 0 instead of dividing by zero.
pub fn percent(index: usize, length: usize) -> f64 {
    let denominator = length.saturating_sub(1).max(1);
    index as f64 / denominator as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_endpoints() {
        assert_eq!(percent(0, 200), 0.0);
        assert_eq!(percent(199, 200), 100.0);
        assert_eq!(percent(50, 101), 50.0);
    }

    #[test]
    fn test_percent_degenerate_lengths() {
        assert_eq!(percent(0, 1), 0.0);
        assert_eq!(percent(0, 0), 0.0);
        assert!(percent(1, 1).is_finite());
    }

    #[test]
    fn test_span() {
        assert_eq!(Range::new(0, 168).span(), 169);
        assert_eq!(Range::new(4, 5).span(), 2);
    }
}
