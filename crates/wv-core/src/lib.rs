//! Core of the energy dashboard
//!
//! Holds the solar/wind dataset, the display mode and the visible range,
//! and derives the series to plot from them.

pub mod events;
pub mod model;
pub mod navigation;
pub mod state;
pub mod view;

// Re-export commonly used types
pub use model::{CombinedPoint, Dataset, Mode, Series, TimePoint, TIMESTAMP_KEYS};
pub use navigation::{percent, DashboardSubscriber, Range, RangeSelector, DEFAULT_WINDOW_HOURS};
pub use state::{Dashboard, DashboardContext};
pub use view::{compose, slice, summarize, ViewSeries, ViewSummary};
