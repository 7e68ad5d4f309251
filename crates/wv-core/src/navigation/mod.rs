//! Range navigation over the displayed series

mod position;
mod selector;
mod subscriber;

pub use position::{percent, Range};
pub use selector::{RangeSelector, DEFAULT_WINDOW_HOURS};
pub use subscriber::DashboardSubscriber;
