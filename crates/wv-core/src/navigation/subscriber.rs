//! Dashboard subscriber trait

use crate::state::DashboardContext;

/// Trait for components that need to respond to dashboard changes
pub trait DashboardSubscriber: Send + Sync {
    /// Called after the dataset, mode or range changes
    fn on_dashboard_change(&self, context: &DashboardContext);
}
