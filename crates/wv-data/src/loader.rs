//! Background dataset loading

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};
use wv_core::Dashboard;

use crate::sources::EnergySource;

/// Load `source` into `dashboard` on the tokio runtime.
///
/// The dashboard stays usable while the load runs. On failure the error is
/// logged and published, and the dashboard keeps its empty state. Callers
/// that don't care when the load lands may drop the handle.
pub fn spawn_load(dashboard: Arc<Dashboard>, source: Arc<dyn EnergySource>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let name = source.source_name().to_string();
        info!(source = %name, "loading dataset");

        match source.load().await {
            Ok(dataset) => {
                dashboard.load_dataset(&name, dataset);
            }
            Err(e) => {
                error!(source = %name, error = %e, "failed to load dataset");
                dashboard.report_load_failure(&name, &e.to_string());
            }
        }
    })
}
