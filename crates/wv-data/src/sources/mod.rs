pub mod json_source;
pub mod sqlite_source;

pub use json_source::JsonFeedSource;
pub use sqlite_source::SqliteSource;

use async_trait::async_trait;
use wv_core::Dataset;
use crate::DataError;

/// A place the dashboard's dataset can be loaded from
#[async_trait]
pub trait EnergySource: Send + Sync {
    /// Load both series in one snapshot
    async fn load(&self) -> Result<Dataset, DataError>;

    /// Get the source name/path
    fn source_name(&self) -> &str;
}
