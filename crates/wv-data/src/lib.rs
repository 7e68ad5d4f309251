//! Dataset sources for the energy dashboard

pub mod config;
pub mod decode;
pub mod import;
pub mod loader;
pub mod sources;

use std::path::PathBuf;
use tokio::task::JoinError;
use thiserror::Error;

// Re-exports
pub use config::{NullConfig, SourceConfig, SourceKind};
pub use decode::RecordDecoder;
pub use import::{import_export_file, import_records, setup_database};
pub use loader::spawn_load;
pub use sources::{EnergySource, JsonFeedSource, SqliteSource};

/// Errors that can occur while loading a dataset
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(String),

    #[error("Feed reported an error: {0}")]
    Feed(String),

    #[error("Invalid export file: {0}")]
    InvalidExport(String),

    #[error("Data source not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}

impl From<rusqlite::Error> for DataError {
    fn from(error: rusqlite::Error) -> Self {
        DataError::Sqlite(error.to_string())
    }
}
