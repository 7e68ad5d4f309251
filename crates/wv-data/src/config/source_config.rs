//! Where and how to load the dataset

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use serde::{Serialize, Deserialize};
use wv_core::DEFAULT_WINDOW_HOURS;

use super::null_handling::NullConfig;
use crate::sources::{EnergySource, JsonFeedSource, SqliteSource};
use crate::sources::sqlite_source::{DEFAULT_SOLAR_TABLE, DEFAULT_WIND_TABLE};
use crate::DataError;

/// Source type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Saved feed response
    Json,
    /// Statistics database behind the feed
    Sqlite,
}

impl SourceKind {
    /// Guess the kind from a file extension; unknown extensions are JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
            Some("db" | "sqlite" | "sqlite3") => SourceKind::Sqlite,
            _ => SourceKind::Json,
        }
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(SourceKind::Json),
            "sqlite" | "db" => Ok(SourceKind::Sqlite),
            other => Err(format!("Unknown source kind '{}' (expected json or sqlite)", other)),
        }
    }
}

/// Configuration for the dataset source and the initial window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Source type; inferred from the path when absent
    pub kind: Option<SourceKind>,

    /// Path to the feed snapshot or database
    pub path: PathBuf,

    /// Solar table name for SQLite sources
    pub solar_table: String,

    /// Wind table name for SQLite sources
    pub wind_table: String,

    /// Null handling configuration
    pub null_config: NullConfig,

    /// Hours shown after a range reset
    pub window_hours: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: None,
            path: PathBuf::from("energy_feed.json"),
            solar_table: DEFAULT_SOLAR_TABLE.to_string(),
            wind_table: DEFAULT_WIND_TABLE.to_string(),
            null_config: NullConfig::default(),
            window_hours: DEFAULT_WINDOW_HOURS,
        }
    }
}

impl SourceConfig {
    /// Read a JSON config file; missing keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let path = path.as_ref();
        let body = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DataError::NotFound(path.to_path_buf()),
            _ => DataError::Io(e),
        })?;
        let config: SourceConfig = serde_json::from_slice(&body)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.window_hours == 0 {
            return Err(DataError::Config("window_hours must be at least 1".to_string()));
        }
        if self.path.as_os_str().is_empty() {
            return Err(DataError::Config("path must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn resolved_kind(&self) -> SourceKind {
        self.kind.unwrap_or_else(|| SourceKind::from_path(&self.path))
    }

    /// Build the configured source
    pub fn build_source(&self) -> Result<Arc<dyn EnergySource>, DataError> {
        self.validate()?;
        let source: Arc<dyn EnergySource> = match self.resolved_kind() {
            SourceKind::Json => Arc::new(JsonFeedSource::new(&self.path, self.null_config.clone())),
            SourceKind::Sqlite => Arc::new(SqliteSource::with_tables(
                &self.path,
                &self.solar_table,
                &self.wind_table,
                self.null_config.clone(),
            )?),
        };
        Ok(source)
    }
}
