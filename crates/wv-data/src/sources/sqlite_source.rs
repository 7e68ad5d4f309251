//! SQLite data source implementation
//!
//! Reads the per-source statistics tables the feed server queries.

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use rusqlite::{Connection, OpenFlags, types::ValueRef};
use tracing::debug;
use wv_core::{Dataset, Series, TimePoint};

use crate::config::NullConfig;
use crate::decode::RecordDecoder;
use crate::DataError;
use super::EnergySource;

pub const DEFAULT_SOLAR_TABLE: &str = "solar_energy_stats";
pub const DEFAULT_WIND_TABLE: &str = "wind_energy_stats";

/// SQLite data source implementation
#[derive(Clone)]
pub struct SqliteSource {
    path: PathBuf,
    name: String,
    solar_table: String,
    wind_table: String,
    decoder: RecordDecoder,
}

impl SqliteSource {
    /// Create a source over the default table names
    pub fn new<P: AsRef<Path>>(path: P, null_config: NullConfig) -> Result<Self, DataError> {
        Self::with_tables(path, DEFAULT_SOLAR_TABLE, DEFAULT_WIND_TABLE, null_config)
    }

    /// Create a source over custom table names
    pub fn with_tables<P: AsRef<Path>>(
        path: P,
        solar_table: &str,
        wind_table: &str,
        null_config: NullConfig,
    ) -> Result<Self, DataError> {
        validate_table_name(solar_table)?;
        validate_table_name(wind_table)?;

        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("energy.db")
            .to_string();

        Ok(Self {
            path,
            name,
            solar_table: solar_table.to_string(),
            wind_table: wind_table.to_string(),
            decoder: RecordDecoder::new(null_config),
        })
    }

    /// Read one statistics table in stored order
    fn read_table(&self, conn: &Connection, table_name: &str) -> Result<Series, DataError> {
        let query = format!(
            "SELECT full_date, total_hourly_real, expected_best, expected_worst FROM {} ORDER BY rowid",
            table_name
        );
        let mut stmt = conn.prepare(&query)?;
        let mut rows = stmt.query([])?;

        let mut series = Series::new();
        while let Some(row) = rows.next()? {
            series.push(TimePoint {
                timestamp: text_value(row.get_ref(0)?),
                actual_output: self.number_value(row.get_ref(1)?),
                forecast_best: self.number_value(row.get_ref(2)?),
                forecast_worst: self.number_value(row.get_ref(3)?),
            });
        }

        debug!(table = table_name, rows = series.len(), "read table");
        Ok(series)
    }

    fn number_value(&self, value: ValueRef<'_>) -> f64 {
        match value {
            ValueRef::Integer(i) => i as f64,
            ValueRef::Real(f) => f,
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| self.decoder.parse_text(s))
                .unwrap_or(0.0),
            ValueRef::Null | ValueRef::Blob(_) => 0.0,
        }
    }

    fn read_dataset(&self) -> Result<Dataset, DataError> {
        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let solar = self.read_table(&conn, &self.solar_table)?;
        let wind = self.read_table(&conn, &self.wind_table)?;
        Ok(Dataset::new(solar, wind))
    }
}

#[async_trait]
impl EnergySource for SqliteSource {
    async fn load(&self) -> Result<Dataset, DataError> {
        if !self.path.exists() {
            return Err(DataError::NotFound(self.path.clone()));
        }

        let source = self.clone();
        tokio::task::spawn_blocking(move || source.read_dataset()).await?
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

fn text_value(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    }
}

/// Table names are spliced into SQL, so only plain identifiers pass
pub(crate) fn validate_table_name(name: &str) -> Result<(), DataError> {
    let valid = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DataError::Config(format!("invalid table name '{}'", name)))
    }
}
