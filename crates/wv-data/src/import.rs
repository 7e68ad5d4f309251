//! Building the statistics database from raw exports
//!
//! Creates the tables `SqliteSource` reads and fills them from the JSON
//! record lists the scraper writes.

use std::path::Path;
use rusqlite::{params, Connection};
use serde_json::Value;
use tracing::info;
use wv_core::TimePoint;

use crate::decode::RecordDecoder;
use crate::sources::sqlite_source::validate_table_name;
use crate::DataError;

/// Create both statistics tables and their time indexes if missing
pub fn setup_database(conn: &Connection, solar_table: &str, wind_table: &str) -> Result<(), DataError> {
    for table in [solar_table, wind_table] {
        validate_table_name(table)?;
        conn.execute_batch(&format!(
            "
            CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                full_date TEXT,
                expected_best REAL,
                expected_worst REAL,
                total_hourly_real REAL
            );
            CREATE INDEX IF NOT EXISTS idx_{table}_time ON {table} (full_date);
            "
        ))?;
    }
    Ok(())
}

/// Replace the contents of `table` with `records`, in order.
///
/// Returns the number of rows written.
pub fn import_records(conn: &mut Connection, table: &str, records: &[TimePoint]) -> Result<usize, DataError> {
    validate_table_name(table)?;

    let tx = conn.transaction()?;
    tx.execute(&format!("DELETE FROM {}", table), [])?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {} (full_date, expected_best, expected_worst, total_hourly_real)
             VALUES (?1, ?2, ?3, ?4)",
            table
        ))?;
        for record in records {
            stmt.execute(params![
                record.timestamp,
                record.forecast_best,
                record.forecast_worst,
                record.actual_output,
            ])?;
        }
    }
    tx.commit()?;

    Ok(records.len())
}

/// Import one raw export file (a JSON list of records) into `table` of the
/// database at `db_path`, creating the schema first.
pub fn import_export_file(
    db_path: &Path,
    export_path: &Path,
    table: &str,
    solar_table: &str,
    wind_table: &str,
    decoder: &RecordDecoder,
) -> Result<usize, DataError> {
    let body = std::fs::read(export_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataError::NotFound(export_path.to_path_buf()),
        _ => DataError::Io(e),
    })?;
    let value: Value = serde_json::from_slice(&body)?;
    if !value.is_array() {
        return Err(DataError::InvalidExport(format!(
            "root of {} must be a list",
            export_path.display()
        )));
    }
    let records = decoder.decode_series(&value);

    let mut conn = Connection::open(db_path)?;
    setup_database(&conn, solar_table, wind_table)?;
    let rows = import_records(&mut conn, table, &records)?;

    info!(
        export = %export_path.display(),
        table,
        rows,
        "imported export file"
    );
    Ok(rows)
}
