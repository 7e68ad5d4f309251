//! Snapshot of the feed response stored as a JSON file

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use wv_core::Dataset;

use crate::config::NullConfig;
use crate::decode::RecordDecoder;
use crate::DataError;
use super::EnergySource;

/// Reads `{"solar": [...], "wind": [...]}` from disk
pub struct JsonFeedSource {
    path: PathBuf,
    name: String,
    decoder: RecordDecoder,
}

impl JsonFeedSource {
    pub fn new<P: AsRef<Path>>(path: P, null_config: NullConfig) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("feed.json")
            .to_string();

        Self {
            path,
            name,
            decoder: RecordDecoder::new(null_config),
        }
    }

    /// Decode a feed body already in memory
    pub fn parse(&self, body: &[u8]) -> Result<Dataset, DataError> {
        let value: Value = serde_json::from_slice(body)?;
        self.decoder.decode_feed(&value)
    }
}

#[async_trait]
impl EnergySource for JsonFeedSource {
    async fn load(&self) -> Result<Dataset, DataError> {
        let body = match tokio::fs::read(&self.path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DataError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        debug!(path = %self.path.display(), bytes = body.len(), "read feed snapshot");
        self.parse(&body)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"solar": [{{"full_date": "2024-01-01 00:00:00", "total_hourly_real": 1.5, "expected_best": 2, "expected_worst": 1}}],
                "wind": [{{"tarih": "2024-01-01 00:00:00", "total_hourly_real": 7}}, {{}}]}}"#
        )
        .unwrap();

        let source = JsonFeedSource::new(file.path(), NullConfig::default());
        let dataset = source.load().await.unwrap();

        assert_eq!(dataset.solar.len(), 1);
        assert_eq!(dataset.wind.len(), 2);
        assert_eq!(dataset.wind[0].actual_output, 7.0);
        assert_eq!(dataset.wind[1], wv_core::TimePoint::default());
        assert!(source.source_name().ends_with(".json"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFeedSource::new(dir.path().join("absent.json"), NullConfig::default());
        assert!(matches!(source.load().await, Err(DataError::NotFound(_))));
        assert_eq!(source.source_name(), "absent.json");
    }

    #[test]
    fn test_invalid_json() {
        let source = JsonFeedSource::new("feed.json", NullConfig::default());
        assert!(matches!(source.parse(b"{not json"), Err(DataError::Json(_))));
    }
}
