//! Append-only historical archive of per-ticker momentum snapshots.
//!
//! The archive is one JSON document indexed by date. Writes are a
//! whole-file read-modify-write: load, replace the sub-mapping for the
//! date being archived, persist atomically. Existing dates are never
//! removed; re-running a date fully replaces that date's entries and
//! leaves every other date untouched. At most one archival process may
//! run at a time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::models::{ArchiveData, MomentumSnapshot};
use crate::utils::write_json_atomic;

pub struct HistoricalArchive {
    path: PathBuf,
}

impl HistoricalArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the archive, or an empty one when the file does not exist.
    /// A file that exists but does not match the schema is malformed.
    pub fn load(&self) -> Result<ArchiveData> {
        if !self.path.exists() {
            return Ok(ArchiveData::default());
        }
        let body = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&body)
            .map_err(|e| Error::MalformedRecord(format!("{}: {}", self.path.display(), e)))
    }

    /// Set the snapshots for `date`, replacing that date's sub-mapping
    /// if it already exists, and persist the whole archive back.
    pub fn append_snapshot(
        &self,
        date: Option<&str>,
        snapshots: &BTreeMap<String, MomentumSnapshot>,
    ) -> Result<()> {
        let date = match date {
            Some(d) if !d.is_empty() => d,
            _ => {
                return Err(Error::MissingDate(
                    "daily signals carry no last_update date".to_string(),
                ))
            }
        };

        let mut archive = self.load()?;
        archive.dates.insert(date.to_string(), snapshots.clone());
        write_json_atomic(&self.path, &archive)?;

        info!(date, tickers = snapshots.len(), path = %self.path.display(), "Archived momentum snapshots");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn snapshot(name: &str, momentum: f64) -> MomentumSnapshot {
        MomentumSnapshot { stock_name: name.to_string(), momentum, days: 2 }
    }

    fn snapshots(entries: &[(&str, f64)]) -> BTreeMap<String, MomentumSnapshot> {
        entries
            .iter()
            .map(|(code, m)| (code.to_string(), snapshot("測試", *m)))
            .collect()
    }

    #[test]
    fn test_append_creates_archive() {
        let dir = TempDir::new().unwrap();
        let archive = HistoricalArchive::new(dir.path().join("historical_data.json"));

        archive.append_snapshot(Some("2024-06-03"), &snapshots(&[("2330", 1.0)])).unwrap();

        let data = archive.load().unwrap();
        assert_eq!(data.dates.len(), 1);
        assert_eq!(data.dates["2024-06-03"]["2330"].momentum, 1.0);
    }

    #[test]
    fn test_append_is_idempotent_per_date() {
        let dir = TempDir::new().unwrap();
        let archive = HistoricalArchive::new(dir.path().join("historical_data.json"));
        let snaps = snapshots(&[("2330", 1.0), ("2603", -0.5)]);

        archive.append_snapshot(Some("2024-06-03"), &snaps).unwrap();
        let once = archive.load().unwrap();
        archive.append_snapshot(Some("2024-06-03"), &snaps).unwrap();
        let twice = archive.load().unwrap();

        assert_eq!(
            serde_json::to_value(&once.dates).unwrap(),
            serde_json::to_value(&twice.dates).unwrap()
        );
    }

    #[test]
    fn test_rerun_replaces_only_current_date() {
        let dir = TempDir::new().unwrap();
        let archive = HistoricalArchive::new(dir.path().join("historical_data.json"));

        archive.append_snapshot(Some("2024-06-03"), &snapshots(&[("2330", 1.0)])).unwrap();
        archive.append_snapshot(Some("2024-06-04"), &snapshots(&[("2330", 2.0), ("2603", 0.3)])).unwrap();
        // Re-run for 06-04 drops 2603 from that date only.
        archive.append_snapshot(Some("2024-06-04"), &snapshots(&[("2330", 2.5)])).unwrap();

        let data = archive.load().unwrap();
        assert_eq!(data.dates["2024-06-03"]["2330"].momentum, 1.0);
        assert_eq!(data.dates["2024-06-04"]["2330"].momentum, 2.5);
        assert!(!data.dates["2024-06-04"].contains_key("2603"));
        assert_eq!(data.dates.len(), 2);
    }

    #[test]
    fn test_missing_date_is_rejected() {
        let dir = TempDir::new().unwrap();
        let archive = HistoricalArchive::new(dir.path().join("historical_data.json"));

        let err = archive.append_snapshot(None, &snapshots(&[("2330", 1.0)])).unwrap_err();
        assert!(matches!(err, Error::MissingDate(_)));
        let err = archive.append_snapshot(Some(""), &snapshots(&[])).unwrap_err();
        assert!(matches!(err, Error::MissingDate(_)));
        assert!(!archive.path().exists());
    }

    #[test]
    fn test_malformed_archive_fails_fast() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("historical_data.json");
        std::fs::write(&path, "{\"dates\": [1, 2]}").unwrap();

        let archive = HistoricalArchive::new(path);
        assert!(matches!(archive.load().unwrap_err(), Error::MalformedRecord(_)));
    }
}
