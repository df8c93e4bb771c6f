//! Ticker-to-market mapping persisted between pipeline runs.
//!
//! The quote fetcher needs the market classification to pick the right
//! provider symbol suffix, so a failed registry fetch must never wipe
//! the previously persisted mapping: refreshing with an empty ticker
//! set is a no-op.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::{MarketType, Ticker};
use crate::utils::write_json_atomic;

pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted mapping; empty when no file exists yet.
    pub fn load(&self) -> Result<BTreeMap<String, MarketType>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let body = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&body)
            .map_err(|e| Error::MalformedRecord(format!("{}: {}", self.path.display(), e)))
    }

    /// Overwrite the mapping from a freshly fetched ticker universe.
    /// Keeps stale data when `tickers` is empty.
    pub fn refresh(&self, tickers: &[Ticker]) -> Result<()> {
        if tickers.is_empty() {
            warn!(path = %self.path.display(), "No tickers fetched, keeping existing metadata");
            return Ok(());
        }

        let mapping: BTreeMap<&str, MarketType> =
            tickers.iter().map(|t| (t.code.as_str(), t.market)).collect();
        write_json_atomic(&self.path, &mapping)?;

        info!(path = %self.path.display(), tickers = mapping.len(), "Refreshed stock metadata");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ticker(code: &str, market: MarketType) -> Ticker {
        Ticker { code: code.to_string(), name: format!("股票{}", code), market }
    }

    #[test]
    fn test_refresh_and_load() {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(dir.path().join("stock_metadata.json"));

        store
            .refresh(&[
                ticker("2330", MarketType::Listed),
                ticker("5274", MarketType::OverTheCounter),
            ])
            .unwrap();

        let mapping = store.load().unwrap();
        assert_eq!(mapping["2330"], MarketType::Listed);
        assert_eq!(mapping["5274"], MarketType::OverTheCounter);
    }

    #[test]
    fn test_refresh_persists_registry_labels() {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(dir.path().join("stock_metadata.json"));
        store.refresh(&[ticker("5274", MarketType::OverTheCounter)]).unwrap();

        let body = std::fs::read_to_string(store.path()).unwrap();
        assert!(body.contains("上櫃"));
    }

    #[test]
    fn test_empty_refresh_keeps_stale_mapping() {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(dir.path().join("stock_metadata.json"));

        store.refresh(&[ticker("2330", MarketType::Listed)]).unwrap();
        store.refresh(&[]).unwrap();

        let mapping = store.load().unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping["2330"], MarketType::Listed);
    }

    #[test]
    fn test_full_replace_not_merge() {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(dir.path().join("stock_metadata.json"));

        store.refresh(&[ticker("2330", MarketType::Listed)]).unwrap();
        store.refresh(&[ticker("5274", MarketType::OverTheCounter)]).unwrap();

        let mapping = store.load().unwrap();
        assert!(!mapping.contains_key("2330"));
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(dir.path().join("stock_metadata.json"));
        assert!(store.load().unwrap().is_empty());
    }
}
