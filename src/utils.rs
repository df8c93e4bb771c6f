use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;

/// Get the data directory from the environment or use the default.
/// Holds the signal input, archive, metadata and generated documents.
pub fn get_data_dir() -> PathBuf {
    std::env::var("TWMOMENTUM_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

/// Get the static web assets directory from the environment or default.
pub fn get_web_dir() -> PathBuf {
    std::env::var("TWMOMENTUM_WEB_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("web"))
}

pub fn signals_path(data_dir: &Path) -> PathBuf {
    data_dir.join("stocks_data.json")
}

pub fn archive_path(data_dir: &Path) -> PathBuf {
    data_dir.join("historical_data.json")
}

pub fn metadata_path(data_dir: &Path) -> PathBuf {
    data_dir.join("stock_metadata.json")
}

pub fn price_data_path(data_dir: &Path) -> PathBuf {
    data_dir.join("stock_price_data.json")
}

/// Serialize `value` as pretty-printed JSON and replace `path`
/// atomically: write a temp file in the same directory, then rename.
/// Readers never observe a partially written file.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut body = serde_json::to_string_pretty(value)?;
    body.push('\n');

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, body)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_json_atomic_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        write_json_atomic(&path, &serde_json::json!({"a": 1})).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("\"a\": 1"));
        assert!(!dir.path().join("out.json.tmp").exists());
    }

    #[test]
    fn test_write_json_atomic_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        write_json_atomic(&path, &serde_json::json!({"v": 1})).unwrap();
        write_json_atomic(&path, &serde_json::json!({"v": 2})).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("\"v\": 2"));
    }
}
