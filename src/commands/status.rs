use crate::services::{HistoricalArchive, MetadataStore};
use crate::utils::{archive_path, get_data_dir, metadata_path, price_data_path};

/// Print a summary of the archive, metadata and generated documents.
pub fn run() {
    let data_dir = get_data_dir();
    println!("📂 Data directory: {}", data_dir.display());

    match HistoricalArchive::new(archive_path(&data_dir)).load() {
        Ok(data) if data.dates.is_empty() => println!("📦 Archive: empty"),
        Ok(data) => {
            let latest = data.dates.keys().next_back().cloned().unwrap_or_default();
            let latest_count = data.dates.get(&latest).map(|d| d.len()).unwrap_or(0);
            println!("📦 Archive: {} dates, {} tickers total", data.dates.len(), data.all_tickers().len());
            println!("   Latest date: {} ({} tickers)", latest, latest_count);
        }
        Err(e) => println!("📦 Archive: unreadable ({})", e),
    }

    match MetadataStore::new(metadata_path(&data_dir)).load() {
        Ok(mapping) if mapping.is_empty() => println!("🗂️  Metadata: empty"),
        Ok(mapping) => println!("🗂️  Metadata: {} tickers", mapping.len()),
        Err(e) => println!("🗂️  Metadata: unreadable ({})", e),
    }

    let price_file = price_data_path(&data_dir);
    if price_file.exists() {
        match std::fs::metadata(&price_file) {
            Ok(meta) => println!("📈 Price documents: {} ({:.1} KB)", price_file.display(), meta.len() as f64 / 1024.0),
            Err(_) => println!("📈 Price documents: {}", price_file.display()),
        }
    } else {
        println!("📈 Price documents: not generated yet");
    }
}
