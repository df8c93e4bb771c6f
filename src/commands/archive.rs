use crate::error::Error;
use crate::models::DailySignals;
use crate::services::{HistoricalArchive, MetadataStore, RegistryClient};
use crate::utils::{archive_path, get_data_dir, metadata_path, signals_path};

/// Archive today's momentum signals and refresh ticker metadata.
pub fn run() {
    let data_dir = get_data_dir();
    println!("📂 Data directory: {}", data_dir.display());

    // Step 1: Append the daily signals to the historical archive.
    let signals_file = signals_path(&data_dir);
    if signals_file.exists() {
        let archive = HistoricalArchive::new(archive_path(&data_dir));
        match read_signals(&signals_file) {
            Ok(signals) => {
                match archive.append_snapshot(signals.last_update.as_deref(), &signals.stocks) {
                    Ok(_) => {
                        println!(
                            "✅ Archived {} tickers for {}",
                            signals.stocks.len(),
                            signals.last_update.as_deref().unwrap_or("?")
                        );
                    }
                    Err(Error::MissingDate(_)) => {
                        eprintln!("❌ Error: 'last_update' not found in daily data");
                        std::process::exit(1);
                    }
                    Err(e) => {
                        eprintln!("❌ Archive write failed: {}", e);
                        std::process::exit(1);
                    }
                }
            }
            Err(e) => {
                eprintln!("❌ Cannot read daily signals: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("⏭️  No daily signals at {}, skipping archive step", signals_file.display());
    }

    // Step 2: Refresh ticker metadata. Registry failure yields an empty
    // set and the refresh keeps the previously persisted mapping.
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to create runtime: {}", e);
            std::process::exit(1);
        }
    };
    let tickers = runtime.block_on(async {
        match RegistryClient::new() {
            Ok(client) => client.fetch_all_tickers().await,
            Err(e) => {
                eprintln!("⚠️  Registry client unavailable: {}", e);
                Vec::new()
            }
        }
    });

    let store = MetadataStore::new(metadata_path(&data_dir));
    match store.refresh(&tickers) {
        Ok(_) if tickers.is_empty() => {
            println!("⚠️  No tickers fetched, metadata left untouched");
        }
        Ok(_) => println!("✅ Saved metadata for {} tickers", tickers.len()),
        Err(e) => eprintln!("⚠️  Metadata refresh failed (previous mapping kept): {}", e),
    }
}

fn read_signals(path: &std::path::Path) -> crate::error::Result<DailySignals> {
    let body = std::fs::read_to_string(path)?;
    serde_json::from_str(&body).map_err(|e| Error::MalformedRecord(format!("{}: {}", path.display(), e)))
}
