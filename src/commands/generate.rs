use crate::services::{generator, HistoricalArchive, MetadataStore, QuoteClient};
use crate::utils::{archive_path, get_data_dir, metadata_path, price_data_path, write_json_atomic};

/// Fetch price history for every archived ticker and write the
/// per-ticker price/indicator document.
pub fn run() {
    let data_dir = get_data_dir();
    println!("📂 Data directory: {}", data_dir.display());

    let archive = match HistoricalArchive::new(archive_path(&data_dir)).load() {
        Ok(data) if !data.dates.is_empty() => data,
        Ok(_) => {
            eprintln!("❌ Historical archive is empty, run `twmomentum archive` first");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("❌ Cannot load historical archive: {}", e);
            std::process::exit(1);
        }
    };

    let metadata = MetadataStore::new(metadata_path(&data_dir))
        .load()
        .unwrap_or_else(|e| {
            eprintln!("⚠️  Cannot load metadata ({}), defaulting to listed market", e);
            Default::default()
        });

    println!("🔍 Found {} tickers across {} dates", archive.all_tickers().len(), archive.dates.len());

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to create runtime: {}", e);
            std::process::exit(1);
        }
    };

    let documents = runtime.block_on(async {
        let quotes = match QuoteClient::new() {
            Ok(client) => client,
            Err(e) => {
                eprintln!("❌ Quote client unavailable: {}", e);
                std::process::exit(1);
            }
        };
        generator::generate_documents(&quotes, &archive, &metadata).await
    });

    if documents.is_empty() {
        eprintln!("❌ No ticker produced usable data, nothing written");
        std::process::exit(1);
    }

    let out_path = price_data_path(&data_dir);
    match write_json_atomic(&out_path, &documents) {
        Ok(_) => {
            println!("✅ Generated documents for {} tickers", documents.len());
            println!("📁 Saved to {}", out_path.display());
        }
        Err(e) => {
            eprintln!("❌ Failed to write {}: {}", out_path.display(), e);
            std::process::exit(1);
        }
    }
}
