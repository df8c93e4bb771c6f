use crate::server;
use crate::services::{HistoricalArchive, MetadataStore};
use crate::utils::{archive_path, get_data_dir, metadata_path};

/// Start the HTTP API with chart-rendering endpoints.
pub fn run(port: u16) {
    let data_dir = get_data_dir();
    println!("🚀 Starting twmomentum server on port {}", port);
    println!("📂 Data directory: {}", data_dir.display());

    let archive = HistoricalArchive::new(archive_path(&data_dir));
    let metadata_store = MetadataStore::new(metadata_path(&data_dir));

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to create runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(server::serve(archive, &metadata_store, port)) {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
