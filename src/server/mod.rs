pub mod api;
pub mod charts;

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::error::Result;
use crate::models::MarketType;
use crate::services::{HistoricalArchive, MetadataStore, QuoteClient};
use crate::utils::get_web_dir;

/// Application state shared across all handlers. The metadata mapping
/// is a snapshot loaded at startup and injected, not a process global.
#[derive(Clone)]
pub struct AppState {
    pub archive: Arc<HistoricalArchive>,
    pub metadata: Arc<BTreeMap<String, MarketType>>,
    pub quotes: Arc<QuoteClient>,
}

/// Start the axum server.
pub async fn serve(
    archive: HistoricalArchive,
    metadata_store: &MetadataStore,
    port: u16,
) -> Result<()> {
    let metadata = metadata_store.load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load metadata, serving with defaults");
        BTreeMap::new()
    });
    tracing::info!(tickers = metadata.len(), "Loaded metadata snapshot");

    let app_state = AppState {
        archive: Arc::new(archive),
        metadata: Arc::new(metadata),
        quotes: Arc::new(QuoteClient::new()?),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let web_dir = get_web_dir();
    tracing::info!("Registering routes:");
    tracing::info!("  GET /api/data");
    tracing::info!("  GET /api/kline/{{stock_id}}");
    tracing::info!("  GET /api/indicators/{{stock_id}}");
    tracing::info!("  GET /health");
    tracing::info!("  GET /* (static files from {})", web_dir.display());

    let app = Router::new()
        .route("/api/data", get(api::get_archive_handler))
        .route("/api/kline/:stock_id", get(api::get_kline_handler))
        .route("/api/indicators/:stock_id", get(api::get_indicators_handler))
        .route("/health", get(api::health_handler))
        .fallback_service(ServeDir::new(web_dir))
        .layer(cors)
        .with_state(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| crate::error::Error::Io(e.to_string()))?;

    Ok(())
}
