//! Per-ticker price/indicator document generation.
//!
//! Collects the ticker universe from the historical archive, fetches
//! and cleans each ticker's daily bars, computes MACD/RSI over the
//! full cleaned series (indicators need warm-up history older than the
//! display window) and truncates everything to the trailing serving
//! window. Tickers are processed one at a time; a failed ticker is
//! logged and skipped, never aborting the batch.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::constants::{LOOKBACK_CALENDAR_DAYS, SERVING_WINDOW_DAYS};
use crate::models::indicators::{self, IndicatorData};
use crate::models::{ArchiveData, DailyBar, MarketType, PriceData, StockDocument};
use crate::services::quotes::QuoteClient;

/// Build the serialized document for one ticker from its cleaned bars.
pub fn build_document(name: &str, bars: &[DailyBar]) -> StockDocument {
    let dates: Vec<chrono::NaiveDate> = bars.iter().map(|b| b.date).collect();
    let series = indicators::compute_for_bars(bars);

    StockDocument {
        name: name.to_string(),
        price_data: PriceData::from_bars(bars, SERVING_WINDOW_DAYS),
        indicators: IndicatorData::from_series(&dates, &series, SERVING_WINDOW_DAYS),
    }
}

/// Generate documents for every ticker the archive knows about.
pub async fn generate_documents(
    quotes: &QuoteClient,
    archive: &ArchiveData,
    metadata: &BTreeMap<String, MarketType>,
) -> BTreeMap<String, StockDocument> {
    let tickers = archive.all_tickers();
    info!(tickers = tickers.len(), "Generating price/indicator documents");

    let mut documents = BTreeMap::new();
    for (idx, code) in tickers.iter().enumerate() {
        let market = metadata.get(code).copied();
        match quotes.fetch_series(code, market, LOOKBACK_CALENDAR_DAYS).await {
            Ok(bars) => {
                let name = archive
                    .stock_name(code)
                    .unwrap_or_else(|| format!("股票{}", code));
                documents.insert(code.clone(), build_document(&name, &bars));
                info!(code, fetched = idx + 1, total = tickers.len(), "Generated document");
            }
            Err(e) => {
                warn!(code, error = %e, "Skipping ticker");
            }
        }
    }

    info!(generated = documents.len(), skipped = tickers.len() - documents.len(), "Generation finished");
    documents
}
