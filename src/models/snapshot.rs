use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::bar::PriceData;
use crate::models::indicators::IndicatorData;

/// Momentum result for one ticker on one date. The score and day-count
/// are produced upstream and archived verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumSnapshot {
    pub stock_name: String,
    pub momentum: f64,
    pub days: i64,
}

/// Daily-signal input produced upstream (`stocks_data.json`).
/// Unknown per-stock fields are dropped on read.
#[derive(Debug, Clone, Deserialize)]
pub struct DailySignals {
    pub last_update: Option<String>,
    #[serde(default)]
    pub stocks: BTreeMap<String, MomentumSnapshot>,
}

/// The append-only historical archive (`historical_data.json`).
///
/// Date keys are never removed; a write replaces at most the
/// sub-mapping for the date being archived. BTreeMaps keep the
/// persisted JSON ordered and diff-friendly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchiveData {
    pub dates: BTreeMap<String, BTreeMap<String, MomentumSnapshot>>,
}

impl ArchiveData {
    /// All tickers that appear on any archived date.
    pub fn all_tickers(&self) -> Vec<String> {
        let mut seen = std::collections::BTreeSet::new();
        for day in self.dates.values() {
            seen.extend(day.keys().cloned());
        }
        seen.into_iter().collect()
    }

    /// Display name for a ticker, from the earliest date that knows it.
    pub fn stock_name(&self, code: &str) -> Option<String> {
        self.dates
            .values()
            .find_map(|day| day.get(code).map(|s| s.stock_name.clone()))
    }
}

/// Per-ticker price/indicator document (`stock_price_data.json` values).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockDocument {
    pub name: String,
    pub price_data: PriceData,
    pub indicators: IndicatorData,
}
