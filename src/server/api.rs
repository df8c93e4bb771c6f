//! HTTP handlers over the archive, metadata and quote fetcher.
//!
//! Internal failures never leak as bare 500 pages: every error maps to
//! a JSON body `{"error": message}` with 404 for missing/empty data
//! and 500 for everything else.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::constants::{INDICATOR_LOOKBACK_DAYS, LOOKBACK_CALENDAR_DAYS, SERVING_WINDOW_DAYS};
use crate::error::Error;
use crate::models::indicators::{self, IndicatorData};
use crate::models::PriceData;
use crate::server::{charts, AppState};

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// GET /api/data - the raw historical archive.
#[instrument(skip(state))]
pub async fn get_archive_handler(State(state): State<AppState>) -> Response {
    match state.archive.load() {
        Ok(data) if data.dates.is_empty() => {
            error_response(StatusCode::NOT_FOUND, "historical_data.json not found")
        }
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to load archive");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /api/kline/{stock_id} - candlestick + volume chart document.
#[instrument(skip(state))]
pub async fn get_kline_handler(
    State(state): State<AppState>,
    Path(stock_id): Path<String>,
) -> Response {
    let market = state.metadata.get(&stock_id).copied();
    match state.quotes.fetch_series(&stock_id, market, LOOKBACK_CALENDAR_DAYS).await {
        Ok(bars) => {
            let price = PriceData::from_bars(&bars, SERVING_WINDOW_DAYS);
            info!(stock_id, bars = price.dates.len(), "Rendering kline chart");
            Json(charts::kline_document(&stock_id, &price)).into_response()
        }
        Err(Error::DataUnavailable(_)) => {
            warn!(stock_id, "No data found for stock");
            error_response(StatusCode::NOT_FOUND, "No data found for stock")
        }
        Err(e) => {
            error!(stock_id, error = %e, "Kline chart failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /api/indicators/{stock_id} - MACD/RSI chart document.
///
/// Uses the extended lookback so the EMA/RSI warm-up happens on data
/// older than what is displayed.
#[instrument(skip(state))]
pub async fn get_indicators_handler(
    State(state): State<AppState>,
    Path(stock_id): Path<String>,
) -> Response {
    let market = state.metadata.get(&stock_id).copied();
    match state.quotes.fetch_series(&stock_id, market, INDICATOR_LOOKBACK_DAYS).await {
        Ok(bars) => {
            let dates: Vec<chrono::NaiveDate> = bars.iter().map(|b| b.date).collect();
            let series = indicators::compute_for_bars(&bars);
            let data = IndicatorData::from_series(&dates, &series, dates.len());
            info!(stock_id, points = data.dates.len(), "Rendering indicator chart");
            Json(charts::indicator_document(&stock_id, &data)).into_response()
        }
        Err(Error::DataUnavailable(_)) => {
            warn!(stock_id, "No data found for stock");
            error_response(StatusCode::NOT_FOUND, "No data found for stock")
        }
        Err(e) => {
            error!(stock_id, error = %e, "Indicator chart failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /health
pub async fn health_handler() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}
