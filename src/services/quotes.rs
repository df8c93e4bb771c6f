//! Daily-bar fetcher against the Yahoo Finance chart API.
//!
//! Symbols carry a market suffix: `.TW` for listed equities, `.TWO`
//! for the over-the-counter segment. The preferred suffix comes from
//! the metadata store; when it yields no data the alternate suffix is
//! tried before giving up.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::{debug, info};

use crate::constants::QUOTE_API_BASE;
use crate::error::{Error, Result};
use crate::models::{DailyBar, MarketType};
use crate::services::http::HttpFetcher;

pub struct QuoteClient {
    http: HttpFetcher,
}

impl QuoteClient {
    pub fn new() -> Result<Self> {
        Ok(Self { http: HttpFetcher::new()? })
    }

    /// Fetch cleaned daily bars for a ticker over a trailing calendar
    /// window ending now. The window deliberately over-fetches; the
    /// exchange calendar is not consulted.
    ///
    /// Fails with `DataUnavailable` when every suffix candidate returns
    /// no rows or nothing survives cleaning.
    pub async fn fetch_series(
        &self,
        code: &str,
        market: Option<MarketType>,
        lookback_days: i64,
    ) -> Result<Vec<DailyBar>> {
        let end = Utc::now();
        let start = end - Duration::days(lookback_days);

        for suffix in suffix_candidates(market) {
            let symbol = format!("{}{}", code, suffix);
            match self.fetch_symbol(&symbol, start, end).await {
                Ok(bars) if !bars.is_empty() => {
                    info!(symbol, bars = bars.len(), "Fetched daily bars");
                    return Ok(bars);
                }
                Ok(_) => {
                    debug!(symbol, "Provider returned no usable rows, trying next suffix");
                }
                Err(e) => {
                    debug!(symbol, error = %e, "Quote fetch failed, trying next suffix");
                }
            }
        }

        Err(Error::DataUnavailable(format!("no daily bars for {}", code)))
    }

    async fn fetch_symbol(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailyBar>> {
        let url = format!(
            "{}/{}?period1={}&period2={}&interval=1d",
            QUOTE_API_BASE,
            symbol,
            start.timestamp(),
            end.timestamp()
        );
        let response = self.http.get_json(&url).await?;
        parse_chart_response(&response)
    }
}

/// Suffixes to try, preferred market first. Unknown market defaults to
/// the listed suffix, matching the metadata-miss behavior upstream.
fn suffix_candidates(market: Option<MarketType>) -> [&'static str; 2] {
    match market {
        Some(MarketType::OverTheCounter) => [".TWO", ".TW"],
        _ => [".TW", ".TWO"],
    }
}

/// Parse a chart API response into cleaned bars, sorted by date.
///
/// The provider reports parallel arrays keyed by timestamp. A row is
/// kept only when all five OHLCV fields are present and numeric; a
/// single bad field drops the entire row.
pub fn parse_chart_response(response: &Value) -> Result<Vec<DailyBar>> {
    let result = response["chart"]["result"]
        .get(0)
        .ok_or_else(|| Error::Parse("chart response has no result".to_string()))?;

    let Some(timestamps) = result["timestamp"].as_array() else {
        // No timestamp array is the provider's "no data" shape.
        return Ok(Vec::new());
    };

    let quote = &result["indicators"]["quote"][0];
    let series = |key: &str| -> Result<&Vec<Value>> {
        quote[key]
            .as_array()
            .ok_or_else(|| Error::Parse(format!("chart response missing {} series", key)))
    };
    let opens = series("open")?;
    let highs = series("high")?;
    let lows = series("low")?;
    let closes = series("close")?;
    let volumes = series("volume")?;

    let length = timestamps.len();
    if [opens.len(), highs.len(), lows.len(), closes.len(), volumes.len()]
        .iter()
        .any(|&len| len != length)
    {
        return Err(Error::Parse("inconsistent series lengths in chart response".to_string()));
    }

    let mut bars = Vec::with_capacity(length);
    for i in 0..length {
        let Some(date) = timestamps[i]
            .as_i64()
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
            .map(|t| t.date_naive())
        else {
            continue;
        };

        let fields = (
            opens[i].as_f64(),
            highs[i].as_f64(),
            lows[i].as_f64(),
            closes[i].as_f64(),
            volumes[i].as_f64(),
        );
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = fields else {
            // Null or non-numeric field: the whole row goes.
            continue;
        };

        bars.push(DailyBar { date, open, high, low, close, volume: volume as u64 });
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(timestamps: Value, quote: Value) -> Value {
        json!({
            "chart": {
                "result": [{
                    "timestamp": timestamps,
                    "indicators": { "quote": [quote] }
                }],
                "error": null
            }
        })
    }

    // 2024-06-03 and 2024-06-04 midnight UTC.
    const T1: i64 = 1717372800;
    const T2: i64 = 1717459200;

    #[test]
    fn test_parse_valid_rows() {
        let resp = response(
            json!([T1, T2]),
            json!({
                "open": [100.0, 101.0],
                "high": [102.0, 103.0],
                "low": [99.0, 100.5],
                "close": [101.5, 102.5],
                "volume": [10000, 12000]
            }),
        );
        let bars = parse_chart_response(&resp).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date.to_string(), "2024-06-03");
        assert_eq!(bars[1].close, 102.5);
        assert_eq!(bars[1].volume, 12000);
    }

    #[test]
    fn test_parse_drops_row_with_null_field() {
        let resp = response(
            json!([T1, T2]),
            json!({
                "open": [100.0, 101.0],
                "high": [102.0, 103.0],
                "low": [99.0, null],
                "close": [101.5, 102.5],
                "volume": [10000, 12000]
            }),
        );
        let bars = parse_chart_response(&resp).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date.to_string(), "2024-06-03");
    }

    #[test]
    fn test_parse_drops_entire_row_on_non_numeric_volume() {
        let resp = response(
            json!([T1, T2]),
            json!({
                "open": [100.0, 101.0],
                "high": [102.0, 103.0],
                "low": [99.0, 100.5],
                "close": [101.5, 102.5],
                "volume": [10000, "n/a"]
            }),
        );
        let bars = parse_chart_response(&resp).unwrap();
        assert_eq!(bars.len(), 1);
        assert!(bars.iter().all(|b| b.date.to_string() != "2024-06-04"));
    }

    #[test]
    fn test_parse_no_data_shape_is_empty_not_error() {
        let resp = json!({
            "chart": { "result": [{ "meta": {} }], "error": null }
        });
        let bars = parse_chart_response(&resp).unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn test_parse_missing_result_is_error() {
        let resp = json!({ "chart": { "result": [], "error": null } });
        assert!(parse_chart_response(&resp).is_err());
    }

    #[test]
    fn test_parse_inconsistent_lengths_is_error() {
        let resp = response(
            json!([T1, T2]),
            json!({
                "open": [100.0],
                "high": [102.0, 103.0],
                "low": [99.0, 100.5],
                "close": [101.5, 102.5],
                "volume": [10000, 12000]
            }),
        );
        assert!(parse_chart_response(&resp).is_err());
    }

    #[test]
    fn test_parse_sorts_by_date() {
        let resp = response(
            json!([T2, T1]),
            json!({
                "open": [101.0, 100.0],
                "high": [103.0, 102.0],
                "low": [100.5, 99.0],
                "close": [102.5, 101.5],
                "volume": [12000, 10000]
            }),
        );
        let bars = parse_chart_response(&resp).unwrap();
        assert!(bars[0].date < bars[1].date);
    }

    #[test]
    fn test_suffix_candidates() {
        assert_eq!(suffix_candidates(Some(MarketType::OverTheCounter)), [".TWO", ".TW"]);
        assert_eq!(suffix_candidates(Some(MarketType::Listed)), [".TW", ".TWO"]);
        assert_eq!(suffix_candidates(None), [".TW", ".TWO"]);
    }
}
