use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One cleaned daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Column-oriented price data as served to the presentation layer.
/// OHLC rounded to 2 decimal places, volume to integers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceData {
    pub dates: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<u64>,
}

impl PriceData {
    /// Build from the trailing `window` bars of a cleaned series.
    pub fn from_bars(bars: &[DailyBar], window: usize) -> Self {
        let start = bars.len().saturating_sub(window);
        let tail = &bars[start..];
        Self {
            dates: tail.iter().map(|b| b.date.format("%Y-%m-%d").to_string()).collect(),
            open: tail.iter().map(|b| round2(b.open)).collect(),
            high: tail.iter().map(|b| round2(b.high)).collect(),
            low: tail.iter().map(|b| round2(b.low)).collect(),
            close: tail.iter().map(|b| round2(b.close)).collect(),
            volume: tail.iter().map(|b| b.volume).collect(),
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> DailyBar {
        DailyBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn test_price_data_truncates_to_window() {
        let bars: Vec<DailyBar> = (1..=10).map(|d| bar(d, 100.0 + d as f64)).collect();
        let data = PriceData::from_bars(&bars, 3);
        assert_eq!(data.dates, vec!["2024-01-08", "2024-01-09", "2024-01-10"]);
        assert_eq!(data.close, vec![108.0, 109.0, 110.0]);
    }

    #[test]
    fn test_price_data_shorter_than_window() {
        let bars = vec![bar(1, 50.0)];
        let data = PriceData::from_bars(&bars, 90);
        assert_eq!(data.dates.len(), 1);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round2(12.3456), 12.35);
        assert_eq!(round4(0.123456), 0.1235);
    }
}
