//! MACD and RSI computation over a close-price series.
//!
//! Smoothing follows the non-adjusted EMA recursion: the first value
//! seeds the series directly (`ema[0] = x[0]`), every later value is
//! `ema[i] = alpha * x[i] + (1 - alpha) * ema[i-1]` with
//! `alpha = 2 / (span + 1)`. Internal chaining keeps full precision;
//! rounding happens only when building the serialized document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{MACD_FAST_SPAN, MACD_SIGNAL_SPAN, MACD_SLOW_SPAN, RSI_PERIOD};
use crate::models::bar::{round2, round4};
use crate::models::DailyBar;

/// Indicator values aligned index-for-index with the input closes.
#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
    /// Bounded to [0, 100]; 50 while fewer than 14 prior deltas exist.
    pub rsi: Vec<f64>,
}

/// Compute MACD(12/26/9) and RSI(14) for a close-price series.
/// Output vectors always match the input length.
pub fn compute(closes: &[f64]) -> IndicatorSeries {
    let fast = ema(closes, MACD_FAST_SPAN);
    let slow = ema(closes, MACD_SLOW_SPAN);

    let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = ema(&macd, MACD_SIGNAL_SPAN);
    let histogram: Vec<f64> = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();
    let rsi = rsi(closes, RSI_PERIOD);

    IndicatorSeries { macd, signal, histogram, rsi }
}

/// Non-adjusted exponential moving average.
fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev = values[0];
    out.push(prev);
    for &value in &values[1..] {
        prev = alpha * value + (1.0 - alpha) * prev;
        out.push(prev);
    }
    out
}

/// RSI over a trailing simple moving average of gains and losses.
///
/// Positions with insufficient history report the neutral 50. A window
/// with zero average loss reports 100 rather than dividing by zero;
/// this covers both all-gain windows and flat (zero-delta) windows.
fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![50.0; closes.len()];
    if closes.len() < 2 {
        return out;
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for pair in closes.windows(2) {
        let delta = pair[1] - pair[0];
        gains.push(if delta > 0.0 { delta } else { 0.0 });
        losses.push(if delta < 0.0 { -delta } else { 0.0 });
    }

    // Index i of the price series sees deltas [i - period, i - 1].
    for i in period..closes.len() {
        let window = (i - period)..i;
        let avg_gain: f64 = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss: f64 = losses[window].iter().sum::<f64>() / period as f64;

        out[i] = if avg_loss == 0.0 {
            100.0
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - 100.0 / (1.0 + rs)
        };
    }
    out
}

/// Column-oriented indicator data as serialized for the presentation
/// layer: trailing window, MACD family at 4 decimals, RSI at 2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorData {
    pub dates: Vec<String>,
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
    pub rsi: Vec<f64>,
}

impl IndicatorData {
    /// Round and truncate a full-precision series to the serving window.
    /// `dates` must be the bar dates the series was computed from.
    pub fn from_series(dates: &[NaiveDate], series: &IndicatorSeries, window: usize) -> Self {
        let start = dates.len().saturating_sub(window);
        let finite4 = |v: &f64| round4(if v.is_finite() { *v } else { 0.0 });
        let finite2 = |v: &f64| round2(if v.is_finite() { *v } else { 50.0 });
        Self {
            dates: dates[start..]
                .iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect(),
            macd: series.macd[start..].iter().map(finite4).collect(),
            signal: series.signal[start..].iter().map(finite4).collect(),
            histogram: series.histogram[start..].iter().map(finite4).collect(),
            rsi: series.rsi[start..].iter().map(finite2).collect(),
        }
    }
}

/// Convenience for the generate/serve paths: compute from cleaned bars.
pub fn compute_for_bars(bars: &[DailyBar]) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    compute(&closes)
}
