//! Plotly-compatible chart documents rendered server-side.
//!
//! The presentation layer consumes `{data, layout, config}` JSON and
//! hands it to Plotly unchanged, so trace shapes follow Plotly's
//! schema: a candlestick plus volume bars for the kline view, MACD and
//! RSI panels for the indicator view.

use serde_json::{json, Value};

use crate::models::indicators::IndicatorData;
use crate::models::PriceData;

const UP_COLOR: &str = "#ff6b6b";
const DOWN_COLOR: &str = "#4ecdc4";

/// Candlestick + volume document for one ticker.
pub fn kline_document(stock_id: &str, price: &PriceData) -> Value {
    let volume_colors: Vec<&str> = price
        .close
        .iter()
        .zip(&price.open)
        .map(|(close, open)| if close >= open { UP_COLOR } else { DOWN_COLOR })
        .collect();

    json!({
        "data": [
            {
                "type": "candlestick",
                "x": &price.dates,
                "open": &price.open,
                "high": &price.high,
                "low": &price.low,
                "close": &price.close,
                "name": "K線",
                "increasing": { "line": { "color": UP_COLOR } },
                "decreasing": { "line": { "color": DOWN_COLOR } },
                "xaxis": "x",
                "yaxis": "y"
            },
            {
                "type": "bar",
                "x": &price.dates,
                "y": &price.volume,
                "name": "成交量",
                "marker": { "color": volume_colors },
                "opacity": 0.7,
                "xaxis": "x",
                "yaxis": "y2"
            }
        ],
        "layout": {
            "title": format!("{} K線圖", stock_id),
            "template": "plotly_dark",
            "showlegend": false,
            "xaxis": { "rangeslider": { "visible": false } },
            "yaxis": { "title": "價格 (TWD)", "domain": [0.25, 1.0] },
            "yaxis2": { "title": "成交量", "domain": [0.0, 0.2] },
            "font": { "size": 12 },
            "margin": { "l": 50, "r": 50, "t": 50, "b": 50 }
        },
        "config": { "responsive": true }
    })
}

/// MACD/signal/histogram and RSI document for one ticker.
pub fn indicator_document(stock_id: &str, indicators: &IndicatorData) -> Value {
    json!({
        "data": [
            {
                "type": "scatter",
                "mode": "lines",
                "x": &indicators.dates,
                "y": &indicators.macd,
                "name": "MACD",
                "line": { "color": UP_COLOR, "width": 2 },
                "xaxis": "x",
                "yaxis": "y"
            },
            {
                "type": "scatter",
                "mode": "lines",
                "x": &indicators.dates,
                "y": &indicators.signal,
                "name": "Signal",
                "line": { "color": DOWN_COLOR, "width": 2 },
                "xaxis": "x",
                "yaxis": "y"
            },
            {
                "type": "bar",
                "x": &indicators.dates,
                "y": &indicators.histogram,
                "name": "Histogram",
                "marker": { "color": "gray" },
                "opacity": 0.5,
                "xaxis": "x",
                "yaxis": "y"
            },
            {
                "type": "scatter",
                "mode": "lines",
                "x": &indicators.dates,
                "y": &indicators.rsi,
                "name": "RSI",
                "line": { "color": "#ffa726", "width": 2 },
                "xaxis": "x",
                "yaxis": "y2"
            }
        ],
        "layout": {
            "title": format!("{} 技術指標", stock_id),
            "template": "plotly_dark",
            "showlegend": true,
            "yaxis": { "title": "MACD", "domain": [0.55, 1.0] },
            "yaxis2": { "title": "RSI", "domain": [0.0, 0.45], "range": [0, 100] },
            "font": { "size": 12 },
            "margin": { "l": 50, "r": 50, "t": 20, "b": 50 },
            "shapes": [
                hline(0.0, "y", "dash", "white", 0.5),
                hline(70.0, "y2", "dash", "red", 0.7),
                hline(30.0, "y2", "dash", "green", 0.7),
                hline(50.0, "y2", "solid", "white", 0.3)
            ]
        },
        "config": { "responsive": true }
    })
}

fn hline(y: f64, yref: &str, dash: &str, color: &str, opacity: f64) -> Value {
    json!({
        "type": "line",
        "xref": "paper", "x0": 0, "x1": 1,
        "yref": yref, "y0": y, "y1": y,
        "line": { "dash": dash, "color": color },
        "opacity": opacity
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price() -> PriceData {
        PriceData {
            dates: vec!["2024-06-03".into(), "2024-06-04".into()],
            open: vec![100.0, 103.0],
            high: vec![104.0, 105.0],
            low: vec![99.0, 101.0],
            close: vec![103.0, 102.0],
            volume: vec![10_000, 12_000],
        }
    }

    fn indicators() -> IndicatorData {
        IndicatorData {
            dates: vec!["2024-06-03".into(), "2024-06-04".into()],
            macd: vec![0.0, 0.1234],
            signal: vec![0.0, 0.0617],
            histogram: vec![0.0, 0.0617],
            rsi: vec![50.0, 100.0],
        }
    }

    #[test]
    fn test_kline_document_shape() {
        let doc = kline_document("2330", &price());
        assert_eq!(doc["data"].as_array().unwrap().len(), 2);
        assert_eq!(doc["data"][0]["type"], "candlestick");
        assert_eq!(doc["data"][1]["type"], "bar");
        assert_eq!(doc["config"]["responsive"], true);
        assert_eq!(doc["layout"]["title"], "2330 K線圖");
    }

    #[test]
    fn test_kline_volume_colors_follow_candle_direction() {
        let doc = kline_document("2330", &price());
        let colors = doc["data"][1]["marker"]["color"].as_array().unwrap();
        assert_eq!(colors[0], UP_COLOR);   // close 103 >= open 100
        assert_eq!(colors[1], DOWN_COLOR); // close 102 < open 103
    }

    #[test]
    fn test_indicator_document_shape() {
        let doc = indicator_document("2330", &indicators());
        let traces = doc["data"].as_array().unwrap();
        assert_eq!(traces.len(), 4);
        assert_eq!(traces[3]["name"], "RSI");
        assert_eq!(traces[3]["yaxis"], "y2");
        assert_eq!(doc["layout"]["yaxis2"]["range"], json!([0, 100]));
        assert_eq!(doc["layout"]["shapes"].as_array().unwrap().len(), 4);
    }
}
