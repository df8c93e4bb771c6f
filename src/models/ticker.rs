use serde::{Deserialize, Serialize};

/// Market segment a security trades on.
///
/// Serialized with the registry's own labels so `stock_metadata.json`
/// stays readable next to the upstream data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketType {
    #[serde(rename = "上市")]
    Listed,
    #[serde(rename = "上櫃")]
    OverTheCounter,
}

impl MarketType {
    /// Quote-provider symbol suffix for this market.
    pub fn symbol_suffix(self) -> &'static str {
        match self {
            MarketType::Listed => ".TW",
            MarketType::OverTheCounter => ".TWO",
        }
    }

    /// Parse the registry's market column. Unknown labels are rejected
    /// so schema drift surfaces as a dropped row, not bad metadata.
    pub fn from_registry_label(label: &str) -> Option<Self> {
        match label.trim() {
            "上市" => Some(MarketType::Listed),
            "上櫃" => Some(MarketType::OverTheCounter),
            _ => None,
        }
    }
}

/// One tradable equity from the exchange registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    /// Numeric stock code, e.g. "2330".
    pub code: String,
    /// Display name, e.g. "台積電".
    pub name: String,
    pub market: MarketType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_suffix() {
        assert_eq!(MarketType::Listed.symbol_suffix(), ".TW");
        assert_eq!(MarketType::OverTheCounter.symbol_suffix(), ".TWO");
    }

    #[test]
    fn test_registry_label_round_trip() {
        assert_eq!(MarketType::from_registry_label(" 上市 "), Some(MarketType::Listed));
        assert_eq!(MarketType::from_registry_label("上櫃"), Some(MarketType::OverTheCounter));
        assert_eq!(MarketType::from_registry_label("興櫃"), None);
    }

    #[test]
    fn test_market_type_serde_labels() {
        let json = serde_json::to_string(&MarketType::OverTheCounter).unwrap();
        assert_eq!(json, "\"上櫃\"");
        let back: MarketType = serde_json::from_str("\"上市\"").unwrap();
        assert_eq!(back, MarketType::Listed);
    }
}
