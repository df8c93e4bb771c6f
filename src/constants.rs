//! Fixed parameters of the archival and indicator pipeline.

/// TWSE ISIN registry endpoint for listed equities (strMode=2).
pub const TWSE_LISTED_URL: &str = "https://isin.twse.com.tw/isin/C_public.jsp?strMode=2";

/// TWSE ISIN registry endpoint for over-the-counter equities (strMode=4).
pub const TWSE_OTC_URL: &str = "https://isin.twse.com.tw/isin/C_public.jsp?strMode=4";

/// Security class kept when filtering the registry (common equity shares).
pub const EQUITY_CFI_CODE: &str = "ESVUFR";

/// Yahoo Finance chart API base URL.
pub const QUOTE_API_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Calendar days fetched per ticker. Over-fetches so that at least
/// [`SERVING_WINDOW_DAYS`] trading days survive cleaning.
pub const LOOKBACK_CALENDAR_DAYS: i64 = 120;

/// Extended lookback used for indicator charts, where EMA/RSI warm-up
/// needs history older than the display window.
pub const INDICATOR_LOOKBACK_DAYS: i64 = 150;

/// Trailing trading days served to the presentation layer.
pub const SERVING_WINDOW_DAYS: usize = 90;

/// MACD exponential moving average spans.
pub const MACD_FAST_SPAN: usize = 12;
pub const MACD_SLOW_SPAN: usize = 26;
pub const MACD_SIGNAL_SPAN: usize = 9;

/// RSI smoothing window (simple moving average of gains/losses).
pub const RSI_PERIOD: usize = 14;

/// Retry policy shared by the registry and quote fetchers.
pub const MAX_RETRIES: u32 = 3;
pub const RETRY_BASE_DELAY_SECS: u64 = 2;
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
