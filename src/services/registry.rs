//! Ticker listing fetcher for the TWSE ISIN registry.
//!
//! Both market segments (listed and over-the-counter) publish an HTML
//! table whose first row is the header. The security code and display
//! name share one cell, separated by a whitespace run (usually the
//! full-width ideographic space).

use scraper::{Html, Selector};
use tracing::{debug, error, info};

use crate::constants::{EQUITY_CFI_CODE, TWSE_LISTED_URL, TWSE_OTC_URL};
use crate::error::Result;
use crate::models::{MarketType, Ticker};
use crate::services::http::HttpFetcher;

/// Header labels of the columns the pipeline consumes.
const COL_CODE_NAME: &str = "有價證券代號及名稱";
const COL_MARKET: &str = "市場別";
const COL_CFI: &str = "CFICode";

pub struct RegistryClient {
    http: HttpFetcher,
}

impl RegistryClient {
    pub fn new() -> Result<Self> {
        Ok(Self { http: HttpFetcher::new()? })
    }

    /// Fetch the full equity universe from both market segments.
    ///
    /// A failure on either segment yields an empty set so the archive
    /// step can proceed and the metadata refresh becomes a no-op,
    /// keeping the previously persisted mapping.
    pub async fn fetch_all_tickers(&self) -> Vec<Ticker> {
        let mut tickers = Vec::new();
        for url in [TWSE_LISTED_URL, TWSE_OTC_URL] {
            match self.fetch_segment(url).await {
                Ok(mut segment) => {
                    info!(url, count = segment.len(), "Fetched registry segment");
                    tickers.append(&mut segment);
                }
                Err(e) => {
                    error!(url, error = %e, "Registry segment fetch failed, treating metadata as unavailable");
                    return Vec::new();
                }
            }
        }
        tickers
    }

    async fn fetch_segment(&self, url: &str) -> Result<Vec<Ticker>> {
        let html = self.http.get_text(url).await?;
        Ok(parse_registry_table(&html))
    }
}

/// Parse one registry HTML page into equity tickers.
///
/// Rows that cannot be parsed (missing columns, unsplittable code/name
/// cell, unknown market label) are dropped, never fatal.
pub fn parse_registry_table(html: &str) -> Vec<Ticker> {
    let document = Html::parse_document(html);
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("td, th").unwrap();

    let mut columns: Option<(usize, usize, usize)> = None;
    let mut tickers = Vec::new();

    for row in document.select(&row_sel) {
        let cells: Vec<String> = row
            .select(&cell_sel)
            .map(|c| c.text().collect::<String>().trim().to_string())
            .collect();

        // First row with the expected labels is the header.
        let Some((code_idx, market_idx, cfi_idx)) = columns else {
            let find = |label: &str| cells.iter().position(|c| c == label);
            if let (Some(c), Some(m), Some(f)) =
                (find(COL_CODE_NAME), find(COL_MARKET), find(COL_CFI))
            {
                columns = Some((c, m, f));
            }
            continue;
        };

        let max_idx = code_idx.max(market_idx).max(cfi_idx);
        if cells.len() <= max_idx {
            // Section separator rows span the table with a single cell.
            continue;
        }

        if cells[cfi_idx] != EQUITY_CFI_CODE {
            continue;
        }

        let Some((code, name)) = split_code_name(&cells[code_idx]) else {
            debug!(cell = %cells[code_idx], "Dropping row with unsplittable code/name cell");
            continue;
        };
        let Some(market) = MarketType::from_registry_label(&cells[market_idx]) else {
            debug!(code, label = %cells[market_idx], "Dropping row with unknown market label");
            continue;
        };

        tickers.push(Ticker { code, name, market });
    }

    tickers
}

/// Split a combined "code name" cell on the first whitespace run.
/// The code is the first token, the name is the remaining tokens
/// joined by single spaces. Fewer than two tokens means the record is
/// malformed and gets dropped.
fn split_code_name(cell: &str) -> Option<(String, String)> {
    let mut parts = cell.split_whitespace();
    let code = parts.next()?.to_string();
    let rest: Vec<&str> = parts.collect();
    if code.is_empty() || rest.is_empty() {
        return None;
    }
    Some((code, rest.join(" ")))
}
