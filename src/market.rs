//! Market ticker: polls a fixed set of instruments and formats the
//! scrolling marquee line.
//!
//! Quotes come from the unauthenticated Yahoo chart JSON endpoint, one
//! request per symbol. Percentage change is computed against the previous
//! close. Any failure in a cycle degrades the whole line to a static
//! syncing placeholder; the next fixed-interval tick simply tries again.
//! There is no retry or backoff.

use serde::Deserialize;
use thiserror::Error;

use crate::util::group_thousands;

/// Placeholder shown while quotes are unavailable.
pub const SYNCING_TEXT: &str = "MARKET_SYNCING... ◆ ";

/// Separator between instruments in the marquee line.
const SEPARATOR: &str = " ◆ ";

/// One tracked instrument: display label + query symbol.
#[derive(Debug, Clone, Copy)]
pub struct Instrument {
    pub label: &'static str,
    pub symbol: &'static str,
}

/// The fixed instrument set.
pub const INSTRUMENTS: [Instrument; 4] = [
    Instrument { label: "NIKKEI", symbol: "^N225" },
    Instrument { label: "DOW", symbol: "^DJI" },
    Instrument { label: "NASDAQ", symbol: "^IXIC" },
    Instrument { label: "USD/JPY", symbol: "USDJPY=X" },
];

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Malformed quote payload: {0}")]
    Decode(String),
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: f64,
    previous_close: f64,
}

/// A decoded quote for one instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub price: f64,
    pub previous_close: f64,
}

impl Quote {
    /// Percentage change against the previous close.
    pub fn percent_change(&self) -> f64 {
        if self.previous_close == 0.0 {
            return 0.0;
        }
        (self.price - self.previous_close) / self.previous_close * 100.0
    }
}

// ============================================================================
// Client
// ============================================================================

/// Quote client over the chart JSON endpoint.
///
/// The base URL is injectable so tests can point it at a mock server.
#[derive(Clone)]
pub struct MarketClient {
    client: reqwest::Client,
    base_url: String,
}

impl MarketClient {
    const DEFAULT_BASE: &'static str = "https://query1.finance.yahoo.com";

    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, Self::DEFAULT_BASE.to_string())
    }

    pub fn with_base_url(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Fetch the latest quote for one symbol.
    pub async fn quote(&self, symbol: &str) -> Result<Quote, MarketError> {
        let url = format!(
            "{}/v8/finance/chart/{}?interval=1m&range=1d",
            self.base_url, symbol
        );
        let response = self
            .client
            .get(&url)
            // The endpoint rejects the default client UA
            .header("User-Agent", "Mozilla/5.0")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MarketError::HttpStatus(response.status().as_u16()));
        }

        let bytes = response.bytes().await?;
        let payload: ChartResponse =
            serde_json::from_slice(&bytes).map_err(|e| MarketError::Decode(e.to_string()))?;

        let meta = payload
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .map(|r| r.meta)
            .ok_or_else(|| MarketError::Decode("empty chart result".to_string()))?;

        Ok(Quote {
            price: meta.regular_market_price,
            previous_close: meta.previous_close,
        })
    }

    /// Build the full marquee line for all instruments.
    ///
    /// One failing instrument degrades the whole cycle to the syncing
    /// placeholder; the line is all-or-nothing, matching its display as a
    /// single marquee.
    pub async fn ticker_line(&self) -> String {
        match self.try_ticker_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Market fetch failed, showing placeholder");
                SYNCING_TEXT.to_string()
            }
        }
    }

    async fn try_ticker_line(&self) -> Result<String, MarketError> {
        let mut parts = Vec::with_capacity(INSTRUMENTS.len());
        for instrument in INSTRUMENTS {
            let quote = self.quote(instrument.symbol).await?;
            parts.push(format_quote(instrument.label, &quote));
        }
        Ok(format!("{}{}", parts.join(SEPARATOR), SEPARATOR))
    }
}

/// `NIKKEI: 38,500.5 (+0.32%) ▲`
fn format_quote(label: &str, quote: &Quote) -> String {
    let pct = quote.percent_change();
    let trend = if quote.price >= quote.previous_close {
        "▲"
    } else {
        "▼"
    };
    format!(
        "{}: {} ({:+.2}%) {}",
        label,
        group_thousands(quote.price, 1),
        pct,
        trend
    )
}
