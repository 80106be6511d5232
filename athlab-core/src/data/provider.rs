//! Price source trait and structured data errors.
//!
//! `PriceProvider` abstracts over where daily closes come from (Yahoo Finance,
//! a CSV file, a synthetic random walk) so callers and tests can swap them.

use crate::domain::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One daily quote as delivered by a source, before ingestion.
///
/// Missing values are NaN; ingestion decides what to do with them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
    pub date: NaiveDate,
    pub close: f64,
    pub adj_close: f64,
}

/// Which quote column feeds the price series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    Close,
    /// Split/dividend adjusted close; falls back to `close` when a source has none.
    #[default]
    AdjClose,
}

impl RawQuote {
    pub fn price(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Close => self.close,
            PriceField::AdjClose if self.adj_close.is_nan() => self.close,
            PriceField::AdjClose => self.adj_close,
        }
    }
}

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("CSV import failed for {path}: {reason}")]
    Csv { path: String, reason: String },

    #[error("no usable prices for '{symbol}' after ingestion")]
    NoUsablePrices { symbol: String },

    #[error("invalid price series: {0}")]
    Validation(#[from] ValidationError),

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub quotes: Vec<RawQuote>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

impl DataSource {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, DataSource::Synthetic)
    }
}

/// Trait for price providers.
///
/// Implementations return whatever the source has for the range; ordering,
/// duplicates and gaps are cleaned up by `ingest`.
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily quotes for a symbol over an inclusive date range.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;

    /// Whether the provider is currently accepting requests.
    fn is_available(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(close: f64, adj_close: f64) -> RawQuote {
        RawQuote {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            close,
            adj_close,
        }
    }

    #[test]
    fn adj_close_preferred_when_present() {
        assert_eq!(quote(10.0, 9.5).price(PriceField::AdjClose), 9.5);
        assert_eq!(quote(10.0, 9.5).price(PriceField::Close), 10.0);
    }

    #[test]
    fn adj_close_falls_back_to_close() {
        assert_eq!(quote(10.0, f64::NAN).price(PriceField::AdjClose), 10.0);
    }

    #[test]
    fn price_field_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PriceField::AdjClose).unwrap(),
            "\"adj_close\""
        );
    }
}
