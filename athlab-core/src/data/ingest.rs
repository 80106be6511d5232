//! Turn raw provider quotes into a validated [`PriceSeries`].
//!
//! Sources deliver quotes in whatever order and quality they have. Ingestion
//! sorts by date, drops quotes with no usable price, then keeps the first
//! remaining quote for a repeated date. Everything that survives goes through
//! `PriceSeries::new`, so a non-positive price is still an error rather than
//! something silently skipped.

use super::provider::{DataError, PriceField, RawQuote};
use crate::domain::{Observation, PriceSeries};

/// A validated series plus what was discarded on the way.
#[derive(Debug, Clone)]
pub struct IngestResult {
    pub series: PriceSeries,
    /// Quotes whose selected price was NaN or infinite.
    pub dropped_missing: usize,
    /// Later quotes sharing a date with an earlier one.
    pub dropped_duplicates: usize,
}

pub fn ingest(
    mut quotes: Vec<RawQuote>,
    field: PriceField,
    symbol: &str,
) -> Result<IngestResult, DataError> {
    // Stable sort keeps source order among equal dates.
    quotes.sort_by_key(|q| q.date);

    // Missing prices go first: a NaN row never shadows a later valid quote.
    let before = quotes.len();
    quotes.retain(|q| q.price(field).is_finite());
    let dropped_missing = before - quotes.len();

    let before = quotes.len();
    quotes.dedup_by_key(|q| q.date);
    let dropped_duplicates = before - quotes.len();

    let observations: Vec<Observation> = quotes
        .iter()
        .map(|q| Observation::new(q.date, q.price(field)))
        .collect();

    if dropped_duplicates > 0 {
        log::warn!("{symbol}: dropped {dropped_duplicates} duplicate dates");
    }
    if dropped_missing > 0 {
        log::warn!("{symbol}: dropped {dropped_missing} quotes with missing prices");
    }

    if observations.is_empty() {
        return Err(DataError::NoUsablePrices {
            symbol: symbol.to_string(),
        });
    }

    let series = PriceSeries::new(observations)?;
    log::debug!(
        "{symbol}: ingested {} observations ({} to {})",
        series.len(),
        series.first().date,
        series.last().date
    );

    Ok(IngestResult {
        series,
        dropped_missing,
        dropped_duplicates,
    })
}
