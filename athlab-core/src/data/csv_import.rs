//! CSV import for price histories exported from Yahoo Finance or elsewhere.
//!
//! Required columns: a date (`date` / `Date`, `YYYY-MM-DD`) and a close
//! (`close` / `Close`). An adjusted close (`adj_close` / `Adj Close`) is used
//! when present. Other columns are ignored. Unparseable numbers such as
//! `null` become NaN and are dropped later by ingestion.

use super::provider::{DataError, DataSource, FetchResult, RawQuote};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date", alias = "DATE", alias = "timestamp")]
    date: NaiveDate,
    #[serde(alias = "Close", alias = "CLOSE", deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(
        default,
        alias = "Adj Close",
        alias = "adjclose",
        alias = "Adj_Close",
        deserialize_with = "csv::invalid_option"
    )]
    adj_close: Option<f64>,
}

/// Read quotes from any CSV reader. `label` names the input in error messages.
pub fn read_quotes<R: Read>(reader: R, label: &str) -> Result<Vec<RawQuote>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut quotes = Vec::new();
    for (line, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|e| DataError::Csv {
            path: label.to_string(),
            // +2: header line plus 1-based numbering
            reason: format!("row {}: {e}", line + 2),
        })?;
        quotes.push(RawQuote {
            date: row.date,
            close: row.close.unwrap_or(f64::NAN),
            adj_close: row.adj_close.unwrap_or(f64::NAN),
        });
    }

    log::debug!("{label}: read {} CSV rows", quotes.len());
    Ok(quotes)
}

/// Read a CSV file into a [`FetchResult`] tagged as a CSV import.
pub fn import_csv(path: &Path, symbol: &str) -> Result<FetchResult, DataError> {
    let label = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| DataError::Csv {
        path: label.clone(),
        reason: e.to_string(),
    })?;
    let quotes = read_quotes(file, &label)?;
    log::info!("{symbol}: imported {} rows from {label}", quotes.len());
    Ok(FetchResult {
        symbol: symbol.to_string(),
        quotes,
        source: DataSource::CsvImport,
    })
}
