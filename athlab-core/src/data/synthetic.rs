//! Synthetic price series for demos and offline development.
//!
//! A weekday-only random walk starting at 100.0, seeded from the symbol name
//! so the same symbol always produces the same series. Results built on it
//! are tagged [`DataSource::Synthetic`].

use super::provider::{DataSource, FetchResult, RawQuote};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest absolute daily return of the walk.
const MAX_DAILY_MOVE: f64 = 0.03;

pub fn generate_synthetic_quotes(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<RawQuote> {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut quotes = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            let daily_return: f64 = rng.gen_range(-MAX_DAILY_MOVE..MAX_DAILY_MOVE);
            price *= 1.0 + daily_return;
            quotes.push(RawQuote {
                date: current,
                close: price,
                adj_close: price,
            });
        }
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }

    log::warn!("{symbol}: generated {} synthetic quotes", quotes.len());
    quotes
}

pub fn synthetic_fetch(symbol: &str, start: NaiveDate, end: NaiveDate) -> FetchResult {
    FetchResult {
        symbol: symbol.to_string(),
        quotes: generate_synthetic_quotes(symbol, start, end),
        source: DataSource::Synthetic,
    }
}
