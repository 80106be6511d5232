//! Price data: sources, ingestion and loading.

pub mod circuit_breaker;
pub mod csv_import;
pub mod ingest;
pub mod loader;
pub mod provider;
pub mod symbol;
pub mod synthetic;
pub mod yahoo;

pub use circuit_breaker::CircuitBreaker;
pub use csv_import::{import_csv, read_quotes};
pub use ingest::{ingest, IngestResult};
pub use loader::{load_series, LoadOptions, LoadedSeries, SeriesSource};
pub use provider::{DataError, DataSource, FetchResult, PriceField, PriceProvider, RawQuote};
pub use symbol::normalize_ticker;
pub use synthetic::{generate_synthetic_quotes, synthetic_fetch};
pub use yahoo::{TickerMatch, YahooProvider};
