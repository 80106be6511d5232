//! Domain types: the validated price series and its content hash.

pub mod ids;
pub mod series;

pub use ids::DatasetHash;
pub use series::{Observation, PriceSeries, SeriesView, ValidationError};
