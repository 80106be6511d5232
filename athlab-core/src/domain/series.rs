//! PriceSeries: the validated, time-ordered input to every analysis.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::Index;
use thiserror::Error;

/// A single dated price point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub price: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Reasons a series is rejected at construction.
///
/// Every variant names the offending index so the ingestion layer can point
/// at the bad row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("price series is empty")]
    Empty,

    #[error("date {date} at index {index} is not after previous date {previous}")]
    NonIncreasingDate {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },

    #[error("price {price} at index {index} ({date}) is not positive")]
    NonPositivePrice {
        index: usize,
        date: NaiveDate,
        price: f64,
    },

    #[error("price at index {index} ({date}) is not a finite number")]
    NonFinitePrice { index: usize, date: NaiveDate },
}

/// Immutable, validated sequence of observations.
///
/// Invariants (checked once, in [`PriceSeries::new`]):
/// - at least one observation
/// - dates strictly increasing
/// - every price finite and > 0
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    observations: Vec<Observation>,
}

impl PriceSeries {
    pub fn new(observations: Vec<Observation>) -> Result<Self, ValidationError> {
        if observations.is_empty() {
            return Err(ValidationError::Empty);
        }

        for (index, obs) in observations.iter().enumerate() {
            if !obs.price.is_finite() {
                return Err(ValidationError::NonFinitePrice {
                    index,
                    date: obs.date,
                });
            }
            if obs.price <= 0.0 {
                return Err(ValidationError::NonPositivePrice {
                    index,
                    date: obs.date,
                    price: obs.price,
                });
            }
            if index > 0 {
                let previous = observations[index - 1].date;
                if obs.date <= previous {
                    return Err(ValidationError::NonIncreasingDate {
                        index,
                        date: obs.date,
                        previous,
                    });
                }
            }
        }

        Ok(Self { observations })
    }

    /// Build a series from `(date, price)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(date, price)| Observation::new(date, price))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always false for a constructed series; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Observation> {
        self.observations.get(index)
    }

    pub fn first(&self) -> &Observation {
        &self.observations[0]
    }

    pub fn last(&self) -> &Observation {
        &self.observations[self.observations.len() - 1]
    }

    /// Restartable iteration; each call starts again from the first observation.
    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.observations
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.observations.iter().map(|o| o.date)
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|o| o.price)
    }

    /// Index of the observation on `date`, if one exists.
    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        self.observations.binary_search_by(|o| o.date.cmp(&date)).ok()
    }

    /// Read-only view of the observations whose dates fall in `start..=end`.
    ///
    /// The view may be empty when no observation falls in the range.
    pub fn slice(&self, start: NaiveDate, end: NaiveDate) -> SeriesView<'_> {
        let lo = self.observations.partition_point(|o| o.date < start);
        let hi = self.observations.partition_point(|o| o.date <= end);
        let hi = hi.max(lo);
        SeriesView {
            offset: lo,
            observations: &self.observations[lo..hi],
        }
    }
}

impl Index<usize> for PriceSeries {
    type Output = Observation;

    fn index(&self, index: usize) -> &Self::Output {
        &self.observations[index]
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

/// Borrowed date-range window over a [`PriceSeries`].
#[derive(Debug, Clone, Copy)]
pub struct SeriesView<'a> {
    offset: usize,
    observations: &'a [Observation],
}

impl<'a> SeriesView<'a> {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Index of the view's first observation in the parent series.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Observation> {
        self.observations.iter()
    }

    pub fn as_slice(&self) -> &'a [Observation] {
        self.observations
    }

    /// Copy the window into a standalone series so it can be analyzed on its own.
    ///
    /// Episodes that straddle the window edges are not stitched back together.
    pub fn to_series(&self) -> Result<PriceSeries, ValidationError> {
        PriceSeries::new(self.observations.to_vec())
    }
}
