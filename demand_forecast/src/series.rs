//! Daily time series representation

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Regular daily time series
///
/// Stored as a start date plus one value per consecutive calendar day, so
/// timestamps are strictly increasing with a fixed one-day step by
/// construction. Every value is finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    start: NaiveDate,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a series starting at `start` with one value per day
    pub fn new(start: NaiveDate, values: Vec<f64>) -> Result<Self> {
        if let Some(position) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::DataError(format!(
                "Value at position {} is not finite",
                position
            )));
        }

        if !values.is_empty()
            && start
                .checked_add_days(Days::new(values.len() as u64 - 1))
                .is_none()
        {
            return Err(ForecastError::DataError(
                "Series extends past the last representable date".to_string(),
            ));
        }

        Ok(Self { start, values })
    }

    /// Create a series from explicit (date, value) points, which must already
    /// be consecutive days
    pub fn from_points(points: &[(NaiveDate, f64)]) -> Result<Self> {
        let Some(&(start, _)) = points.first() else {
            return Self::new(NaiveDate::MIN, Vec::new());
        };

        for (offset, window) in points.windows(2).enumerate() {
            if window[0].0.succ_opt() != Some(window[1].0) {
                return Err(ForecastError::DataError(format!(
                    "Points {} and {} are not consecutive days ({} then {})",
                    offset,
                    offset + 1,
                    window[0].0,
                    window[1].0
                )));
            }
        }

        Self::new(start, points.iter().map(|&(_, v)| v).collect())
    }

    /// First date of the series
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date of the series, `None` when empty
    pub fn end(&self) -> Option<NaiveDate> {
        self.date_at(self.values.len().checked_sub(1)?)
    }

    /// Date of the value at `index`
    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        if index >= self.values.len() {
            return None;
        }
        self.start.checked_add_days(Days::new(index as u64))
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Dates of all values, in order
    pub fn dates(&self) -> Vec<NaiveDate> {
        (0..self.values.len())
            .filter_map(|i| self.date_at(i))
            .collect()
    }

    /// (date, value) pairs, in order
    pub fn points(&self) -> Vec<(NaiveDate, f64)> {
        self.dates()
            .into_iter()
            .zip(self.values.iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Contiguous sub-series covering `range` of positions
    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        if range.start > range.end || range.end > self.values.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "Slice {}..{} is out of bounds for a series of length {}",
                range.start,
                range.end,
                self.values.len()
            )));
        }

        let start = self
            .start
            .checked_add_days(Days::new(range.start as u64))
            .ok_or_else(|| ForecastError::DataError("Slice start date overflows".to_string()))?;

        Ok(Self {
            start,
            values: self.values[range].to_vec(),
        })
    }
}

/// Output of normalization: one row per calendar day, in order
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub(crate) value_column: String,
    pub(crate) dates: Vec<NaiveDate>,
    pub(crate) values: Vec<f64>,
}

impl NormalizedTable {
    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Converts a normalized table into a [`TimeSeries`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SeriesBuilder;

impl SeriesBuilder {
    /// Build the series for `value_column`
    ///
    /// The normalizer already guarantees a gap-free daily index; this is a
    /// structural conversion only.
    pub fn build(table: &NormalizedTable, value_column: &str) -> Result<TimeSeries> {
        if table.value_column != value_column {
            return Err(ForecastError::SchemaError(format!(
                "Normalized table holds '{}', not '{}'",
                table.value_column, value_column
            )));
        }

        let start = table.dates.first().copied().unwrap_or(NaiveDate::MIN);
        TimeSeries::new(start, table.values.clone())
    }
}
