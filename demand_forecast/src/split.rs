//! Chronological train/test partitioning

use crate::error::{ForecastError, Result};
use crate::series::TimeSeries;
use serde::{Deserialize, Serialize};

/// Share of the series used for training unless configured otherwise
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

/// Training prefix and held-out suffix of one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub train: TimeSeries,
    pub test: TimeSeries,
}

/// Splits a series at `floor(ratio * len)` without shuffling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPolicy {
    ratio: f64,
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_TRAIN_RATIO,
        }
    }
}

impl SplitPolicy {
    /// Create a policy with a training ratio strictly between 0 and 1
    pub fn new(ratio: f64) -> Result<Self> {
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Split ratio must be between 0 and 1 (exclusive), got {}",
                ratio
            )));
        }

        Ok(Self { ratio })
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Position of the first test point for a series of `len` points
    pub fn split_index(&self, len: usize) -> usize {
        (self.ratio * len as f64).floor() as usize
    }

    /// Partition `series` into train = series[..index] and test = series[index..]
    pub fn split(&self, series: &TimeSeries) -> Result<Split> {
        let len = series.len();
        if len < 2 {
            return Err(ForecastError::InvalidSplit(format!(
                "Need at least 2 points to split, got {}",
                len
            )));
        }

        let index = self.split_index(len);
        if index == 0 || index >= len {
            return Err(ForecastError::InvalidSplit(format!(
                "Ratio {} leaves an empty segment for a series of {} points",
                self.ratio, len
            )));
        }

        Ok(Split {
            train: series.slice(0..index)?,
            test: series.slice(index..len)?,
        })
    }
}
