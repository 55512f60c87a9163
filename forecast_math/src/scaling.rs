//! Standard (z-score) scaling

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Scales values to zero mean and unit variance using stored statistics.
///
/// A scaler is fitted once on training data and then applied unchanged to
/// every later input and output, so predictions can be mapped back with
/// [`StandardScaler::inverse`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: f64,
    std_dev: f64,
}

impl StandardScaler {
    /// Create a scaler from known statistics
    ///
    /// A zero or non-finite standard deviation (a constant series) falls
    /// back to 1.0 so that scaling only recenters the data.
    pub fn new(mean: f64, std_dev: f64) -> Result<Self> {
        if !mean.is_finite() {
            return Err(MathError::InvalidInput(format!(
                "Scaler mean must be finite, got {}",
                mean
            )));
        }

        let std_dev = if std_dev.is_finite() && std_dev > 1e-12 {
            std_dev
        } else {
            1.0
        };

        Ok(Self { mean, std_dev })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }

    pub fn inverse(&self, value: f64) -> f64 {
        value * self.std_dev + self.mean
    }

    pub fn transform_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.transform(v)).collect()
    }

    pub fn inverse_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.inverse(v)).collect()
    }
}
