//! Metrics for evaluating forecast performance

use crate::error::{ForecastError, Result};
use crate::models::ForecastResult;
use crate::series::TimeSeries;
use forecast_math::{mean_absolute_error, root_mean_squared_error};
use serde::{Deserialize, Serialize};

/// Point-forecast accuracy over the periods where actuals and predictions overlap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricReport {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Number of periods compared
    pub compared_points: usize,
}

impl std::fmt::Display for MetricReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Performance Metrics ({} periods):", self.compared_points)?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        Ok(())
    }
}

/// Compares a forecast with held-out actual values
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    /// Compute MAE and RMSE over `predicted[i]` vs `actual[i]` for the common prefix
    ///
    /// Different lengths are fine as long as at least one period overlaps.
    pub fn evaluate(actual: &TimeSeries, predicted: &ForecastResult) -> Result<MetricReport> {
        Self::evaluate_values(actual.values(), predicted.values())
    }

    /// Same as [`Evaluator::evaluate`] on plain slices
    pub fn evaluate_values(actual: &[f64], predicted: &[f64]) -> Result<MetricReport> {
        let overlap = actual.len().min(predicted.len());
        if overlap == 0 {
            return Err(ForecastError::AlignmentError(format!(
                "No overlapping periods between {} actual and {} predicted values",
                actual.len(),
                predicted.len()
            )));
        }

        if actual.len() != predicted.len() {
            log::warn!(
                "Comparing the first {} periods only ({} actual, {} predicted)",
                overlap,
                actual.len(),
                predicted.len()
            );
        }

        let actual = &actual[..overlap];
        let predicted = &predicted[..overlap];

        Ok(MetricReport {
            mae: mean_absolute_error(actual, predicted)?,
            rmse: root_mean_squared_error(actual, predicted)?,
            compared_points: overlap,
        })
    }
}
