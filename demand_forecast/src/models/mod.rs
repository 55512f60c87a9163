//! Forecasting models for daily demand series

use crate::config::ModelConfig;
use crate::error::{ForecastError, Result};
use crate::series::TimeSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub mod exponential_smoothing;
pub mod naive;
pub mod neural;

/// Forecast result containing predicted values
///
/// Values are positionally aligned to the days immediately following the
/// training series: `values[0]` belongs to `start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Forecasted values
    values: Vec<f64>,
    /// Date of the first forecasted value
    start: NaiveDate,
}

impl ForecastResult {
    /// Create a new forecast result holding exactly `horizon` values
    pub fn new(start: NaiveDate, values: Vec<f64>, horizon: usize) -> Result<Self> {
        if values.len() != horizon {
            return Err(ForecastError::ModelError(format!(
                "Values length ({}) doesn't match horizon ({})",
                values.len(),
                horizon
            )));
        }

        Ok(Self { values, start })
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    /// Date of the first forecasted value
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Date of every forecasted value
    pub fn dates(&self) -> Vec<NaiveDate> {
        match self.start.pred_opt() {
            Some(before) => crate::utils::future_dates(before, self.values.len()),
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Cooperative cancellation flag shared between a caller and a training worker
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; training stops at the next epoch boundary
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug + Send {
    /// Generate a forecast for the `horizon` periods after the training data
    fn forecast(&self, horizon: usize) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a daily series
pub trait ForecastModel: Debug + Clone + Send + 'static {
    /// The type of trained model produced
    type Trained: TrainedForecastModel + 'static;

    /// Train the model on `series`
    ///
    /// Implementations that iterate should check `cancel` between iterations
    /// and return [`ForecastError::TrainingCancelled`] once it is set.
    fn train(
        &self,
        series: &TimeSeries,
        config: &ModelConfig,
        cancel: &CancellationToken,
    ) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// First day after the end of `series`
pub(crate) fn next_period(series: &TimeSeries) -> Result<NaiveDate> {
    series
        .end()
        .and_then(|end| end.succ_opt())
        .ok_or_else(|| ForecastError::ModelError("Cannot forecast after an empty series".to_string()))
}

/// Produce `horizon` values by repeatedly predicting one output chunk and
/// feeding it back into the input window.
///
/// `history` must hold at least `input_len` values; `step` maps the latest
/// `input_len` values to the next chunk.
pub(crate) fn forecast_recursively<F>(
    history: &[f64],
    input_len: usize,
    horizon: usize,
    mut step: F,
) -> Result<Vec<f64>>
where
    F: FnMut(&[f64]) -> Result<Vec<f64>>,
{
    if input_len == 0 || history.len() < input_len {
        return Err(ForecastError::ModelError(format!(
            "Need {} history values to forecast, have {}",
            input_len,
            history.len()
        )));
    }

    let mut window = history[history.len() - input_len..].to_vec();
    let mut forecast = Vec::with_capacity(horizon);

    while forecast.len() < horizon {
        let chunk = step(&window)?;
        if chunk.is_empty() {
            return Err(ForecastError::ModelError(
                "Model produced an empty output chunk".to_string(),
            ));
        }

        forecast.extend_from_slice(&chunk);
        window.extend_from_slice(&chunk);
        let excess = window.len() - input_len;
        window.drain(..excess);
    }

    forecast.truncate(horizon);
    Ok(forecast)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recursion_feeds_predictions_back() {
        // Each step echoes the last value plus one, two values per chunk
        let values = forecast_recursively(&[1.0, 2.0, 3.0], 2, 5, |window| {
            let last = window[window.len() - 1];
            Ok(vec![last + 1.0, last + 2.0])
        })
        .unwrap();

        assert_eq!(values, vec![4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn recursion_keeps_window_length() {
        let mut seen = Vec::new();
        forecast_recursively(&[0.0; 10], 4, 9, |window| {
            seen.push(window.len());
            Ok(vec![1.0; 3])
        })
        .unwrap();

        assert_eq!(seen, vec![4, 4, 4]);
    }

    #[test]
    fn recursion_rejects_short_history() {
        assert!(forecast_recursively(&[1.0], 3, 2, |_| Ok(vec![0.0])).is_err());
    }
}
