//! Exponential smoothing baseline

use crate::config::ModelConfig;
use crate::error::{ForecastError, Result};
use crate::models::{
    next_period, CancellationToken, ForecastModel, ForecastResult, TrainedForecastModel,
};
use crate::series::TimeSeries;
use chrono::NaiveDate;
use forecast_math::SimpleExponentialSmoothing;

/// Simple exponential smoothing model
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    /// Name of the model
    name: String,
    /// Smoothing parameter
    alpha: f64,
}

/// Trained exponential smoothing model
#[derive(Debug, Clone)]
pub struct TrainedExponentialSmoothing {
    /// Name of the model
    name: String,
    /// Smoothing parameter
    alpha: f64,
    /// Current level
    level: f64,
    next_date: NaiveDate,
}

impl ExponentialSmoothing {
    /// Create a new exponential smoothing model
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ForecastError::InvalidParameter(
                "Alpha must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Exponential Smoothing (alpha={})", alpha),
            alpha,
        })
    }
}

impl ForecastModel for ExponentialSmoothing {
    type Trained = TrainedExponentialSmoothing;

    /// Smooths the last `input_chunk_length` points; epochs don't apply
    fn train(
        &self,
        series: &TimeSeries,
        config: &ModelConfig,
        _cancel: &CancellationToken,
    ) -> Result<Self::Trained> {
        let values = series.values();
        if values.is_empty() {
            return Err(ForecastError::DataError(
                "Empty time series data".to_string(),
            ));
        }

        let window = config.input_chunk_length.clamp(1, values.len());
        let mut smoother = SimpleExponentialSmoothing::new(self.alpha)?;
        smoother.update_all(&values[values.len() - window..]);

        Ok(TrainedExponentialSmoothing {
            name: self.name.clone(),
            alpha: self.alpha,
            level: smoother.level()?,
            next_date: next_period(series)?,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedExponentialSmoothing {
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn level(&self) -> f64 {
        self.level
    }
}

impl TrainedForecastModel for TrainedExponentialSmoothing {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        // In simple exponential smoothing, the forecast is constant at the last level
        ForecastResult::new(self.next_date, vec![self.level; horizon], horizon)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
