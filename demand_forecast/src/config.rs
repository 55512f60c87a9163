//! Request and model configuration
//!
//! Everything a caller chooses for one forecasting request lives here, with
//! serde support so a request can be kept next to the data it was run on.
//!
//! # Example
//!
//! ```no_run
//! use demand_forecast::config::ForecastRequest;
//! use demand_forecast::data::ColumnSelection;
//!
//! let request = ForecastRequest::new(ColumnSelection::new("product_id", "date", "sales"));
//! request.save_json("request.json")?;
//! let loaded = ForecastRequest::load_json("request.json")?;
//! assert_eq!(loaded, request);
//! # Ok::<(), demand_forecast::ForecastError>(())
//! ```

use crate::data::{ColumnSelection, DateRange};
use crate::error::{ForecastError, Result};
use crate::split::DEFAULT_TRAIN_RATIO;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Chunk lengths, training length and horizon for a sequence model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Past points consumed per inference step
    pub input_chunk_length: usize,
    /// Future points emitted per inference step
    pub output_chunk_length: usize,
    /// Passes over the training windows
    pub epochs: usize,
    /// Number of future periods to forecast
    pub forecast_horizon: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            input_chunk_length: 30,
            output_chunk_length: 30,
            epochs: 100,
            forecast_horizon: 30,
        }
    }
}

impl ModelConfig {
    pub fn new(
        input_chunk_length: usize,
        output_chunk_length: usize,
        epochs: usize,
        forecast_horizon: usize,
    ) -> Self {
        Self {
            input_chunk_length,
            output_chunk_length,
            epochs,
            forecast_horizon,
        }
    }

    /// Check that every setting is positive
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("input_chunk_length", self.input_chunk_length),
            ("output_chunk_length", self.output_chunk_length),
            ("epochs", self.epochs),
            ("forecast_horizon", self.forecast_horizon),
        ];

        for (name, value) in fields {
            if value == 0 {
                return Err(ForecastError::ModelConfigError(format!(
                    "{} must be a positive integer",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Fewest training points that yield one full input/output window
    pub fn min_training_length(&self) -> usize {
        self.input_chunk_length + self.output_chunk_length
    }
}

/// Training time budget, scaled by the number of epochs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutPolicy {
    /// Estimated upper bound for one epoch, in milliseconds
    pub per_epoch_ms: u64,
}

impl TimeoutPolicy {
    pub fn per_epoch(per_epoch: Duration) -> Self {
        Self {
            per_epoch_ms: per_epoch.as_millis().min(u64::MAX as u128) as u64,
        }
    }

    /// Reject a zero per-epoch budget, which would time out every run
    pub fn validate(&self) -> Result<()> {
        if self.per_epoch_ms == 0 {
            return Err(ForecastError::ModelConfigError(
                "Training timeout must allow at least 1 ms per epoch".to_string(),
            ));
        }
        Ok(())
    }

    /// Total budget for `epochs` epochs
    pub fn budget(&self, epochs: usize) -> Duration {
        Duration::from_millis(self.per_epoch_ms.saturating_mul(epochs as u64))
    }
}

/// Everything a caller chooses for one forecasting request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub selection: ColumnSelection,
    /// Dates to keep; `None` keeps the full observed range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<DateRange>,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default = "default_split_ratio")]
    pub split_ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_timeout: Option<TimeoutPolicy>,
}

fn default_split_ratio() -> f64 {
    DEFAULT_TRAIN_RATIO
}

impl ForecastRequest {
    /// Request with default model settings over the full date range
    pub fn new(selection: ColumnSelection) -> Self {
        Self {
            selection,
            range: None,
            model: ModelConfig::default(),
            split_ratio: DEFAULT_TRAIN_RATIO,
            training_timeout: None,
        }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    pub fn with_split_ratio(mut self, split_ratio: f64) -> Self {
        self.split_ratio = split_ratio;
        self
    }

    pub fn with_training_timeout(mut self, timeout: TimeoutPolicy) -> Self {
        self.training_timeout = Some(timeout);
        self
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
