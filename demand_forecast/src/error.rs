//! Error types for the demand_forecast crate

use polars::prelude::PolarsError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Boxed cause preserved when a model failure is wrapped at the adapter boundary
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A selected column is missing or unusable
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// The requested date range is inverted or outside the observed data
    #[error("Invalid date range: {0}")]
    DateRangeError(String),

    /// Too few points remain after normalization
    #[error("Insufficient data: found {found} points, need at least {required}")]
    InsufficientData { found: usize, required: usize },

    /// The series cannot be split into non-empty train and test parts
    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    /// Chunk lengths or other model settings don't fit the training data
    #[error("Model configuration error: {0}")]
    ModelConfigError(String),

    /// The forecasting model failed while training or predicting
    #[error("Training failure in {model}: {source}")]
    TrainingFailure {
        model: String,
        #[source]
        source: BoxedCause,
    },

    /// Raised by a model implementation; wrapped into `TrainingFailure` by the adapter
    #[error("Model error: {0}")]
    ModelError(String),

    /// Predictions and actual values have no period in common
    #[error("Alignment error: {0}")]
    AlignmentError(String),

    /// Training exceeded the configured time budget
    #[error("Training timed out after {0:?}")]
    TrainingTimeout(Duration),

    /// Training was cancelled between epochs
    #[error("Training cancelled after {epochs_completed} completed epochs")]
    TrainingCancelled { epochs_completed: usize },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from the numeric kernels
    #[error("Math error: {0}")]
    MathError(#[from] forecast_math::MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from JSON (de)serialization
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

/// Stage of the forecasting pipeline in which a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PipelineStage {
    Schema,
    DateRange,
    Normalize,
    Split,
    ModelConfig,
    Training,
    Forecast,
    Evaluate,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Schema => "column selection",
            PipelineStage::DateRange => "date range",
            PipelineStage::Normalize => "normalization",
            PipelineStage::Split => "train/test split",
            PipelineStage::ModelConfig => "model configuration",
            PipelineStage::Training => "training",
            PipelineStage::Forecast => "forecast",
            PipelineStage::Evaluate => "evaluation",
        };
        f.write_str(name)
    }
}

/// The single terminal error of a pipeline run
#[derive(Debug, Error)]
#[error("{stage} failed: {error}")]
pub struct PipelineError {
    pub stage: PipelineStage,
    #[source]
    pub error: ForecastError,
}

impl PipelineError {
    pub fn new(stage: PipelineStage, error: ForecastError) -> Self {
        Self { stage, error }
    }
}
