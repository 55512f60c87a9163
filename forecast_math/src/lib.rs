//! # Forecast Math
//!
//! Numeric building blocks shared by the demand forecasting pipeline.
//! This crate provides point-forecast error measures, simple exponential
//! smoothing and a standard scaler used to condition model inputs.

use thiserror::Error;

pub mod errors;
pub mod scaling;
pub mod smoothing;

pub use errors::{mean_absolute_error, mean_squared_error, root_mean_squared_error};
pub use scaling::StandardScaler;
pub use smoothing::SimpleExponentialSmoothing;

/// Errors that can occur in forecasting calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for forecasting math operations
pub type Result<T> = std::result::Result<T, MathError>;
