//! Point-forecast error measures
//!
//! All measures compare two equally long, non-empty slices position by
//! position. Callers that need to compare series of different lengths are
//! expected to cut both to their common prefix first.

use crate::{MathError, Result};

fn check_pair(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(MathError::InsufficientData(
            "Error measures need at least one actual and one predicted value".to_string(),
        ));
    }

    if actual.len() != predicted.len() {
        return Err(MathError::InvalidInput(format!(
            "Actual length ({}) doesn't match predicted length ({})",
            actual.len(),
            predicted.len()
        )));
    }

    Ok(())
}

fn finite(value: f64, measure: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MathError::CalculationError(format!(
            "{} is not finite ({})",
            measure, value
        )))
    }
}

/// Mean of the absolute differences between actual and predicted values
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum();

    finite(sum / actual.len() as f64, "MAE")
}

/// Mean of the squared differences between actual and predicted values
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    finite(sum / actual.len() as f64, "MSE")
}

/// Square root of the mean squared error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    Ok(mean_squared_error(actual, predicted)?.sqrt())
}
