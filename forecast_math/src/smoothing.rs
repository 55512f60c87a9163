//! Simple exponential smoothing

use crate::{MathError, Result};

/// Simple Exponential Smoothing (level only, no trend or season)
#[derive(Debug, Clone)]
pub struct SimpleExponentialSmoothing {
    alpha: f64,
    level: Option<f64>,
    values_seen: usize,
}

impl SimpleExponentialSmoothing {
    /// Create a new smoother with the specified alpha (smoothing factor)
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(MathError::InvalidInput(
                "Alpha must be between 0 and 1 (exclusive)".to_string(),
            ));
        }

        Ok(Self {
            alpha,
            level: None,
            values_seen: 0,
        })
    }

    /// Feed one observation into the smoother
    pub fn update(&mut self, value: f64) {
        self.values_seen += 1;

        self.level = Some(match self.level {
            None => value,
            // level = alpha * value + (1 - alpha) * previous_level
            Some(previous) => self.alpha * value + (1.0 - self.alpha) * previous,
        });
    }

    /// Feed every observation of a slice, in order
    pub fn update_all(&mut self, values: &[f64]) {
        for &value in values {
            self.update(value);
        }
    }

    /// Get the current smoothed level
    pub fn level(&self) -> Result<f64> {
        self.level.ok_or_else(|| {
            MathError::InsufficientData("No data available for exponential smoothing".to_string())
        })
    }

    /// Get the smoothing factor
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Number of observations seen so far
    pub fn values_seen(&self) -> usize {
        self.values_seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_smoothing() {
        let mut es = SimpleExponentialSmoothing::new(0.3).unwrap();

        es.update(10.0); // Initial level = 10
        assert!((es.level().unwrap() - 10.0).abs() < 0.001);

        es.update(20.0); // New level = 0.3*20 + 0.7*10 = 13
        assert!((es.level().unwrap() - 13.0).abs() < 0.001);
        assert_eq!(es.values_seen(), 2);
    }

    #[test]
    fn test_empty_smoother_has_no_level() {
        let es = SimpleExponentialSmoothing::new(0.5).unwrap();
        assert!(es.level().is_err());
    }

    #[test]
    fn test_alpha_bounds() {
        assert!(SimpleExponentialSmoothing::new(0.0).is_err());
        assert!(SimpleExponentialSmoothing::new(1.0).is_err());
        assert!(SimpleExponentialSmoothing::new(f64::NAN).is_err());
    }
}
