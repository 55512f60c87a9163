//! # Demand Forecast Workspace
//!
//! Umbrella crate for the workspace members:
//!
//! - [`demand_forecast`]: ingestion, normalization, splitting, models and the
//!   pipeline controller
//! - [`forecast_math`]: error measures, smoothing and scaling kernels
//!
//! ## Example
//!
//! ```
//! use demand_forecast_workspace::forecast_math::mean_absolute_error;
//!
//! let mae = mean_absolute_error(&[1.0, 2.0, 3.0], &[1.0, 2.0, 4.0]).unwrap();
//! assert!((mae - 1.0 / 3.0).abs() < 1e-12);
//! ```

pub use demand_forecast;
pub use forecast_math;

/// Returns the version of the workspace crate.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
