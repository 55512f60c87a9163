//! # Demand Forecast
//!
//! Turns uploaded sales records into a short-horizon demand forecast with
//! accuracy metrics.
//!
//! ## Features
//!
//! - CSV ingestion with caller-chosen identifier, date and value columns
//! - Lenient date parsing with non-fatal reporting of unparseable rows
//! - Daily resampling: same-day sums, zero-filled gaps, minimum length of 60 days
//! - Chronological train/test split (80/20 by default)
//! - Pluggable forecasting models (neural sequence model, exponential
//!   smoothing, naive) trained on a worker thread with cancellation and timeouts
//! - MAE / RMSE evaluation against held-out data
//!
//! ## Quick Start
//!
//! ```no_run
//! use demand_forecast::config::{ForecastRequest, ModelConfig};
//! use demand_forecast::data::{ColumnSelection, DataLoader};
//! use demand_forecast::models::neural::MlpForecaster;
//! use demand_forecast::pipeline::PipelineController;
//!
//! // Load data
//! let table = DataLoader::from_csv("sales.csv")?;
//!
//! // Describe the request
//! let request = ForecastRequest::new(ColumnSelection::new("product_id", "date", "sales"))
//!     .with_model(ModelConfig::new(30, 10, 50, 14));
//!
//! // Run the pipeline
//! let mut controller = PipelineController::new(MlpForecaster::new());
//! let outcome = controller.run(&table, &request)?;
//!
//! for warning in &outcome.warnings {
//!     println!("warning: {}", warning);
//! }
//! println!("{}", outcome.metrics);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adapter;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod schema;
pub mod series;
pub mod split;
pub mod utils;
pub mod warning;

// Re-export commonly used types
pub use crate::adapter::{ForecastAdapter, TrainingHandle};
pub use crate::config::{ForecastRequest, ModelConfig, TimeoutPolicy};
pub use crate::data::{ColumnSelection, DataLoader, DateRange, RawTable};
pub use crate::error::{ForecastError, PipelineError, PipelineStage};
pub use crate::metrics::{Evaluator, MetricReport};
pub use crate::models::{CancellationToken, ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::normalize::{ParsedRecords, TemporalNormalizer, MIN_SERIES_LENGTH};
pub use crate::pipeline::{PipelineController, PipelineOutcome, PipelineState};
pub use crate::schema::SchemaValidator;
pub use crate::series::{SeriesBuilder, TimeSeries};
pub use crate::split::{Split, SplitPolicy};
pub use crate::warning::PipelineWarning;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
