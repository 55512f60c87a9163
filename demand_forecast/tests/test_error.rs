use demand_forecast::error::{ForecastError, PipelineError, PipelineStage};
use std::error::Error;
use std::io;
use std::time::Duration;

#[test]
fn test_error_conversion() {
    // Test IO error conversion
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    // Math errors keep their variant
    let math_error = forecast_math::MathError::InsufficientData("empty".to_string());
    let forecast_error = ForecastError::from(math_error);
    assert!(matches!(forecast_error, ForecastError::MathError(_)));

    // JSON errors
    let json_error = serde_json::from_str::<u32>("not json").unwrap_err();
    let forecast_error = ForecastError::from(json_error);
    assert!(matches!(forecast_error, ForecastError::SerdeError(_)));
}

#[test]
fn test_error_display() {
    let error = ForecastError::InsufficientData {
        found: 59,
        required: 60,
    };
    assert_eq!(
        error.to_string(),
        "Insufficient data: found 59 points, need at least 60"
    );

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = ForecastError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));

    let error = ForecastError::TrainingTimeout(Duration::from_secs(3));
    assert_eq!(error.to_string(), "Training timed out after 3s");

    let error = ForecastError::TrainingCancelled {
        epochs_completed: 4,
    };
    assert!(error.to_string().contains("4 completed epochs"));
}

#[test]
fn test_training_failure_chain() {
    let error = ForecastError::TrainingFailure {
        model: "mlp".to_string(),
        source: Box::new(ForecastError::ModelError("Failed to converge".to_string())),
    };

    assert_eq!(
        error.to_string(),
        "Training failure in mlp: Model error: Failed to converge"
    );
    assert!(error.source().is_some());
}

#[test]
fn test_pipeline_error() {
    let error = PipelineError::new(
        PipelineStage::Split,
        ForecastError::InvalidSplit("empty test segment".to_string()),
    );

    assert_eq!(
        error.to_string(),
        "train/test split failed: Invalid split: empty test segment"
    );
    assert!(matches!(
        error.source().and_then(|e| e.downcast_ref::<ForecastError>()),
        Some(ForecastError::InvalidSplit(_))
    ));
}

#[test]
fn test_stage_names() {
    let stages = [
        (PipelineStage::Schema, "column selection"),
        (PipelineStage::DateRange, "date range"),
        (PipelineStage::Normalize, "normalization"),
        (PipelineStage::ModelConfig, "model configuration"),
        (PipelineStage::Training, "training"),
        (PipelineStage::Forecast, "forecast"),
        (PipelineStage::Evaluate, "evaluation"),
    ];

    for (stage, name) in stages {
        assert_eq!(stage.to_string(), name);
    }
}
