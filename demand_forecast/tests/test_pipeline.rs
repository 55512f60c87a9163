mod common;

use common::{daily_sales_csv, daily_sales_csv_with_bad_dates, day, nth_day, table_from};
use demand_forecast::config::{ForecastRequest, ModelConfig, TimeoutPolicy};
use demand_forecast::data::{ColumnSelection, DateRange};
use demand_forecast::error::{ForecastError, PipelineStage};
use demand_forecast::models::naive::NaiveForecaster;
use demand_forecast::models::neural::MlpForecaster;
use demand_forecast::pipeline::{PipelineController, PipelineState};
use demand_forecast::warning::PipelineWarning;
use pretty_assertions::assert_eq;
use std::time::Duration;
use tempfile::tempdir;

fn sales_request() -> ForecastRequest {
    ForecastRequest::new(ColumnSelection::new("product_id", "date", "sales"))
}

#[test]
fn test_end_to_end_forecast() {
    let table = table_from(&daily_sales_csv(day(2023, 1, 1), 90));
    let request = sales_request()
        .with_model(ModelConfig::new(30, 10, 5, 10))
        .with_training_timeout(TimeoutPolicy::per_epoch(Duration::from_secs(10)));

    let mut controller = PipelineController::new(MlpForecaster::new());
    let outcome = controller.run(&table, &request).unwrap();

    assert_eq!(outcome.series.len(), 90);
    assert_eq!(outcome.split.train.len(), 72);
    assert_eq!(outcome.split.test.len(), 18);
    assert_eq!(outcome.forecast.len(), 10);
    assert_eq!(outcome.forecast.start(), outcome.split.test.start());
    assert_eq!(outcome.metrics.compared_points, 10);
    assert!(outcome.metrics.mae.is_finite() && outcome.metrics.mae >= 0.0);
    assert!(outcome.metrics.rmse.is_finite() && outcome.metrics.rmse >= outcome.metrics.mae);
    assert!(outcome.warnings.is_empty());
    assert!(outcome.model_name.starts_with("Neural sequence forecaster"));

    assert_eq!(controller.state(), &PipelineState::Evaluated);
    assert_eq!(
        controller.history(),
        &[
            PipelineState::Uploaded,
            PipelineState::ColumnsSelected,
            PipelineState::RangeSelected,
            PipelineState::Normalized,
            PipelineState::Split,
            PipelineState::ModelConfigured,
            PipelineState::Trained,
            PipelineState::Forecasted,
            PipelineState::Evaluated,
        ]
    );
    assert!(controller.state().is_terminal());
}

#[test]
fn test_bad_dates_are_reported_once() {
    let table = table_from(&daily_sales_csv_with_bad_dates(
        day(2023, 1, 1),
        100,
        &[10, 20, 30, 40, 50],
    ));
    let request = sales_request().with_model(ModelConfig::new(14, 7, 1, 7));

    let mut controller = PipelineController::new(NaiveForecaster::seasonal(7).unwrap());
    let outcome = controller.run(&table, &request).unwrap();

    assert_eq!(outcome.warnings.len(), 1);
    assert!(matches!(
        outcome.warnings[0],
        PipelineWarning::UnparseableDates {
            invalid_rows: 5,
            ..
        }
    ));
    assert_eq!(outcome.series.len(), 100);
}

#[test]
fn test_several_products_are_summed_with_a_warning() {
    let mut csv = daily_sales_csv(day(2023, 1, 1), 70);
    for i in 0..70 {
        csv.push_str(&format!("P002,{},1\n", nth_day(day(2023, 1, 1), i).format("%Y-%m-%d")));
    }
    let table = table_from(&csv);
    let request = sales_request().with_model(ModelConfig::new(7, 7, 1, 7));

    let outcome = PipelineController::new(NaiveForecaster::last_value())
        .run(&table, &request)
        .unwrap();

    assert_eq!(outcome.series.len(), 70);
    assert_eq!(outcome.series.values()[0], common::sales_value(0) + 1.0);
    assert_eq!(
        outcome.warnings,
        vec![PipelineWarning::MixedIdentifiers {
            column: "product_id".to_string(),
            distinct: 2,
        }]
    );
}

#[test]
fn test_short_history_fails_during_normalization() {
    let table = table_from(&daily_sales_csv(day(2023, 1, 1), 59));

    let mut controller = PipelineController::new(MlpForecaster::new());
    let err = controller.run(&table, &sales_request()).unwrap_err();

    assert_eq!(err.stage, PipelineStage::Normalize);
    assert!(matches!(
        err.error,
        ForecastError::InsufficientData {
            found: 59,
            required: 60
        }
    ));
    assert!(matches!(
        controller.state(),
        PipelineState::Failed {
            stage: PipelineStage::Normalize,
            ..
        }
    ));
    assert_eq!(controller.history().len(), 4);
}

#[test]
fn test_missing_column_fails_at_schema_stage() {
    let table = table_from(&daily_sales_csv(day(2023, 1, 1), 90));
    let request = ForecastRequest::new(ColumnSelection::new("product_id", "day", "sales"));

    let mut controller = PipelineController::new(MlpForecaster::new());
    let err = controller.run(&table, &request).unwrap_err();

    assert_eq!(err.stage, PipelineStage::Schema);
    assert!(matches!(err.error, ForecastError::SchemaError(_)));
    assert!(err.to_string().starts_with("column selection failed"));
    assert_eq!(controller.history().len(), 2);
}

#[test]
fn test_range_outside_data_fails_at_range_stage() {
    let table = table_from(&daily_sales_csv(day(2023, 1, 1), 90));
    let request = sales_request()
        .with_range(DateRange::new(day(2023, 2, 1), day(2023, 6, 1)).unwrap());

    let err = PipelineController::new(MlpForecaster::new())
        .run(&table, &request)
        .unwrap_err();

    assert_eq!(err.stage, PipelineStage::DateRange);
    assert!(matches!(err.error, ForecastError::DateRangeError(_)));
}

#[test]
fn test_chunks_longer_than_training_data() {
    let table = table_from(&daily_sales_csv(day(2023, 1, 1), 60));
    let request = sales_request().with_model(ModelConfig::new(40, 20, 5, 10));

    let mut controller = PipelineController::new(MlpForecaster::new());
    let err = controller.run(&table, &request).unwrap_err();

    assert_eq!(err.stage, PipelineStage::ModelConfig);
    assert!(matches!(err.error, ForecastError::ModelConfigError(_)));
    assert!(matches!(
        controller.state(),
        PipelineState::Failed {
            stage: PipelineStage::ModelConfig,
            ..
        }
    ));
}

#[test]
fn test_invalid_split_ratio() {
    let table = table_from(&daily_sales_csv(day(2023, 1, 1), 90));
    let request = sales_request().with_split_ratio(1.0);

    let err = PipelineController::new(MlpForecaster::new())
        .run(&table, &request)
        .unwrap_err();

    assert_eq!(err.stage, PipelineStage::Split);
}

#[test]
fn test_controller_handles_one_request() {
    let table = table_from(&daily_sales_csv(day(2023, 1, 1), 70));
    let request = sales_request().with_model(ModelConfig::new(7, 7, 1, 7));

    let mut controller = PipelineController::new(NaiveForecaster::last_value());
    controller.run(&table, &request).unwrap();

    let err = controller.run(&table, &request).unwrap_err();
    assert!(matches!(err.error, ForecastError::InvalidParameter(_)));
    assert_eq!(controller.state(), &PipelineState::Evaluated);
}

#[test]
fn test_request_json_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("request.json");
    let request = sales_request()
        .with_range(DateRange::new(day(2023, 1, 1), day(2023, 3, 31)).unwrap())
        .with_model(ModelConfig::new(21, 7, 40, 14))
        .with_split_ratio(0.75);

    request.save_json(&path).unwrap();
    let loaded = ForecastRequest::load_json(&path).unwrap();

    assert_eq!(loaded, request);
}

#[test]
fn test_request_json_defaults() {
    let request = ForecastRequest::from_json(
        r#"{"selection": {"identifier_column": "sku", "date_column": "day", "value_column": "units"}}"#,
    )
    .unwrap();

    assert_eq!(request.model, ModelConfig::default());
    assert_eq!(request.split_ratio, 0.8);
    assert_eq!(request.range, None);
    assert_eq!(request.training_timeout, None);
}

#[test]
fn test_zero_training_timeout_fails_at_model_config() {
    let table = table_from(&daily_sales_csv(day(2023, 1, 1), 90));
    let request = sales_request()
        .with_model(ModelConfig::new(30, 10, 5, 10))
        .with_training_timeout(TimeoutPolicy { per_epoch_ms: 0 });

    let err = PipelineController::new(MlpForecaster::new())
        .run(&table, &request)
        .unwrap_err();

    assert_eq!(err.stage, PipelineStage::ModelConfig);
    assert!(matches!(err.error, ForecastError::ModelConfigError(_)));
}

#[test]
fn test_controller_token_cancels_its_training() {
    let table = table_from(&daily_sales_csv(day(2023, 1, 1), 90));
    let request = sales_request().with_model(ModelConfig::new(30, 10, 5, 10));

    let mut controller = PipelineController::new(MlpForecaster::new());
    controller.cancellation_token().cancel();
    let err = controller.run(&table, &request).unwrap_err();

    assert_eq!(err.stage, PipelineStage::Training);
    assert!(matches!(
        err.error,
        ForecastError::TrainingCancelled {
            epochs_completed: 0
        }
    ));
}
