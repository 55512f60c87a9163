//! End-to-end orchestration of one forecasting request
//!
//! [`PipelineController`] walks a request through a fixed sequence of
//! states, one component call per transition:
//!
//! ```text
//! Uploaded -> ColumnsSelected -> RangeSelected -> Normalized -> Split
//!          -> ModelConfigured -> Trained -> Forecasted -> Evaluated
//! ```
//!
//! Any state may move to `Failed`. The controller stops at the first error
//! and returns it together with the stage it happened in, so a caller gets
//! either a complete [`PipelineOutcome`] or exactly one [`PipelineError`].

use crate::adapter::ForecastAdapter;
use crate::config::ForecastRequest;
use crate::data::RawTable;
use crate::error::{ForecastError, PipelineError, PipelineStage};
use crate::metrics::{Evaluator, MetricReport};
use crate::models::{CancellationToken, ForecastModel, ForecastResult};
use crate::normalize::TemporalNormalizer;
use crate::schema::SchemaValidator;
use crate::series::{SeriesBuilder, TimeSeries};
use crate::split::{Split, SplitPolicy};
use crate::warning::PipelineWarning;
use serde::{Deserialize, Serialize};

/// Where a request currently is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Uploaded,
    ColumnsSelected,
    RangeSelected,
    Normalized,
    Split,
    ModelConfigured,
    Trained,
    Forecasted,
    Evaluated,
    Failed { stage: PipelineStage, reason: String },
}

impl PipelineState {
    /// Position in the forward sequence; `None` for `Failed`
    fn order(&self) -> Option<u8> {
        Some(match self {
            PipelineState::Uploaded => 0,
            PipelineState::ColumnsSelected => 1,
            PipelineState::RangeSelected => 2,
            PipelineState::Normalized => 3,
            PipelineState::Split => 4,
            PipelineState::ModelConfigured => 5,
            PipelineState::Trained => 6,
            PipelineState::Forecasted => 7,
            PipelineState::Evaluated => 8,
            PipelineState::Failed { .. } => return None,
        })
    }

    /// `Evaluated` and `Failed` end a request
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineState::Evaluated | PipelineState::Failed { .. }
        )
    }
}

/// Everything a successful request produces, ready for charting and display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    /// Normalized daily series
    pub series: TimeSeries,
    pub split: Split,
    pub forecast: ForecastResult,
    pub metrics: MetricReport,
    /// Non-fatal issues found along the way
    pub warnings: Vec<PipelineWarning>,
    pub model_name: String,
}

/// Runs one request through validation, normalization, split, training,
/// forecasting and evaluation
#[derive(Debug)]
pub struct PipelineController<M: ForecastModel> {
    adapter: ForecastAdapter<M>,
    normalizer: TemporalNormalizer,
    cancel: CancellationToken,
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl<M: ForecastModel> PipelineController<M> {
    pub fn new(model: M) -> Self {
        Self {
            adapter: ForecastAdapter::new(model),
            normalizer: TemporalNormalizer::new(),
            cancel: CancellationToken::new(),
            state: PipelineState::Uploaded,
            history: vec![PipelineState::Uploaded],
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Every state entered so far, oldest first
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Cancels training of this controller's request from another thread
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Process `table` according to `request`
    ///
    /// A controller handles a single request; create a new one per upload.
    pub fn run(
        &mut self,
        table: &RawTable,
        request: &ForecastRequest,
    ) -> Result<PipelineOutcome, PipelineError> {
        if self.state != PipelineState::Uploaded {
            return Err(PipelineError::new(
                PipelineStage::Schema,
                ForecastError::InvalidParameter(format!(
                    "Controller already processed a request (state {:?}); create a new one",
                    self.state
                )),
            ));
        }

        let outcome = self.execute(table, request);
        if let Err(error) = &outcome {
            self.fail(error);
        }
        outcome
    }

    fn execute(
        &mut self,
        table: &RawTable,
        request: &ForecastRequest,
    ) -> Result<PipelineOutcome, PipelineError> {
        let validated =
            SchemaValidator::validate(table, &request.selection).map_err(at(PipelineStage::Schema))?;
        let mut warnings = validated.warnings().to_vec();
        let selection = validated.selection();
        self.advance(PipelineState::ColumnsSelected);

        let parsed =
            TemporalNormalizer::parse(table, &selection.date_column, &selection.value_column)
                .map_err(at(PipelineStage::DateRange))?;
        TemporalNormalizer::check_range(&parsed, request.range)
            .map_err(at(PipelineStage::DateRange))?;
        self.advance(PipelineState::RangeSelected);

        let normalized = self
            .normalizer
            .normalize_parsed(parsed, request.range)
            .map_err(at(PipelineStage::Normalize))?;
        let series = SeriesBuilder::build(&normalized.table, &selection.value_column)
            .map_err(at(PipelineStage::Normalize))?;
        warnings.extend(normalized.warnings);
        self.advance(PipelineState::Normalized);

        let split = SplitPolicy::new(request.split_ratio)
            .and_then(|policy| policy.split(&series))
            .map_err(at(PipelineStage::Split))?;
        log::info!(
            "Split {} points into {} train and {} test",
            series.len(),
            split.train.len(),
            split.test.len()
        );
        self.advance(PipelineState::Split);

        ForecastAdapter::<M>::check_config(&split.train, &request.model)
            .and_then(|()| match request.training_timeout {
                Some(timeout) => timeout.validate(),
                None => Ok(()),
            })
            .map_err(at(PipelineStage::ModelConfig))?;
        self.adapter.set_timeout(request.training_timeout);
        self.advance(PipelineState::ModelConfigured);

        let trained = self
            .adapter
            .fit_in_background_with(&split.train, &request.model, self.cancel.clone())
            .and_then(|handle| handle.wait())
            .map_err(at(PipelineStage::Training))?;
        self.advance(PipelineState::Trained);

        let forecast = self
            .adapter
            .predict(&trained, request.model.forecast_horizon)
            .map_err(at(PipelineStage::Forecast))?;
        self.advance(PipelineState::Forecasted);

        let metrics =
            Evaluator::evaluate(&split.test, &forecast).map_err(at(PipelineStage::Evaluate))?;
        log::info!("MAE {:.4}, RMSE {:.4}", metrics.mae, metrics.rmse);
        self.advance(PipelineState::Evaluated);

        Ok(PipelineOutcome {
            series,
            split,
            forecast,
            metrics,
            warnings,
            model_name: self.adapter.model_name().to_string(),
        })
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            next.order() > self.state.order(),
            "pipeline may only move forward"
        );
        log::info!("Pipeline: {:?} -> {:?}", self.state, next);
        self.state = next.clone();
        self.history.push(next);
    }

    fn fail(&mut self, error: &PipelineError) {
        log::error!("Pipeline failed: {}", error);
        let failed = PipelineState::Failed {
            stage: error.stage,
            reason: error.error.to_string(),
        };
        self.state = failed.clone();
        self.history.push(failed);
    }
}

fn at(stage: PipelineStage) -> impl FnOnce(ForecastError) -> PipelineError {
    move |error| PipelineError::new(stage, error)
}
