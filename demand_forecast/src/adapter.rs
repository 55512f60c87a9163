//! Fit/predict boundary around forecasting models
//!
//! The adapter checks model settings against the training data before any
//! work starts, runs training (optionally on a worker thread with a time
//! budget) and turns every model failure into a typed [`ForecastError`].

use crate::config::{ModelConfig, TimeoutPolicy};
use crate::error::{ForecastError, Result};
use crate::models::{CancellationToken, ForecastModel, ForecastResult, TrainedForecastModel};
use crate::series::TimeSeries;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Wraps a [`ForecastModel`] behind a fixed fit/predict interface
///
/// Every training run gets its own [`CancellationToken`], so cancelling or
/// timing out one run never affects later runs on the same adapter.
#[derive(Debug, Clone)]
pub struct ForecastAdapter<M: ForecastModel> {
    model: M,
    timeout: Option<TimeoutPolicy>,
}

impl<M: ForecastModel> ForecastAdapter<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            timeout: None,
        }
    }

    /// Bound background training by `epochs * per_epoch`
    pub fn with_timeout(mut self, timeout: TimeoutPolicy) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn set_timeout(&mut self, timeout: Option<TimeoutPolicy>) {
        self.timeout = timeout;
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Check `config` against the training segment without training
    pub fn check_config(train: &TimeSeries, config: &ModelConfig) -> Result<()> {
        config.validate()?;

        if train.len() < config.min_training_length() {
            return Err(ForecastError::ModelConfigError(format!(
                "Training segment has {} points but input_chunk_length ({}) + output_chunk_length ({}) needs {}",
                train.len(),
                config.input_chunk_length,
                config.output_chunk_length,
                config.min_training_length()
            )));
        }

        Ok(())
    }

    /// Train on the calling thread
    pub fn fit(&self, train: &TimeSeries, config: &ModelConfig) -> Result<M::Trained> {
        Self::check_config(train, config)?;
        run_training(&self.model, train, config, &CancellationToken::new())
    }

    /// Train on a dedicated worker thread with a fresh cancellation token
    ///
    /// Validation happens before the worker starts, so configuration errors
    /// are returned here rather than from [`TrainingHandle::wait`].
    pub fn fit_in_background(
        &self,
        train: &TimeSeries,
        config: &ModelConfig,
    ) -> Result<TrainingHandle<M::Trained>> {
        self.fit_in_background_with(train, config, CancellationToken::new())
    }

    /// Same as [`ForecastAdapter::fit_in_background`], stopped through `cancel`
    pub fn fit_in_background_with(
        &self,
        train: &TimeSeries,
        config: &ModelConfig,
        cancel: CancellationToken,
    ) -> Result<TrainingHandle<M::Trained>> {
        Self::check_config(train, config)?;
        if let Some(timeout) = self.timeout {
            timeout.validate()?;
        }

        let model = self.model.clone();
        let series = train.clone();
        let settings = *config;
        let worker_cancel = cancel.clone();
        let (sender, receiver) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("forecast-training".to_string())
            .spawn(move || {
                let outcome = run_training(&model, &series, &settings, &worker_cancel);
                // The receiver is gone if the caller stopped waiting
                let _ = sender.send(outcome);
            })?;

        Ok(TrainingHandle {
            receiver,
            worker: Some(worker),
            cancel,
            model_name: self.model.name().to_string(),
            budget: self.timeout.map(|policy| policy.budget(config.epochs)),
            started: Instant::now(),
        })
    }

    /// Forecast exactly `horizon` periods after the training segment
    pub fn predict(&self, trained: &M::Trained, horizon: usize) -> Result<ForecastResult> {
        if horizon == 0 {
            return Err(ForecastError::ModelConfigError(
                "forecast_horizon must be a positive integer".to_string(),
            ));
        }

        let forecast = panic::catch_unwind(AssertUnwindSafe(|| trained.forecast(horizon)))
            .map_err(|payload| {
                ForecastError::ModelError(format!(
                    "Forecast panicked: {}",
                    panic_message(payload.as_ref())
                ))
            })
            .and_then(|outcome| outcome)
            .map_err(|e| wrap_model_error(trained.name(), e))?;

        if forecast.len() != horizon {
            return Err(wrap_model_error(
                trained.name(),
                ForecastError::ModelError(format!(
                    "Model returned {} values for a horizon of {}",
                    forecast.len(),
                    horizon
                )),
            ));
        }

        if let Some(position) = forecast.values().iter().position(|v| !v.is_finite()) {
            return Err(wrap_model_error(
                trained.name(),
                ForecastError::ModelError(format!(
                    "Forecast value {} is not finite",
                    position
                )),
            ));
        }

        Ok(forecast)
    }
}

/// A training run on a worker thread
#[derive(Debug)]
pub struct TrainingHandle<T> {
    receiver: Receiver<Result<T>>,
    worker: Option<JoinHandle<()>>,
    cancel: CancellationToken,
    model_name: String,
    budget: Option<Duration>,
    started: Instant,
}

impl<T> TrainingHandle<T> {
    /// Ask the worker to stop at its next epoch boundary
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token of this run only
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, |worker| worker.is_finished())
    }

    /// Time budget for this run, if any
    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    /// Block until training finishes, fails, is cancelled or runs out of time
    pub fn wait(mut self) -> Result<T> {
        let received = match self.budget {
            Some(budget) => {
                let remaining = budget.saturating_sub(self.started.elapsed());
                match self.receiver.recv_timeout(remaining) {
                    Ok(outcome) => Some(outcome),
                    Err(RecvTimeoutError::Timeout) => {
                        // Partial training is discarded; the worker exits at the next epoch
                        self.cancel.cancel();
                        log::warn!("{} exceeded its training budget of {:?}", self.model_name, budget);
                        return Err(ForecastError::TrainingTimeout(budget));
                    }
                    Err(RecvTimeoutError::Disconnected) => None,
                }
            }
            None => self.receiver.recv().ok(),
        };

        if let Some(worker) = self.worker.take() {
            if let Err(payload) = worker.join() {
                return Err(wrap_model_error(
                    &self.model_name,
                    ForecastError::ModelError(format!(
                        "Training worker panicked: {}",
                        panic_message(payload.as_ref())
                    )),
                ));
            }
        }

        received.unwrap_or_else(|| {
            Err(wrap_model_error(
                &self.model_name,
                ForecastError::ModelError("Training worker exited without a result".to_string()),
            ))
        })
    }
}

impl<T> Drop for TrainingHandle<T> {
    fn drop(&mut self) {
        // Nobody can collect the result any more
        if !self.is_finished() {
            log::debug!("Dropping unfinished training run of {}", self.model_name);
            self.cancel.cancel();
        }
    }
}

fn run_training<M: ForecastModel>(
    model: &M,
    train: &TimeSeries,
    config: &ModelConfig,
    cancel: &CancellationToken,
) -> Result<M::Trained> {
    let started = Instant::now();
    let trained = model
        .train(train, config, cancel)
        .map_err(|e| wrap_model_error(model.name(), e))?;

    log::info!(
        "Trained {} on {} points for {} epochs in {:.2?}",
        model.name(),
        train.len(),
        config.epochs,
        started.elapsed()
    );
    Ok(trained)
}

/// Keep typed pipeline errors, wrap everything else as a training failure
fn wrap_model_error(model: &str, error: ForecastError) -> ForecastError {
    match error {
        ForecastError::ModelConfigError(_)
        | ForecastError::TrainingCancelled { .. }
        | ForecastError::TrainingTimeout(_)
        | ForecastError::TrainingFailure { .. } => error,
        other => ForecastError::TrainingFailure {
            model: model.to_string(),
            source: Box::new(other),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
