//! Feed-forward neural sequence model
//!
//! A one-hidden-layer perceptron maps `input_chunk_length` past values to
//! `output_chunk_length` future values. It is trained with plain stochastic
//! gradient descent on every sliding window of the training series, one
//! epoch being one pass over all windows in shuffled order. Inputs and
//! targets are z-scored with statistics of the training series.

use crate::config::ModelConfig;
use crate::error::{ForecastError, Result};
use crate::models::{
    forecast_recursively, next_period, CancellationToken, ForecastModel, ForecastResult,
    TrainedForecastModel,
};
use crate::series::TimeSeries;
use chrono::NaiveDate;
use forecast_math::StandardScaler;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use statrs::statistics::Statistics;

/// Largest absolute output error used for a gradient step
const ERROR_CLIP: f64 = 5.0;

/// Neural sequence forecaster
#[derive(Debug, Clone)]
pub struct MlpForecaster {
    /// Name of the model
    name: String,
    hidden_units: usize,
    learning_rate: f64,
    seed: u64,
}

/// Trained neural sequence forecaster
#[derive(Debug, Clone)]
pub struct TrainedMlpForecaster {
    name: String,
    network: Network,
    scaler: StandardScaler,
    /// Last `input_chunk_length` scaled training values
    history: Vec<f64>,
    next_date: NaiveDate,
    loss_history: Vec<f64>,
}

/// Weights of the two dense layers, row-major
#[derive(Debug, Clone)]
struct Network {
    inputs: usize,
    hidden: usize,
    outputs: usize,
    w1: Vec<f64>,
    b1: Vec<f64>,
    w2: Vec<f64>,
    b2: Vec<f64>,
}

impl Default for MlpForecaster {
    fn default() -> Self {
        Self {
            name: "Neural sequence forecaster (hidden=32)".to_string(),
            hidden_units: 32,
            learning_rate: 0.01,
            seed: 42,
        }
    }
}

impl MlpForecaster {
    /// Create a forecaster with 32 hidden units, learning rate 0.01 and seed 42
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hidden_units(mut self, hidden_units: usize) -> Result<Self> {
        if hidden_units == 0 {
            return Err(ForecastError::InvalidParameter(
                "Hidden layer must have at least one unit".to_string(),
            ));
        }
        self.hidden_units = hidden_units;
        self.name = format!("Neural sequence forecaster (hidden={})", hidden_units);
        Ok(self)
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Result<Self> {
        if !(learning_rate > 0.0 && learning_rate.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "Learning rate must be positive and finite, got {}",
                learning_rate
            )));
        }
        self.learning_rate = learning_rate;
        Ok(self)
    }

    /// Seed for weight initialization and window shuffling
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl ForecastModel for MlpForecaster {
    type Trained = TrainedMlpForecaster;

    fn train(
        &self,
        series: &TimeSeries,
        config: &ModelConfig,
        cancel: &CancellationToken,
    ) -> Result<Self::Trained> {
        let inputs = config.input_chunk_length;
        let outputs = config.output_chunk_length;
        let values = series.values();
        if inputs == 0 || outputs == 0 || values.len() < inputs + outputs {
            return Err(ForecastError::ModelConfigError(format!(
                "{} training points can't fill one window of {} inputs and {} outputs",
                values.len(),
                inputs,
                outputs
            )));
        }

        let scaler = StandardScaler::new(values.mean(), values.std_dev())?;
        let scaled = scaler.transform_all(values);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut network = Network::initialize(inputs, self.hidden_units, outputs, &mut rng)?;

        let mut window_starts: Vec<usize> = (0..=scaled.len() - inputs - outputs).collect();
        let mut loss_history = Vec::with_capacity(config.epochs);

        for epoch in 0..config.epochs {
            if cancel.is_cancelled() {
                log::info!("{} cancelled after {} epochs", self.name, epoch);
                return Err(ForecastError::TrainingCancelled {
                    epochs_completed: epoch,
                });
            }

            window_starts.shuffle(&mut rng);
            let mut epoch_loss = 0.0;
            for &start in &window_starts {
                let input = &scaled[start..start + inputs];
                let target = &scaled[start + inputs..start + inputs + outputs];
                epoch_loss += network.train_step(input, target, self.learning_rate);
            }
            epoch_loss /= window_starts.len() as f64;

            if !epoch_loss.is_finite() {
                return Err(ForecastError::ModelError(format!(
                    "Training diverged at epoch {}",
                    epoch + 1
                )));
            }

            log::debug!("{} epoch {}: loss {:.6}", self.name, epoch + 1, epoch_loss);
            loss_history.push(epoch_loss);
        }

        Ok(TrainedMlpForecaster {
            name: self.name.clone(),
            network,
            scaler,
            history: scaled[scaled.len() - inputs..].to_vec(),
            next_date: next_period(series)?,
            loss_history,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedMlpForecaster {
    /// Mean squared training error (scaled units) after each epoch
    pub fn loss_history(&self) -> &[f64] {
        &self.loss_history
    }
}

impl TrainedForecastModel for TrainedMlpForecaster {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        let scaled = forecast_recursively(&self.history, self.network.inputs, horizon, |window| {
            Ok(self.network.forward(window).1)
        })?;

        ForecastResult::new(self.next_date, self.scaler.inverse_all(&scaled), horizon)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Network {
    fn initialize(inputs: usize, hidden: usize, outputs: usize, rng: &mut StdRng) -> Result<Self> {
        // He initialization for the ReLU layer, Xavier-style for the linear head
        let first = Normal::new(0.0, (2.0 / inputs as f64).sqrt())
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        let second = Normal::new(0.0, (1.0 / hidden as f64).sqrt())
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;

        Ok(Self {
            inputs,
            hidden,
            outputs,
            w1: (0..hidden * inputs).map(|_| first.sample(rng)).collect(),
            b1: vec![0.0; hidden],
            w2: (0..outputs * hidden).map(|_| second.sample(rng)).collect(),
            b2: vec![0.0; outputs],
        })
    }

    /// Hidden activations and outputs for one input window
    fn forward(&self, input: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let hidden: Vec<f64> = (0..self.hidden)
            .map(|h| {
                let row = &self.w1[h * self.inputs..(h + 1) * self.inputs];
                let z = self.b1[h] + dot(row, input);
                z.max(0.0)
            })
            .collect();

        let output = (0..self.outputs)
            .map(|o| {
                let row = &self.w2[o * self.hidden..(o + 1) * self.hidden];
                self.b2[o] + dot(row, &hidden)
            })
            .collect();

        (hidden, output)
    }

    /// One gradient step on a single window; returns its squared error
    fn train_step(&mut self, input: &[f64], target: &[f64], learning_rate: f64) -> f64 {
        let (hidden, output) = self.forward(input);

        let errors: Vec<f64> = output.iter().zip(target).map(|(y, t)| y - t).collect();
        let loss = errors.iter().map(|e| e * e).sum::<f64>() / self.outputs as f64;

        let output_grad: Vec<f64> = errors
            .iter()
            .map(|e| 2.0 * e.clamp(-ERROR_CLIP, ERROR_CLIP) / self.outputs as f64)
            .collect();

        // Back-propagate into the hidden layer before the head is updated
        let mut hidden_grad = vec![0.0; self.hidden];
        for (o, grad) in output_grad.iter().enumerate() {
            let row = &self.w2[o * self.hidden..(o + 1) * self.hidden];
            for (h, weight) in row.iter().enumerate() {
                hidden_grad[h] += grad * weight;
            }
        }
        for (h, activation) in hidden.iter().enumerate() {
            if *activation <= 0.0 {
                hidden_grad[h] = 0.0;
            }
        }

        for (o, grad) in output_grad.iter().enumerate() {
            let row = &mut self.w2[o * self.hidden..(o + 1) * self.hidden];
            for (weight, activation) in row.iter_mut().zip(&hidden) {
                *weight -= learning_rate * grad * activation;
            }
            self.b2[o] -= learning_rate * grad;
        }

        for (h, grad) in hidden_grad.iter().enumerate() {
            if *grad == 0.0 {
                continue;
            }
            let row = &mut self.w1[h * self.inputs..(h + 1) * self.inputs];
            for (weight, x) in row.iter_mut().zip(input) {
                *weight -= learning_rate * grad * x;
            }
            self.b1[h] -= learning_rate * grad;
        }

        loss
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
