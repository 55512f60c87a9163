//! Naive benchmark forecasters

use crate::config::ModelConfig;
use crate::error::{ForecastError, Result};
use crate::models::{
    forecast_recursively, next_period, CancellationToken, ForecastModel, ForecastResult,
    TrainedForecastModel,
};
use crate::series::TimeSeries;
use chrono::NaiveDate;

/// Repeats the most recent observation, or the most recent season
///
/// With a season of 1 every forecast equals the last training value; with a
/// season of 7 each weekday repeats its value from the last week.
#[derive(Debug, Clone)]
pub struct NaiveForecaster {
    name: String,
    season: usize,
}

/// Trained naive forecaster
#[derive(Debug, Clone)]
pub struct TrainedNaiveForecaster {
    name: String,
    last_season: Vec<f64>,
    next_date: NaiveDate,
}

impl NaiveForecaster {
    /// Forecast every period with the last observed value
    pub fn last_value() -> Self {
        Self {
            name: "Naive (last value)".to_string(),
            season: 1,
        }
    }

    /// Forecast each period with the value one season earlier
    pub fn seasonal(season: usize) -> Result<Self> {
        if season == 0 {
            return Err(ForecastError::InvalidParameter(
                "Season length must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Seasonal naive (season={})", season),
            season,
        })
    }

    pub fn season(&self) -> usize {
        self.season
    }
}

impl ForecastModel for NaiveForecaster {
    type Trained = TrainedNaiveForecaster;

    fn train(
        &self,
        series: &TimeSeries,
        _config: &ModelConfig,
        _cancel: &CancellationToken,
    ) -> Result<Self::Trained> {
        let values = series.values();
        if values.len() < self.season {
            return Err(ForecastError::ModelConfigError(format!(
                "Need at least one full season of {} points, have {}",
                self.season,
                values.len()
            )));
        }

        Ok(TrainedNaiveForecaster {
            name: self.name.clone(),
            last_season: values[values.len() - self.season..].to_vec(),
            next_date: next_period(series)?,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedNaiveForecaster {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        let season = self.last_season.len();
        let values = forecast_recursively(&self.last_season, season, horizon, |window| {
            Ok(window.to_vec())
        })?;

        ForecastResult::new(self.next_date, values, horizon)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
