use chrono::{Days, NaiveDate};
use demand_forecast::config::{ForecastRequest, ModelConfig, TimeoutPolicy};
use demand_forecast::data::{ColumnSelection, DataLoader};
use demand_forecast::models::neural::MlpForecaster;
use demand_forecast::pipeline::PipelineController;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Demand Forecast: Sales Forecast Example");
    println!("=======================================\n");

    // Load data: a CSV path from the command line, or generated sample sales
    let table = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading {}...", path);
            DataLoader::from_csv(path)?
        }
        None => {
            println!("Creating sample data...");
            DataLoader::from_bytes(create_sample_sales_csv(120))?
        }
    };
    println!("Table has {} rows: {:?}\n", table.len(), table.columns());

    let request = ForecastRequest::new(ColumnSelection::new("product_id", "date", "sales"))
        .with_model(ModelConfig::new(28, 7, 60, 14))
        .with_training_timeout(TimeoutPolicy::per_epoch(Duration::from_millis(500)));

    println!("Running pipeline...");
    let mut controller = PipelineController::new(MlpForecaster::new().with_seed(7));
    let outcome = controller.run(&table, &request)?;

    for warning in &outcome.warnings {
        println!("Warning: {}", warning);
    }

    println!(
        "\nSeries: {} days, train {} / test {}",
        outcome.series.len(),
        outcome.split.train.len(),
        outcome.split.test.len()
    );
    println!("Model: {}\n", outcome.model_name);

    println!("Date        Forecast    Actual");
    for (i, (date, predicted)) in outcome
        .forecast
        .dates()
        .into_iter()
        .zip(outcome.forecast.values())
        .enumerate()
    {
        let actual = outcome
            .split
            .test
            .values()
            .get(i)
            .map(|v| format!("{:8.2}", v))
            .unwrap_or_default();
        println!("{}  {:8.2}  {}", date, predicted, actual);
    }

    println!("\n{}", outcome.metrics);
    Ok(())
}

/// Daily sales with a weekly pattern, a slow trend and a few broken dates
fn create_sample_sales_csv(days: u64) -> Vec<u8> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MIN);
    let mut csv = String::from("product_id,date,sales\n");

    for i in 0..days {
        let date = match i {
            17 | 54 => "unknown".to_string(),
            _ => start
                .checked_add_days(Days::new(i))
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        };
        let weekday_boost = [0.0, 2.0, 4.0, 3.0, 6.0, 12.0, 9.0][(i % 7) as usize];
        let sales = 40.0 + weekday_boost + i as f64 * 0.15;
        csv.push_str(&format!("P001,{},{:.1}\n", date, sales));
    }

    csv.into_bytes()
}
