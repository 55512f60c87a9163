//! Tabular input handling for forecasting

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Cursor;
use std::path::Path;

/// Uploaded sales records, one row per record
///
/// Columns keep whatever types polars inferred; the pipeline reads the date
/// column back as text and the value column as `f64`.
#[derive(Debug, Clone)]
pub struct RawTable {
    df: DataFrame,
}

/// Data loader for raw tabular data
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a table from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<RawTable> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df)
    }

    /// Load a table from in-memory CSV content, such as an uploaded file
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<RawTable> {
        let df = CsvReader::new(Cursor::new(bytes.into()))
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df)
    }

    /// Wrap an existing DataFrame
    pub fn from_dataframe(df: DataFrame) -> Result<RawTable> {
        if df.width() == 0 {
            return Err(ForecastError::DataError(
                "Table has no columns".to_string(),
            ));
        }

        log::debug!("Loaded table with {} rows and {} columns", df.height(), df.width());
        Ok(RawTable { df })
    }
}

impl RawTable {
    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Header names in file order
    pub fn columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Check whether a column with this exact name exists
    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_names().contains(&name)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Check if the table has no records
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Read a column as text, one entry per row; missing cells are `None`
    pub fn text_column(&self, name: &str) -> Result<Vec<Option<String>>> {
        let col = self.column(name)?;
        let as_text = col.cast(&DataType::Utf8)?;

        Ok(as_text
            .utf8()?
            .into_iter()
            .map(|cell| cell.map(str::to_string))
            .collect())
    }

    /// Read a column as numbers, one entry per row; missing or non-numeric
    /// cells are `None`
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let col = self.column(name)?;
        let as_float = col.cast(&DataType::Float64)?;

        Ok(as_float.f64()?.into_iter().collect())
    }

    /// Number of distinct values in a column, missing cells included
    pub fn distinct_count(&self, name: &str) -> Result<usize> {
        Ok(self.column(name)?.n_unique()?)
    }

    fn column(&self, name: &str) -> Result<&Series> {
        self.df.column(name).map_err(|e| {
            ForecastError::SchemaError(format!("Column '{}' not found: {}", name, e))
        })
    }
}

/// The three columns a caller picks from the table header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSelection {
    /// Product / item identifier; validated but not used by the forecast
    pub identifier_column: String,
    /// Transaction date
    pub date_column: String,
    /// Quantity to forecast (e.g. units sold)
    pub value_column: String,
}

impl ColumnSelection {
    pub fn new(
        identifier_column: impl Into<String>,
        date_column: impl Into<String>,
        value_column: impl Into<String>,
    ) -> Self {
        Self {
            identifier_column: identifier_column.into(),
            date_column: date_column.into(),
            value_column: value_column.into(),
        }
    }

    /// The selected names in identifier, date, value order
    pub fn names(&self) -> [&str; 3] {
        [
            &self.identifier_column,
            &self.date_column,
            &self.value_column,
        ]
    }
}

/// Inclusive calendar range used to filter records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ForecastError::DateRangeError(format!(
                "Start date {} is after end date {}",
                start, end
            )));
        }

        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Check that `self` lies within `bounds`
    pub fn check_within(&self, bounds: &DateRange) -> Result<()> {
        if self.start > self.end {
            return Err(ForecastError::DateRangeError(format!(
                "Start date {} is after end date {}",
                self.start, self.end
            )));
        }

        if !bounds.contains(self.start) || !bounds.contains(self.end) {
            return Err(ForecastError::DateRangeError(format!(
                "Range {} to {} is outside the data's dates {} to {}",
                self.start, self.end, bounds.start, bounds.end
            )));
        }

        Ok(())
    }

    /// Number of calendar days covered, both ends included
    pub fn days(&self) -> usize {
        crate::utils::inclusive_day_span(self.start, self.end)
    }
}
