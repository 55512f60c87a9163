//! Date parsing, range filtering and daily regularization

use crate::data::{DateRange, RawTable};
use crate::error::{ForecastError, Result};
use crate::series::{NormalizedTable, SeriesBuilder, TimeSeries};
use crate::utils::date_parser;
use crate::warning::{PipelineWarning, WARNING_SAMPLE_ROWS};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Fewest daily points the forecasting models can be trained on
pub const MIN_SERIES_LENGTH: usize = 60;

/// Result of normalizing one table
#[derive(Debug, Clone)]
pub struct Normalized {
    pub table: NormalizedTable,
    pub warnings: Vec<PipelineWarning>,
}

/// Parsed rows of a table: usable (date, value) records plus the rows whose
/// date could not be read
#[derive(Debug, Clone, Default)]
pub struct ParsedRecords {
    date_column: String,
    value_column: String,
    records: Vec<(NaiveDate, f64)>,
    invalid_rows: Vec<usize>,
}

impl ParsedRecords {
    /// Smallest and largest parsed date, `None` when no date parsed
    pub fn observed_range(&self) -> Option<DateRange> {
        let start = self.records.iter().map(|(date, _)| *date).min()?;
        let end = self.records.iter().map(|(date, _)| *date).max()?;
        Some(DateRange { start, end })
    }

    /// Zero-based numbers of the rows whose date could not be parsed
    pub fn invalid_rows(&self) -> &[usize] {
        &self.invalid_rows
    }

    /// Number of rows with a usable date
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn warning(&self) -> Option<PipelineWarning> {
        if self.invalid_rows.is_empty() {
            return None;
        }

        Some(PipelineWarning::UnparseableDates {
            column: self.date_column.clone(),
            invalid_rows: self.invalid_rows.len(),
            sample_rows: self
                .invalid_rows
                .iter()
                .copied()
                .take(WARNING_SAMPLE_ROWS)
                .collect(),
        })
    }
}

/// Turns raw records into a gap-free daily table
#[derive(Debug, Clone, Copy, Default)]
pub struct TemporalNormalizer;

impl TemporalNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Smallest and largest parseable date of `date_column`, if any
    pub fn observed_range(table: &RawTable, date_column: &str) -> Result<Option<DateRange>> {
        let parsed = Self::parse_rows(table, date_column, None)?;
        Ok(parsed.observed_range())
    }

    /// Read the date and value columns once, keeping every usable record
    pub fn parse(table: &RawTable, date_column: &str, value_column: &str) -> Result<ParsedRecords> {
        Self::parse_rows(table, date_column, Some(value_column))
    }

    /// Check a requested range against the parsed dates
    ///
    /// Without parsed dates there is nothing to check against; normalization
    /// then fails on its own.
    pub fn check_range(parsed: &ParsedRecords, range: Option<DateRange>) -> Result<()> {
        if let (Some(range), Some(observed)) = (range, parsed.observed_range()) {
            range.check_within(&observed)?;
        }
        Ok(())
    }

    /// Normalize `table` and build the resulting series in one step
    pub fn normalize_series(
        &self,
        table: &RawTable,
        date_column: &str,
        value_column: &str,
        range: Option<DateRange>,
    ) -> Result<(TimeSeries, Vec<PipelineWarning>)> {
        let normalized = self.normalize(table, date_column, value_column, range)?;
        let series = SeriesBuilder::build(&normalized.table, value_column)?;
        Ok((series, normalized.warnings))
    }

    /// Parse dates, filter to `range`, sum per day and fill missing days with 0.0
    ///
    /// Rows with unparseable dates are excluded and reported in a single
    /// warning. Without a range the whole observed span is used.
    pub fn normalize(
        &self,
        table: &RawTable,
        date_column: &str,
        value_column: &str,
        range: Option<DateRange>,
    ) -> Result<Normalized> {
        let parsed = Self::parse(table, date_column, value_column)?;
        Self::check_range(&parsed, range)?;
        self.normalize_parsed(parsed, range)
    }

    /// Regularize records that were already parsed and range-checked
    pub fn normalize_parsed(
        &self,
        parsed: ParsedRecords,
        range: Option<DateRange>,
    ) -> Result<Normalized> {
        let mut warnings = Vec::new();
        if let Some(warning) = parsed.warning() {
            log::warn!("{}", warning);
            warnings.push(warning);
        }

        let Some(observed) = parsed.observed_range() else {
            return Err(ForecastError::InsufficientData {
                found: 0,
                required: MIN_SERIES_LENGTH,
            });
        };
        let range = range.unwrap_or(observed);

        let parsed_rows = parsed.records.len();
        let filtered: Vec<(NaiveDate, f64)> = parsed
            .records
            .into_iter()
            .filter(|(date, _)| range.contains(*date))
            .collect();
        log::debug!(
            "{} of {} parsed rows fall within {} to {}",
            filtered.len(),
            parsed_rows,
            range.start,
            range.end
        );

        let points = Self::regularize(&filtered);
        if points.len() < MIN_SERIES_LENGTH {
            return Err(ForecastError::InsufficientData {
                found: points.len(),
                required: MIN_SERIES_LENGTH,
            });
        }

        let (dates, values): (Vec<NaiveDate>, Vec<f64>) = points.into_iter().unzip();
        Ok(Normalized {
            table: NormalizedTable {
                value_column: parsed.value_column,
                dates,
                values,
            },
            warnings,
        })
    }

    /// Resample arbitrary (date, value) records onto a daily grid
    ///
    /// Same-day values are summed and days without records get 0.0, so a
    /// missing day and a zero-sales day are indistinguishable afterwards.
    /// The grid spans the smallest to the largest date present. Applying
    /// this to an already regular series returns it unchanged.
    pub fn regularize(records: &[(NaiveDate, f64)]) -> Vec<(NaiveDate, f64)> {
        let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for &(date, value) in records {
            *per_day.entry(date).or_insert(0.0) += value;
        }

        let (Some((&first, _)), Some((&last, _))) =
            (per_day.first_key_value(), per_day.last_key_value())
        else {
            return Vec::new();
        };

        first
            .iter_days()
            .take_while(|day| *day <= last)
            .map(|day| (day, per_day.get(&day).copied().unwrap_or(0.0)))
            .collect()
    }

    fn parse_rows(
        table: &RawTable,
        date_column: &str,
        value_column: Option<&str>,
    ) -> Result<ParsedRecords> {
        let dates = table.text_column(date_column)?;
        let values = match value_column {
            Some(column) => table.numeric_column(column)?,
            None => vec![None; dates.len()],
        };

        let mut parsed = ParsedRecords {
            date_column: date_column.to_string(),
            value_column: value_column.unwrap_or_default().to_string(),
            ..ParsedRecords::default()
        };
        for (row, (date, value)) in dates.iter().zip(values).enumerate() {
            match date.as_deref().and_then(date_parser::parse_date) {
                Some(date) => {
                    let value = value.filter(|v| v.is_finite()).unwrap_or(0.0);
                    parsed.records.push((date, value));
                }
                None => parsed.invalid_rows.push(row),
            }
        }

        Ok(parsed)
    }
}
