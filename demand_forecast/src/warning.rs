//! Non-fatal issues reported alongside successful results

use serde::{Deserialize, Serialize};
use std::fmt;

/// How many offending row numbers a warning keeps for display
pub const WARNING_SAMPLE_ROWS: usize = 10;

/// A problem that loses or merges some data without stopping the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineWarning {
    /// Date cells that could not be parsed; those rows were excluded
    UnparseableDates {
        column: String,
        invalid_rows: usize,
        /// Zero-based row numbers of the first offending records
        sample_rows: Vec<usize>,
    },
    /// The identifier column holds several products whose values are summed
    MixedIdentifiers { column: String, distinct: usize },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineWarning::UnparseableDates {
                column,
                invalid_rows,
                sample_rows,
            } => {
                write!(
                    f,
                    "{} rows have invalid dates in the '{}' column and were skipped",
                    invalid_rows, column
                )?;
                if !sample_rows.is_empty() {
                    let rows: Vec<String> = sample_rows.iter().map(|r| r.to_string()).collect();
                    write!(f, " (rows {}", rows.join(", "))?;
                    if *invalid_rows > sample_rows.len() {
                        write!(f, ", ...")?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
            PipelineWarning::MixedIdentifiers { column, distinct } => write!(
                f,
                "'{}' holds {} distinct identifiers; their values are summed into one series",
                column, distinct
            ),
        }
    }
}
