//! Column selection validation

use crate::data::{ColumnSelection, RawTable};
use crate::error::{ForecastError, Result};
use crate::warning::PipelineWarning;

/// A table whose column selection has been checked once
#[derive(Debug, Clone)]
pub struct ValidatedTable<'a> {
    table: &'a RawTable,
    selection: ColumnSelection,
    warnings: Vec<PipelineWarning>,
}

impl<'a> ValidatedTable<'a> {
    pub fn table(&self) -> &'a RawTable {
        self.table
    }

    pub fn selection(&self) -> &ColumnSelection {
        &self.selection
    }

    /// Non-fatal findings about the selection
    pub fn warnings(&self) -> &[PipelineWarning] {
        &self.warnings
    }
}

/// Confirms that the selected columns exist and are usable
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validate `selection` against the table header
    pub fn validate<'a>(
        table: &'a RawTable,
        selection: &ColumnSelection,
    ) -> Result<ValidatedTable<'a>> {
        let header = table.columns();

        let missing: Vec<&str> = selection
            .names()
            .into_iter()
            .filter(|name| !table.has_column(name))
            .collect();
        if !missing.is_empty() {
            return Err(ForecastError::SchemaError(format!(
                "Column(s) {} not found; available columns: {}",
                quoted(&missing),
                quoted(&header.iter().map(String::as_str).collect::<Vec<_>>())
            )));
        }

        let [identifier, date, value] = selection.names();
        if identifier == date || identifier == value || date == value {
            return Err(ForecastError::SchemaError(format!(
                "Identifier, date and value columns must be distinct, got '{}', '{}', '{}'",
                identifier, date, value
            )));
        }

        if table.is_empty() {
            return Err(ForecastError::SchemaError(
                "Table has a header but no records".to_string(),
            ));
        }

        let numeric_cells = table
            .numeric_column(value)?
            .into_iter()
            .filter(|cell| cell.is_some())
            .count();
        if numeric_cells == 0 {
            return Err(ForecastError::SchemaError(format!(
                "Value column '{}' contains no numeric values",
                value
            )));
        }

        let mut warnings = Vec::new();
        let distinct = table.distinct_count(identifier)?;
        if distinct > 1 {
            log::warn!(
                "Identifier column '{}' has {} distinct values; forecasting their sum",
                identifier,
                distinct
            );
            warnings.push(PipelineWarning::MixedIdentifiers {
                column: identifier.to_string(),
                distinct,
            });
        }

        Ok(ValidatedTable {
            table,
            selection: selection.clone(),
            warnings,
        })
    }
}

fn quoted(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("'{}'", name))
        .collect::<Vec<_>>()
        .join(", ")
}
