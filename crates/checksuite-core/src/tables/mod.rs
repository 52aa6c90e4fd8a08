//! Tabular views consumed by checks.
//!
//! Checks never touch files or Arrow batches directly: they go through
//! [`TabularView`], which exposes just enough of a dataset to sample it,
//! project columns and report original row labels.

use std::fmt;

use arrow::array::ArrayRef;
use serde::Serialize;

use crate::errors::CheckError;

pub mod dataset;

pub use dataset::Dataset;

/// Caller-facing identity of a column.
///
/// Columns read without a header name are anonymous and identified by
/// their position, which is what the user sees in reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ColumnId {
    Named(String),
    Anonymous(usize),
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnId::Named(name) => write!(f, "{}", name),
            ColumnId::Anonymous(position) => write!(f, "{}", position),
        }
    }
}

impl From<&str> for ColumnId {
    fn from(value: &str) -> Self {
        ColumnId::Named(value.to_string())
    }
}

impl From<String> for ColumnId {
    fn from(value: String) -> Self {
        ColumnId::Named(value)
    }
}

impl From<usize> for ColumnId {
    fn from(value: usize) -> Self {
        ColumnId::Anonymous(value)
    }
}

/// Original identifier of a row (its index label, not its position).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RowLabel {
    Int(i64),
    Text(String),
}

impl fmt::Display for RowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowLabel::Int(i) => write!(f, "{}", i),
            RowLabel::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RowLabel {
    fn from(value: i64) -> Self {
        RowLabel::Int(value)
    }
}

impl From<&str> for RowLabel {
    fn from(value: &str) -> Self {
        RowLabel::Text(value.to_string())
    }
}

pub trait TabularView {
    /// Number of rows in the view.
    fn row_count(&self) -> usize;

    /// Deterministic sample of at most `n` rows drawn without replacement.
    fn sample(&self, n: usize, seed: u64) -> Result<Self, CheckError>
    where
        Self: Sized;

    /// Ordered column identifiers.
    fn columns(&self) -> Vec<ColumnId>;

    /// Arrays of the requested columns, in the requested order.
    fn projected_values(&self, columns: &[ColumnId]) -> Result<Vec<ArrayRef>, CheckError>;

    /// Row labels aligned with the rows of the view.
    fn row_identifiers(&self) -> &[RowLabel];

    /// Whether checks should build their rich display.
    fn with_display_enabled(&self) -> bool;

    /// Resolve the columns a check should look at.
    ///
    /// `columns` keeps exactly the listed columns in the given order (repeated
    /// entries collapse), `ignore_columns` keeps everything else. Giving both
    /// is an error, and so is naming a column the view does not have.
    fn select_columns(
        &self,
        columns: Option<&[ColumnId]>,
        ignore_columns: Option<&[ColumnId]>,
    ) -> Result<Vec<ColumnId>, CheckError> {
        let available = self.columns();
        let ensure_exist = |requested: &[ColumnId]| -> Result<(), CheckError> {
            let missing: Vec<String> = requested
                .iter()
                .filter(|c| !available.contains(c))
                .map(|c| format!("'{}'", c))
                .collect();
            match missing.len() {
                0 => Ok(()),
                1 => Err(CheckError::Value(format!(
                    "Given column {} does not exist",
                    missing[0]
                ))),
                _ => Err(CheckError::Value(format!(
                    "Given columns [{}] do not exist",
                    missing.join(", ")
                ))),
            }
        };

        match (columns, ignore_columns) {
            (Some(_), Some(_)) => Err(CheckError::Value(
                "Cannot receive both `columns` and `ignore_columns` arguments".to_string(),
            )),
            (Some(columns), None) => {
                ensure_exist(columns)?;
                let mut selected: Vec<ColumnId> = Vec::with_capacity(columns.len());
                for column in columns {
                    if !selected.contains(column) {
                        selected.push(column.clone());
                    }
                }
                Ok(selected)
            }
            (None, Some(ignored)) => {
                ensure_exist(ignored)?;
                Ok(available
                    .iter()
                    .filter(|c| !ignored.contains(c))
                    .cloned()
                    .collect())
            }
            (None, None) => Ok(self.columns()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_id_display() {
        assert_eq!(ColumnId::from("price").to_string(), "price");
        assert_eq!(ColumnId::from(0usize).to_string(), "0");
    }

    #[test]
    fn test_row_label_display() {
        assert_eq!(RowLabel::from(7).to_string(), "7");
        assert_eq!(RowLabel::from("row-a").to_string(), "row-a");
    }
}
