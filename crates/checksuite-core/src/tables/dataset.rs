use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, UInt64Array};
use arrow::compute::{self, CastOptions};
use arrow::datatypes::{DataType, Int64Type, SchemaRef};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use rand::{rngs::StdRng, SeedableRng};
use tracing::debug;

use crate::errors::CheckError;
use crate::tables::{ColumnId, RowLabel, TabularView};

/// In-memory dataset backed by a single Arrow `RecordBatch`.
///
/// Row labels travel with their rows through sampling and filtering, so
/// evidence produced on a sample still points at the original rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    batch: RecordBatch,
    index: Arc<[RowLabel]>,
    index_name: Option<String>,
    with_display: bool,
}

impl Dataset {
    /// Create a dataset labelled `0..n`.
    pub fn new(name: impl Into<String>, batch: RecordBatch) -> Self {
        let index: Vec<RowLabel> = (0..batch.num_rows() as i64).map(RowLabel::Int).collect();
        Self {
            name: name.into(),
            batch,
            index: index.into(),
            index_name: None,
            with_display: true,
        }
    }

    /// Concatenate reader batches into a single dataset.
    pub fn from_batches(
        name: impl Into<String>,
        schema: SchemaRef,
        batches: &[RecordBatch],
    ) -> Result<Self, CheckError> {
        let batch = compute::concat_batches(&schema, batches)?;
        Ok(Self::new(name, batch))
    }

    /// Replace the row labels. The label count must match the row count.
    pub fn with_index(mut self, labels: Vec<RowLabel>) -> Result<Self, CheckError> {
        if labels.len() != self.batch.num_rows() {
            return Err(CheckError::Value(format!(
                "Index has {} labels but dataset '{}' has {} rows",
                labels.len(),
                self.name,
                self.batch.num_rows()
            )));
        }
        self.index = labels.into();
        Ok(self)
    }

    /// Promote a data column to row labels and drop it from the data.
    pub fn set_index_column(self, column: &str) -> Result<Self, CheckError> {
        let position = self
            .batch
            .schema()
            .index_of(column)
            .map_err(|_| CheckError::Value(format!("Given column '{}' does not exist", column)))?;
        let labels = labels_from_array(self.batch.column(position))?;

        let keep: Vec<usize> = (0..self.batch.num_columns())
            .filter(|i| *i != position)
            .collect();
        let batch = self.batch.project(&keep)?;

        let dataset = Self { batch, ..self }.with_index(labels)?;
        Ok(Self {
            index_name: Some(column.to_string()),
            ..dataset
        })
    }

    pub fn with_display(self, enabled: bool) -> Self {
        Self {
            with_display: enabled,
            ..self
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Name of the column the row labels were taken from, if any.
    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    /// Position of a column in the underlying batch.
    pub fn column_position(&self, id: &ColumnId) -> Option<usize> {
        let schema = self.batch.schema();
        match id {
            ColumnId::Named(name) if !name.is_empty() => schema.index_of(name).ok(),
            ColumnId::Named(_) => None,
            ColumnId::Anonymous(position) => schema
                .fields()
                .get(*position)
                .filter(|f| f.name().is_empty())
                .map(|_| *position),
        }
    }

    /// Gather rows by position, keeping their labels.
    pub fn take_rows(&self, positions: &[usize]) -> Result<Self, CheckError> {
        let indices = UInt64Array::from_iter_values(positions.iter().map(|&p| p as u64));
        let batch = compute::take_record_batch(&self.batch, &indices)?;
        let index: Vec<RowLabel> = positions.iter().map(|&p| self.index[p].clone()).collect();
        Ok(Self {
            name: self.name.clone(),
            batch,
            index: index.into(),
            index_name: self.index_name.clone(),
            with_display: self.with_display,
        })
    }
}

impl TabularView for Dataset {
    fn row_count(&self) -> usize {
        self.batch.num_rows()
    }

    fn sample(&self, n: usize, seed: u64) -> Result<Self, CheckError> {
        let rows = self.row_count();
        if n >= rows {
            return Ok(self.clone());
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let mut positions = rand::seq::index::sample(&mut rng, rows, n).into_vec();
        // Keep original row order
        positions.sort_unstable();
        debug!(dataset = %self.name, rows, sampled = n, seed, "sampling dataset");
        self.take_rows(&positions)
    }

    fn columns(&self) -> Vec<ColumnId> {
        self.batch
            .schema()
            .fields()
            .iter()
            .enumerate()
            .map(|(position, field)| {
                if field.name().is_empty() {
                    ColumnId::Anonymous(position)
                } else {
                    ColumnId::Named(field.name().clone())
                }
            })
            .collect()
    }

    fn projected_values(&self, columns: &[ColumnId]) -> Result<Vec<ArrayRef>, CheckError> {
        columns
            .iter()
            .map(|id| {
                self.column_position(id)
                    .map(|p| self.batch.column(p).clone())
                    .ok_or_else(|| {
                        CheckError::Value(format!("Given column '{}' does not exist", id))
                    })
            })
            .collect()
    }

    fn row_identifiers(&self) -> &[RowLabel] {
        &self.index
    }

    fn with_display_enabled(&self) -> bool {
        self.with_display
    }
}

/// Integer columns of any width become integer labels; a value that does not
/// fit `i64` turns the whole column into text labels.
fn labels_from_array(array: &ArrayRef) -> Result<Vec<RowLabel>, CheckError> {
    if array.data_type().is_integer() {
        let options = CastOptions {
            safe: false,
            ..Default::default()
        };
        if let Ok(cast) = compute::cast_with_options(array, &DataType::Int64, &options) {
            let values = cast.as_primitive::<Int64Type>();
            return Ok((0..values.len())
                .map(|i| {
                    if values.is_null(i) {
                        RowLabel::Text(String::new())
                    } else {
                        RowLabel::Int(values.value(i))
                    }
                })
                .collect());
        }
    }
    let formatter = ArrayFormatter::try_new(array.as_ref(), &FormatOptions::default())?;
    Ok((0..array.len())
        .map(|i| RowLabel::Text(formatter.value(i).to_string()))
        .collect())
}
