use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use tracing::debug;

use crate::errors::CheckError;
use crate::readers::{apply_index, dataset_name, ReaderConfig};
use crate::tables::{Dataset, RowLabel, TabularView};

/// Read a CSV file, inferring column types.
///
/// Without a header every column is anonymous and identified by position.
pub fn read_csv(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<Dataset, CheckError> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let format = Format::default()
        .with_header(config.has_header)
        .with_delimiter(config.delimiter);
    let (inferred, scanned) = format.infer_schema(&mut file, config.infer_schema_rows)?;
    file.seek(SeekFrom::Start(0))?;

    let schema = if config.has_header {
        inferred
    } else {
        anonymous_schema(&inferred)
    };
    let schema = Arc::new(schema);
    debug!(path = %path.display(), columns = schema.fields().len(), scanned, "inferred csv schema");

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(config.has_header)
        .with_delimiter(config.delimiter)
        .with_batch_size(config.batch_size)
        .build(file)?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;

    let dataset = Dataset::from_batches(dataset_name(path), schema, &batches)?;
    apply_index(dataset, config)
}

fn anonymous_schema(schema: &Schema) -> Schema {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|f| Field::new("", f.data_type().clone(), true))
        .collect();
    Schema::new(fields)
}

/// Write a dataset as CSV. A promoted index column is written back first.
pub fn write_csv(dataset: &Dataset, path: impl AsRef<Path>) -> Result<(), CheckError> {
    let batch = match dataset.index_name() {
        Some(name) => with_index_column(dataset, name)?,
        None => dataset.batch().clone(),
    };

    let file = File::create(path.as_ref())?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(&batch)?;
    debug!(path = %path.as_ref().display(), rows = batch.num_rows(), "wrote csv");
    Ok(())
}

fn with_index_column(dataset: &Dataset, name: &str) -> Result<RecordBatch, CheckError> {
    let labels = dataset.row_identifiers();
    let all_int = labels.iter().all(|l| matches!(l, RowLabel::Int(_)));

    let (data_type, array): (DataType, ArrayRef) = if all_int {
        let values = labels.iter().map(|l| match l {
            RowLabel::Int(i) => Some(*i),
            RowLabel::Text(_) => None,
        });
        (DataType::Int64, Arc::new(Int64Array::from_iter(values)))
    } else {
        let values = labels.iter().map(|l| Some(l.to_string()));
        (DataType::Utf8, Arc::new(StringArray::from_iter(values)))
    };

    let batch = dataset.batch();
    let mut fields = vec![Arc::new(Field::new(name, data_type, true))];
    fields.extend(batch.schema().fields().iter().cloned());
    let mut columns = vec![array];
    columns.extend(batch.columns().iter().cloned());

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}
