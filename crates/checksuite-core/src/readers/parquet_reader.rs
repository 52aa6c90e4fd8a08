use std::fs::File;
use std::path::Path;

use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tracing::debug;

use crate::errors::CheckError;
use crate::readers::{apply_index, dataset_name, ReaderConfig};
use crate::tables::Dataset;

/// Read every row group of a Parquet file.
pub fn read_parquet(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<Dataset, CheckError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();

    let reader = builder.with_batch_size(config.batch_size).build()?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    debug!(path = %path.display(), batches = batches.len(), "read parquet");

    let dataset = Dataset::from_batches(dataset_name(path), schema, &batches)?;
    apply_index(dataset, config)
}
