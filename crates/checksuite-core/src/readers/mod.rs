//! Dataset loading.
//!
//! Files are read whole into a single [`Dataset`]; the format is picked from
//! the file extension.
//!
//! ```no_run
//! use checksuite_core::readers::{read_dataset, ReaderConfigBuilder};
//!
//! let config = ReaderConfigBuilder::new().with_index_column("id").build();
//! let dataset = read_dataset("train.csv", &config)?;
//! # Ok::<(), checksuite_core::CheckError>(())
//! ```

use std::path::Path;

use crate::errors::CheckError;
use crate::tables::Dataset;

mod config;
pub mod csv_reader;
pub mod parquet_reader;

pub use config::{ReaderConfig, ReaderConfigBuilder};
pub use csv_reader::{read_csv, write_csv};
pub use parquet_reader::read_parquet;

/// File format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Parquet,
}

impl FileFormat {
    /// Detect format from file extension
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "csv" | "tsv" | "txt" => Some(FileFormat::Csv),
            "parquet" | "pq" => Some(FileFormat::Parquet),
            _ => None,
        }
    }
}

/// Read a CSV or Parquet file, dispatching on its extension.
pub fn read_dataset(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<Dataset, CheckError> {
    let path = path.as_ref();
    match FileFormat::from_path(path) {
        Some(FileFormat::Csv) => read_csv(path, config),
        Some(FileFormat::Parquet) => read_parquet(path, config),
        None => Err(CheckError::Value(format!(
            "Unsupported file format: {}",
            path.display()
        ))),
    }
}

/// Dataset name derived from the file stem.
fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Promote the configured index column, if any.
fn apply_index(dataset: Dataset, config: &ReaderConfig) -> Result<Dataset, CheckError> {
    match &config.index_column {
        Some(column) => dataset.set_index_column(column),
        None => Ok(dataset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path("a/b/train.CSV"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_path("x.parquet"), Some(FileFormat::Parquet));
        assert_eq!(FileFormat::from_path("x.json"), None);
        assert_eq!(FileFormat::from_path("noext"), None);
    }

    #[test]
    fn test_unsupported_format() {
        let err = read_dataset("data.xlsx", &ReaderConfig::default()).unwrap_err();
        assert!(matches!(err, CheckError::Value(_)));
    }

    #[test]
    fn test_dataset_name() {
        assert_eq!(dataset_name(Path::new("/tmp/train.csv")), "train");
    }
}
