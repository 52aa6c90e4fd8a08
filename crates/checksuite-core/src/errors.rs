use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    /// The dataset (or its sample) holds no rows
    #[error("Dataset does not contain any data")]
    EmptyDataset,

    /// The dataset does not fit what the check expects
    #[error("{0}")]
    DatasetValidation(String),

    /// The model does not fit what the check expects
    #[error("{0}")]
    ModelValidation(String),

    /// An internal processing step could not complete
    #[error("{0}")]
    Process(String),

    /// Invalid argument given to a check or a dataset operation
    #[error("{0}")]
    Value(String),

    /// The Arrow kernel produced an error (e.g., unsupported cast)
    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet decoding error
    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    /// CSV reading or IO error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Unexpected fault raised while computing a check value
    #[error("{message}")]
    Execution { kind: String, message: String },
}

impl CheckError {
    /// Short name of the error family, used when rendering non-domain errors.
    pub fn kind(&self) -> &str {
        match self {
            CheckError::EmptyDataset => "EmptyDatasetError",
            CheckError::DatasetValidation(_) => "DatasetValidationError",
            CheckError::ModelValidation(_) => "ModelValidationError",
            CheckError::Process(_) => "ProcessError",
            CheckError::Value(_) => "ValueError",
            CheckError::Arrow(_) => "ArrowError",
            CheckError::Parquet(_) => "ParquetError",
            CheckError::Io(_) => "IoError",
            CheckError::Execution { kind, .. } => kind.as_str(),
        }
    }

    /// Domain errors are complaints about the user's data or model and are
    /// shown verbatim. Anything else is an internal fault.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            CheckError::EmptyDataset
                | CheckError::DatasetValidation(_)
                | CheckError::ModelValidation(_)
                | CheckError::Process(_)
        )
    }

    /// Message shown to the user: verbatim for domain errors,
    /// `"{kind}: {message}"` otherwise.
    pub fn display_message(&self) -> String {
        if self.is_domain_error() {
            self.to_string()
        } else {
            format!("{}: {}", self.kind(), self)
        }
    }
}
