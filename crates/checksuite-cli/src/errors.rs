use std::path::PathBuf;

use checksuite_core::CheckError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("No check named '{name}' in suite '{suite}'")]
    UnknownCheck { name: String, suite: String },
    #[error("Check '{name}' cannot fix datasets")]
    NotFixable { name: String },
    #[error("Check error: {}", .0.display_message())]
    Check(#[from] CheckError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Configuration file contains no check")]
    NoCheck,
    #[error("Delimiter '{delimiter}' must be a single ascii character")]
    InvalidDelimiter { delimiter: char },
    #[error("Check '{kind}' option max_ratio must be between 0 and 1, got {ratio}")]
    InvalidRatio { kind: String, ratio: f64 },
    #[error("columns and ignore_columns cannot be set together for check '{kind}'")]
    ConflictingColumns { kind: String },
}
