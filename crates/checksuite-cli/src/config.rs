use std::path::{Path, PathBuf};

use checksuite_core::readers::{ReaderConfig, ReaderConfigBuilder};
use checksuite_core::{ColumnId, DataDuplicates};
use serde::Deserialize;

use crate::errors::ConfigError;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub suite: SuiteConfig,
    pub dataset: DatasetConfig,
    #[serde(default, rename = "check")]
    pub checks: Vec<CheckConfig>,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize)]
pub struct SuiteConfig {
    pub name: String,
    #[serde(default)]
    pub extra_info: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DatasetConfig {
    pub train: String,
    pub test: Option<String>,
    pub index_column: Option<String>,
    pub delimiter: Option<char>,
    #[serde(default = "default_has_header")]
    pub has_header: bool,
}

fn default_has_header() -> bool {
    true
}

impl DatasetConfig {
    pub fn reader_config(&self) -> Result<ReaderConfig, ConfigError> {
        let mut builder = ReaderConfigBuilder::new().with_header(self.has_header);
        if let Some(delimiter) = self.delimiter {
            if !delimiter.is_ascii() {
                return Err(ConfigError::InvalidDelimiter { delimiter });
            }
            builder = builder.with_delimiter(delimiter as u8);
        }
        if let Some(index) = &self.index_column {
            builder = builder.with_index_column(index.clone());
        }
        Ok(builder.build())
    }
}

/// A column given by name, or by position for headerless files.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Position(usize),
    Name(String),
}

impl From<&ColumnRef> for ColumnId {
    fn from(value: &ColumnRef) -> Self {
        match value {
            ColumnRef::Position(p) => ColumnId::Anonymous(*p),
            ColumnRef::Name(n) => ColumnId::Named(n.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckConfig {
    DataDuplicates(DuplicatesConfig),
}

#[derive(Debug, Default, Deserialize)]
pub struct DuplicatesConfig {
    pub columns: Option<Vec<ColumnRef>>,
    pub ignore_columns: Option<Vec<ColumnRef>>,
    pub n_to_show: Option<usize>,
    pub n_samples: Option<usize>,
    pub random_state: Option<u64>,
    /// Adds the duplicate ratio condition when set
    pub max_ratio: Option<f64>,
}

impl CheckConfig {
    pub fn kind(&self) -> &str {
        match self {
            CheckConfig::DataDuplicates(_) => "data_duplicates",
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            CheckConfig::DataDuplicates(c) => {
                if c.columns.is_some() && c.ignore_columns.is_some() {
                    return Err(ConfigError::ConflictingColumns {
                        kind: self.kind().to_string(),
                    });
                }
                if let Some(ratio) = c.max_ratio {
                    if !(0.0..=1.0).contains(&ratio) {
                        return Err(ConfigError::InvalidRatio {
                            kind: self.kind().to_string(),
                            ratio,
                        });
                    }
                }
                Ok(())
            }
        }
    }

    pub fn build(&self) -> DataDuplicates {
        match self {
            CheckConfig::DataDuplicates(c) => {
                let mut check = DataDuplicates::new();
                if let Some(columns) = &c.columns {
                    check = check.with_columns(columns.iter().map(ColumnId::from).collect());
                }
                if let Some(columns) = &c.ignore_columns {
                    check = check.with_ignore_columns(columns.iter().map(ColumnId::from).collect());
                }
                if let Some(n) = c.n_to_show {
                    check = check.with_n_to_show(n);
                }
                if let Some(n) = c.n_samples {
                    check = check.with_n_samples(n);
                }
                if let Some(seed) = c.random_state {
                    check = check.with_random_state(seed);
                }
                if let Some(ratio) = c.max_ratio {
                    check = check.add_condition_ratio_less_or_equal(ratio);
                }
                check
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub full_html: bool,
    pub output_id: Option<String>,
    /// Directory holding `require.min.js` and `plotly.min.js` to inline
    pub assets_dir: Option<PathBuf>,
}

pub fn parse_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate(&config)?;
    Ok(config)
}

fn parse_str(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.checks.is_empty() {
        return Err(ConfigError::NoCheck);
    }
    config.dataset.reader_config()?;
    config.checks.iter().try_for_each(CheckConfig::validate)
}
