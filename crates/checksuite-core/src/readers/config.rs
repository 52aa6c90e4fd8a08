/// Options shared by the CSV and Parquet readers.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderConfig {
    pub batch_size: usize,
    pub has_header: bool,
    pub delimiter: u8,
    /// Rows scanned to infer CSV column types, `None` scans the whole file
    pub infer_schema_rows: Option<usize>,
    /// Column promoted to row labels after loading
    pub index_column: Option<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 128 * 1024,
            has_header: true,
            delimiter: b',',
            infer_schema_rows: Some(10_000),
            index_column: None,
        }
    }
}

pub struct ReaderConfigBuilder {
    config: ReaderConfig,
}

impl Default for ReaderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderConfigBuilder {
    /// Create a new [`ReaderConfigBuilder`]
    pub fn new() -> Self {
        Self {
            config: ReaderConfig::default(),
        }
    }

    /// Build a [`ReaderConfig`]
    pub fn build(self) -> ReaderConfig {
        self.config
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size.max(1);
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.config.has_header = has_header;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    pub fn with_infer_schema_rows(mut self, rows: Option<usize>) -> Self {
        self.config.infer_schema_rows = rows;
        self
    }

    pub fn with_index_column(mut self, column: impl Into<String>) -> Self {
        self.config.index_column = Some(column.into());
        self
    }
}
