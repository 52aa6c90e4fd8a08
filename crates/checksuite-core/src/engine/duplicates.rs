use tracing::debug;

use crate::engine::group_key::{group_rows, KeySlots, KeyValue};
use crate::errors::CheckError;
use crate::results::DisplayTable;
use crate::tables::{ColumnId, RowLabel, TabularView};
use crate::utils::format_list;

pub const DEFAULT_N_TO_SHOW: usize = 5;
pub const DEFAULT_N_SAMPLES: usize = 10_000_000;
pub const DEFAULT_RANDOM_STATE: u64 = 42;

/// Rows sharing the same projected values.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup {
    /// Key values, aligned with [`DuplicateReport::key_columns`]
    pub values: Vec<KeyValue>,
    pub count: usize,
    /// Original labels of the rows in the group
    pub rows: Vec<RowLabel>,
}

#[derive(Debug, Clone)]
pub struct DuplicateReport {
    pub ratio: f64,
    pub n_samples: usize,
    pub n_unique: usize,
    pub key_columns: KeySlots,
    /// Most duplicated groups, `None` when display is off or nothing repeats
    pub groups: Option<Vec<DuplicateGroup>>,
}

impl DuplicateReport {
    /// Evidence table: `Instances` and `Number of Duplicates` as row headers,
    /// then one column per key column.
    pub fn evidence_table(&self) -> Option<DisplayTable> {
        let groups = self.groups.as_ref()?;
        let mut columns = vec![
            "Instances".to_string(),
            "Number of Duplicates".to_string(),
        ];
        columns.extend(self.key_columns.headers());

        let mut table = DisplayTable::new(columns).with_index_width(2);
        for group in groups {
            let mut row = vec![format_list(&group.rows), group.count.to_string()];
            row.extend(group.values.iter().map(|v| v.to_string()));
            table.push_row(row);
        }
        Some(table)
    }
}

/// Measures how much of a dataset is duplicated over a set of columns.
///
/// ```no_run
/// use checksuite_core::engine::DuplicateDetector;
/// # use checksuite_core::Dataset;
/// # fn run(dataset: &Dataset) -> Result<(), checksuite_core::CheckError> {
/// let report = DuplicateDetector::new()
///     .with_columns(vec!["email".into(), "name".into()])
///     .with_n_to_show(3)
///     .detect(dataset)?;
/// println!("{:.2}", report.ratio);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DuplicateDetector {
    columns: Option<Vec<ColumnId>>,
    ignore_columns: Option<Vec<ColumnId>>,
    n_samples: usize,
    random_state: u64,
    n_to_show: usize,
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self {
            columns: None,
            ignore_columns: None,
            n_samples: DEFAULT_N_SAMPLES,
            random_state: DEFAULT_RANDOM_STATE,
            n_to_show: DEFAULT_N_TO_SHOW,
        }
    }

    pub fn with_columns(self, columns: Vec<ColumnId>) -> Self {
        Self {
            columns: Some(columns),
            ..self
        }
    }

    pub fn with_ignore_columns(self, ignore_columns: Vec<ColumnId>) -> Self {
        Self {
            ignore_columns: Some(ignore_columns),
            ..self
        }
    }

    pub fn with_n_samples(self, n_samples: usize) -> Self {
        Self { n_samples, ..self }
    }

    pub fn with_random_state(self, random_state: u64) -> Self {
        Self {
            random_state,
            ..self
        }
    }

    pub fn with_n_to_show(self, n_to_show: usize) -> Self {
        Self { n_to_show, ..self }
    }

    pub fn columns(&self) -> Option<&[ColumnId]> {
        self.columns.as_deref()
    }

    pub fn ignore_columns(&self) -> Option<&[ColumnId]> {
        self.ignore_columns.as_deref()
    }

    /// Sample the view, group it on the selected columns and compute
    /// `1 - unique / sampled`.
    ///
    /// Evidence groups are only built when the view has display enabled and
    /// at least one row repeats.
    pub fn detect<V: TabularView>(&self, view: &V) -> Result<DuplicateReport, CheckError> {
        let sample = view.sample(self.n_samples, self.random_state)?;
        let key_columns =
            sample.select_columns(self.columns.as_deref(), self.ignore_columns.as_deref())?;

        let n_samples = sample.row_count();
        if n_samples == 0 {
            return Err(CheckError::EmptyDataset);
        }
        if key_columns.is_empty() {
            return Err(CheckError::Value(
                "No columns selected for duplicate detection".to_string(),
            ));
        }

        let arrays = sample.projected_values(&key_columns)?;
        let groups = group_rows(&arrays)?;
        let n_unique = groups.len();
        let ratio = 1. - (n_unique as f64 / n_samples as f64);
        debug!(n_samples, n_unique, ratio, "grouped rows for duplicate detection");

        let key_columns = KeySlots::new(key_columns);
        if !sample.with_display_enabled() || ratio == 0. {
            return Ok(DuplicateReport {
                ratio,
                n_samples,
                n_unique,
                key_columns,
                groups: None,
            });
        }

        let mut duplicated: Vec<_> = groups
            .into_iter()
            .filter(|g| g.positions.len() > 1)
            .collect();
        // Stable: ties keep first-seen order
        duplicated.sort_by(|a, b| b.positions.len().cmp(&a.positions.len()));
        duplicated.truncate(self.n_to_show);

        let labels = sample.row_identifiers();
        let evidence = duplicated
            .into_iter()
            .map(|g| DuplicateGroup {
                count: g.positions.len(),
                rows: g.positions.iter().map(|&p| labels[p].clone()).collect(),
                values: g.key.into_values(),
            })
            .collect();

        Ok(DuplicateReport {
            ratio,
            n_samples,
            n_unique,
            key_columns,
            groups: Some(evidence),
        })
    }
}
