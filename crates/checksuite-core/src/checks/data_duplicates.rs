use serde_json::{json, Value};
use tracing::info;

use crate::checks::{Check, FixResult, Fixable, KeepPolicy};
use crate::conditions::{Condition, ConditionCategory, Verdict};
use crate::context::{Context, DatasetKind};
use crate::engine::group_key::group_rows;
use crate::engine::DuplicateDetector;
use crate::errors::CheckError;
use crate::results::{CheckResult, DisplayItem};
use crate::tables::{ColumnId, TabularView};
use crate::utils::format_percent;

const EXPLANATION: &str =
    "Each row in the table shows an example of duplicate data and the number of times it appears.";

/// Checks for duplicate samples in the dataset.
///
/// The value is the duplicated share of the (sampled) rows. With display
/// enabled the most common duplicated rows are listed with their labels.
#[derive(Debug, Clone, Default)]
pub struct DataDuplicates {
    detector: DuplicateDetector,
    conditions: Vec<Condition>,
}

impl DataDuplicates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detector(&self) -> &DuplicateDetector {
        &self.detector
    }

    pub fn with_columns(self, columns: Vec<ColumnId>) -> Self {
        Self {
            detector: self.detector.with_columns(columns),
            ..self
        }
    }

    pub fn with_ignore_columns(self, ignore_columns: Vec<ColumnId>) -> Self {
        Self {
            detector: self.detector.with_ignore_columns(ignore_columns),
            ..self
        }
    }

    pub fn with_n_to_show(self, n_to_show: usize) -> Self {
        Self {
            detector: self.detector.with_n_to_show(n_to_show),
            ..self
        }
    }

    pub fn with_n_samples(self, n_samples: usize) -> Self {
        Self {
            detector: self.detector.with_n_samples(n_samples),
            ..self
        }
    }

    pub fn with_random_state(self, random_state: u64) -> Self {
        Self {
            detector: self.detector.with_random_state(random_state),
            ..self
        }
    }

    /// Fail when the duplicate ratio exceeds `max_ratio`.
    pub fn add_condition_ratio_less_or_equal(mut self, max_ratio: f64) -> Self {
        let name = format!(
            "Duplicate data ratio is less or equal to {}",
            format_percent(max_ratio)
        );
        self.conditions.push(Condition::new(name, move |value: &Value| {
            let ratio = value.as_f64().ok_or_else(|| {
                CheckError::Value(format!("Expected a ratio, got {}", value))
            })?;
            let details = format!("Found {} duplicate data", format_percent(ratio));
            Ok(Verdict::from_bool(
                ratio <= max_ratio,
                ConditionCategory::Fail,
                details,
            ))
        }));
        self
    }
}

impl Check for DataDuplicates {
    fn name(&self) -> &str {
        "Data Duplicates"
    }

    fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    fn run_logic(&self, context: &Context, kind: DatasetKind) -> Result<CheckResult, CheckError> {
        let dataset = context.get_data_by_kind(kind)?;
        let report = self.detector.detect(&dataset)?;

        let display = match report.evidence_table() {
            Some(table) => vec![
                DisplayItem::Text(format!(
                    "{} of data samples are duplicates. ",
                    format_percent(report.ratio)
                )),
                DisplayItem::Text(EXPLANATION.to_string()),
                DisplayItem::Table(table),
            ],
            None => Vec::new(),
        };

        Ok(CheckResult::new(json!(report.ratio)).with_display(display))
    }

    fn as_fixable(&self) -> Option<&dyn Fixable> {
        Some(self)
    }
}

impl Fixable for DataDuplicates {
    /// Drop repeated rows of the train dataset. Duplication is judged on the
    /// selected columns only, but kept rows retain every column and label.
    fn fix(&self, context: &Context, keep: KeepPolicy) -> Result<FixResult, CheckError> {
        let train = context.train();
        let columns = train.select_columns(self.detector.columns(), self.detector.ignore_columns())?;
        if columns.is_empty() {
            return Err(CheckError::Value(
                "No columns selected for duplicate detection".to_string(),
            ));
        }

        let groups = group_rows(&train.projected_values(&columns)?)?;
        let mut kept: Vec<usize> = groups
            .iter()
            .filter_map(|g| match keep {
                KeepPolicy::First => g.positions.first().copied(),
                KeepPolicy::Last => g.positions.last().copied(),
                KeepPolicy::None if g.positions.len() == 1 => Some(g.positions[0]),
                KeepPolicy::None => None,
            })
            .collect();
        kept.sort_unstable();

        info!(
            dataset = train.name(),
            %keep,
            removed = train.row_count() - kept.len(),
            "dropped duplicate rows"
        );
        Ok(FixResult {
            fixed_train: train.take_rows(&kept)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Outcome;
    use crate::tables::{Dataset, RowLabel};
    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    // rows 0/3/5 share (1, "a"), rows 1/4 share (2, "b") on both columns
    fn dataset() -> Dataset {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("tag", DataType::Utf8, false),
            Field::new("extra", DataType::Int64, false),
        ]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3, 1, 2, 1])),
                Arc::new(StringArray::from(vec!["a", "b", "c", "a", "b", "a"])),
                Arc::new(Int64Array::from(vec![10, 11, 12, 13, 14, 15])),
            ],
        )
        .unwrap();
        Dataset::new("train", batch)
    }

    fn labels(dataset: &Dataset) -> Vec<RowLabel> {
        dataset.row_identifiers().to_vec()
    }

    #[test]
    fn test_run_builds_display_and_conditions() {
        let check = DataDuplicates::new()
            .with_columns(vec!["id".into(), "tag".into()])
            .add_condition_ratio_less_or_equal(0.);
        let ctx = Context::new(dataset());

        let Outcome::Success(result) = check.run(&ctx, DatasetKind::Train) else {
            panic!("expected success");
        };
        assert_eq!(result.header, "Data Duplicates");
        assert!((result.value.as_f64().unwrap() - 0.5).abs() < 1e-12);

        assert_eq!(result.display.len(), 3);
        assert_eq!(
            result.display[0],
            DisplayItem::Text("50% of data samples are duplicates. ".to_string())
        );
        let DisplayItem::Table(table) = &result.display[2] else {
            panic!("expected table");
        };
        assert_eq!(table.rows[0][0], "0, 3, 5");
        assert_eq!(table.rows[0][1], "3");
        assert_eq!(table.rows[1][0], "1, 4");

        assert_eq!(result.conditions.len(), 1);
        let condition = &result.conditions[0];
        assert_eq!(condition.name, "Duplicate data ratio is less or equal to 0%");
        assert_eq!(condition.category, ConditionCategory::Fail);
        assert_eq!(condition.details, "Found 50% duplicate data");
    }

    #[test]
    fn test_condition_passes_under_threshold() {
        let check = DataDuplicates::new()
            .with_ignore_columns(vec!["extra".into()])
            .add_condition_ratio_less_or_equal(0.6);
        let outcome = check.run(&Context::new(dataset()), DatasetKind::Train);
        assert!(outcome.as_success().unwrap().passed_conditions());
    }

    #[test]
    fn test_no_display_when_disabled() {
        let check = DataDuplicates::new().with_columns(vec!["id".into()]);
        let ctx = Context::new(dataset()).with_display(false);
        let outcome = check.run(&ctx, DatasetKind::Train);
        let result = outcome.as_success().unwrap();
        assert!(!result.have_display());
        assert!(result.value.as_f64().unwrap() > 0.);
    }

    #[test]
    fn test_no_duplicates_on_all_columns() {
        let outcome = DataDuplicates::new().run(&Context::new(dataset()), DatasetKind::Train);
        let result = outcome.as_success().unwrap();
        assert_eq!(result.value.as_f64(), Some(0.));
        assert!(!result.have_display());
    }

    #[test]
    fn test_error_becomes_failure() {
        let check = DataDuplicates::new().with_columns(vec!["missing".into()]);
        let outcome = check.run(&Context::new(dataset()), DatasetKind::Train);
        let failure = outcome.as_failure().unwrap();
        assert_eq!(failure.check_name, "Data Duplicates");
        assert_eq!(
            failure.error.display_message(),
            "ValueError: Given column 'missing' does not exist"
        );
    }

    #[test]
    fn test_header_suffix_with_test_dataset() {
        let ctx = Context::new(dataset()).with_test(dataset());
        let outcome = DataDuplicates::new().run(&ctx, DatasetKind::Test);
        assert_eq!(outcome.header(), "Data Duplicates - Test Dataset");
    }

    #[test]
    fn test_fix_keep_first_and_last() {
        let check = DataDuplicates::new().with_columns(vec!["id".into(), "tag".into()]);
        let fixable = check.as_fixable().unwrap();
        let ctx = Context::new(dataset());

        let first = fixable.fix(&ctx, KeepPolicy::First).unwrap().fixed_train;
        assert_eq!(labels(&first), vec![RowLabel::Int(0), RowLabel::Int(1), RowLabel::Int(2)]);
        // Every column survives, not only the key columns
        assert_eq!(first.batch().num_columns(), 3);

        let last = fixable.fix(&ctx, KeepPolicy::Last).unwrap().fixed_train;
        assert_eq!(labels(&last), vec![RowLabel::Int(2), RowLabel::Int(4), RowLabel::Int(5)]);
    }

    #[test]
    fn test_fix_keep_none() {
        let check = DataDuplicates::new().with_columns(vec!["id".into()]);
        let fixed = check
            .fix(&Context::new(dataset()), KeepPolicy::None)
            .unwrap()
            .fixed_train;
        assert_eq!(labels(&fixed), vec![RowLabel::Int(2)]);
    }
}
