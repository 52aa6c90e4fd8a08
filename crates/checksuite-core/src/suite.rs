use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use tracing::{debug, error, info};

use crate::checks::Check;
use crate::context::{Context, DatasetKind};
use crate::errors::CheckError;
use crate::results::{CheckFailure, Outcome};

/// Ordered collection of checks run together against one [`Context`].
pub struct Suite {
    name: String,
    checks: Vec<Box<dyn Check>>,
    extra_info: Vec<String>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checks: Vec::new(),
            extra_info: Vec::new(),
        }
    }

    pub fn add(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn add_boxed(mut self, check: Box<dyn Check>) -> Self {
        self.checks.push(check);
        self
    }

    /// Free text shown under the report title, one entry per line.
    pub fn with_extra_info(self, extra_info: Vec<String>) -> Self {
        Self { extra_info, ..self }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn checks(&self) -> &[Box<dyn Check>] {
        &self.checks
    }

    /// First check with the given display name.
    pub fn find(&self, name: &str) -> Option<&dyn Check> {
        self.checks
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    /// Run every check on every dataset of the context.
    ///
    /// Checks run in parallel; outcomes keep check order, train before test.
    /// A panicking check is recorded as a failure and does not stop the run.
    pub fn run(&self, context: &Context) -> SuiteResult {
        let jobs: Vec<(&dyn Check, DatasetKind)> = self
            .checks
            .iter()
            .flat_map(|check| {
                context
                    .kinds()
                    .into_iter()
                    .map(move |kind| (check.as_ref(), kind))
            })
            .collect();
        info!(suite = %self.name, jobs = jobs.len(), "running suite");

        let results: Vec<Outcome> = jobs
            .par_iter()
            .map(|(check, kind)| run_guarded(*check, context, *kind))
            .collect();

        let failed = results.iter().filter(|o| o.is_failure()).count();
        debug!(suite = %self.name, failed, "suite finished");

        SuiteResult {
            name: self.name.clone(),
            results,
            extra_info: self.extra_info.clone(),
        }
    }
}

fn run_guarded(check: &dyn Check, context: &Context, kind: DatasetKind) -> Outcome {
    match panic::catch_unwind(AssertUnwindSafe(|| check.run(context, kind))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(check = check.name(), dataset = %kind, %message, "check panicked");
            let mut header = check.name().to_string();
            if context.has_test() {
                header.push_str(kind.header_suffix());
            }
            Outcome::Failure(CheckFailure::new(
                check.name(),
                header,
                CheckError::Execution {
                    kind: "Panic".to_string(),
                    message,
                },
            ))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Outcomes of a suite run, in run order.
#[derive(Debug)]
pub struct SuiteResult {
    pub name: String,
    pub results: Vec<Outcome>,
    pub extra_info: Vec<String>,
}

impl SuiteResult {
    pub fn new(name: impl Into<String>, results: Vec<Outcome>) -> Self {
        Self {
            name: name.into(),
            results,
            extra_info: Vec::new(),
        }
    }

    pub fn with_extra_info(self, extra_info: Vec<String>) -> Self {
        Self { extra_info, ..self }
    }

    pub fn failures(&self) -> usize {
        self.results.iter().filter(|o| o.is_failure()).count()
    }

    /// True when no check failed and every condition passed.
    pub fn passed(&self) -> bool {
        self.results.iter().all(|o| match o {
            Outcome::Success(r) => r.passed_conditions(),
            Outcome::Failure(_) => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::DataDuplicates;
    use crate::conditions::Condition;
    use crate::results::CheckResult;
    use crate::tables::Dataset;
    use arrow::array::Int64Array;
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    struct Exploding;

    impl Check for Exploding {
        fn name(&self) -> &str {
            "Exploding"
        }

        fn conditions(&self) -> &[Condition] {
            &[]
        }

        fn run_logic(&self, _: &Context, _: DatasetKind) -> Result<CheckResult, CheckError> {
            panic!("boom");
        }
    }

    fn dataset(values: Vec<i64>) -> Dataset {
        let schema = Schema::new(vec![Field::new("a", DataType::Int64, false)]);
        let batch =
            RecordBatch::try_new(Arc::new(schema), vec![Arc::new(Int64Array::from(values))])
                .unwrap();
        Dataset::new("d", batch)
    }

    #[test]
    fn test_outcomes_keep_check_and_dataset_order() {
        let suite = Suite::new("Integrity")
            .add(DataDuplicates::new())
            .add(Exploding)
            .with_extra_info(vec!["nightly".to_string()]);
        let ctx = Context::new(dataset(vec![1, 1, 2])).with_test(dataset(vec![1, 2, 3]));

        let result = suite.run(&ctx);
        let headers: Vec<&str> = result.results.iter().map(|o| o.header()).collect();
        assert_eq!(
            headers,
            vec![
                "Data Duplicates - Train Dataset",
                "Data Duplicates - Test Dataset",
                "Exploding - Train Dataset",
                "Exploding - Test Dataset",
            ]
        );
        assert_eq!(result.extra_info, vec!["nightly".to_string()]);
    }

    #[test]
    fn test_panic_is_recorded_as_failure() {
        let suite = Suite::new("s").add(Exploding);
        let result = suite.run(&Context::new(dataset(vec![1])));
        let failure = result.results[0].as_failure().unwrap();
        assert_eq!(failure.error.kind(), "Panic");
        assert_eq!(failure.error.display_message(), "Panic: boom");
        assert_eq!(result.failures(), 1);
        assert!(!result.passed());
    }

    #[test]
    fn test_passed_requires_conditions_to_pass() {
        let suite = Suite::new("s").add(DataDuplicates::new().add_condition_ratio_less_or_equal(0.));
        assert!(suite.run(&Context::new(dataset(vec![1, 2]))).passed());
        assert!(!suite.run(&Context::new(dataset(vec![1, 1]))).passed());
    }

    #[test]
    fn test_find_check_by_name() {
        let suite = Suite::new("s").add(DataDuplicates::new());
        assert!(suite.find("Data Duplicates").is_some());
        assert!(suite.find("Nope").is_none());
    }
}
