use chrono::Local;
use checksuite_core::{ConditionResult, Outcome, SuiteResult};
use serde::Serialize;
use serde_json::{Error, Value};

use crate::Reporter;

#[derive(Serialize)]
pub struct JsonFormatter {
    version: String,
    timestamp: String,
    suites: Vec<SuiteFormatter>,
}

#[derive(Serialize)]
struct SuiteFormatter {
    name: String,
    pass: bool,
    extra_info: Vec<String>,
    results: Vec<OutcomeFormatter>,
}

#[derive(Serialize)]
struct OutcomeFormatter {
    check_name: String,
    header: String,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    conditions: Vec<ConditionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum Status {
    Passed,
    Failed,
    Error,
}

impl From<&Outcome> for OutcomeFormatter {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Success(r) => OutcomeFormatter {
                check_name: r.check_name.clone(),
                header: r.header.clone(),
                status: if r.passed_conditions() {
                    Status::Passed
                } else {
                    Status::Failed
                },
                value: Some(r.value.clone()),
                conditions: r.conditions.clone(),
                error: None,
            },
            Outcome::Failure(f) => OutcomeFormatter {
                check_name: f.check_name.clone(),
                header: f.header.clone(),
                status: Status::Error,
                value: None,
                conditions: Vec::new(),
                error: Some(f.error.display_message()),
            },
        }
    }
}

impl JsonFormatter {
    pub fn new(version: String) -> Self {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Self {
            version,
            timestamp,
            suites: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Reporter for JsonFormatter {
    fn on_start(&self) {}

    fn on_loading(&self) {}

    fn on_dataset_load(&self, _current: usize, _total: usize, _name: &str, _n_rows: usize) {}

    fn on_run_start(&self) {}

    fn on_suite_result(&mut self, result: &SuiteResult) {
        self.suites.push(SuiteFormatter {
            name: result.name.clone(),
            pass: result.passed(),
            extra_info: result.extra_info.clone(),
            results: result.results.iter().map(OutcomeFormatter::from).collect(),
        });
    }

    fn on_summary(&self, _passed: usize, _failed: usize) {}
}
