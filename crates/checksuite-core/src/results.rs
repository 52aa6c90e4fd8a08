use serde::Serialize;
use serde_json::Value;

use crate::conditions::{ConditionCategory, ConditionResult};
use crate::errors::CheckError;

/// Table payload of a display, with the first `index_width` columns acting
/// as row headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayTable {
    pub columns: Vec<String>,
    pub index_width: usize,
    pub rows: Vec<Vec<String>>,
}

impl DisplayTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            index_width: 0,
            rows: Vec::new(),
        }
    }

    pub fn with_index_width(self, index_width: usize) -> Self {
        Self {
            index_width,
            ..self
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One renderable element of a check display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum DisplayItem {
    Text(String),
    Table(DisplayTable),
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub check_name: String,
    pub header: String,
    pub value: Value,
    pub display: Vec<DisplayItem>,
    pub conditions: Vec<ConditionResult>,
}

impl CheckResult {
    pub fn new(value: Value) -> Self {
        Self {
            check_name: String::new(),
            header: String::new(),
            value,
            display: Vec::new(),
            conditions: Vec::new(),
        }
    }

    pub fn with_display(self, display: Vec<DisplayItem>) -> Self {
        Self { display, ..self }
    }

    pub fn have_display(&self) -> bool {
        !self.display.is_empty()
    }

    pub fn have_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    /// True when every condition passed (vacuously true without conditions).
    pub fn passed_conditions(&self) -> bool {
        self.conditions.iter().all(ConditionResult::is_pass)
    }

    /// Worst verdict among the conditions, by condition-table priority.
    pub fn worst_category(&self) -> Option<ConditionCategory> {
        self.conditions
            .iter()
            .map(|c| c.category)
            .filter(|c| *c != ConditionCategory::Pass)
            .min_by_key(|c| c.priority())
            .or_else(|| self.conditions.first().map(|c| c.category))
    }
}

/// A check that could not produce a value.
#[derive(Debug)]
pub struct CheckFailure {
    pub check_name: String,
    pub header: String,
    pub error: CheckError,
}

impl CheckFailure {
    pub fn new(check_name: impl Into<String>, header: impl Into<String>, error: CheckError) -> Self {
        Self {
            check_name: check_name.into(),
            header: header.into(),
            error,
        }
    }
}

/// Result of running one check against one dataset.
#[derive(Debug)]
pub enum Outcome {
    Success(CheckResult),
    Failure(CheckFailure),
}

impl Outcome {
    pub fn check_name(&self) -> &str {
        match self {
            Outcome::Success(r) => &r.check_name,
            Outcome::Failure(f) => &f.check_name,
        }
    }

    pub fn header(&self) -> &str {
        match self {
            Outcome::Success(r) => &r.header,
            Outcome::Failure(f) => &f.header,
        }
    }

    pub fn as_success(&self) -> Option<&CheckResult> {
        match self {
            Outcome::Success(r) => Some(r),
            Outcome::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&CheckFailure> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(f) => Some(f),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }
}
