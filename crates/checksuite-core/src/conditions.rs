use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::errors::CheckError;

/// Verdict of a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionCategory {
    Pass,
    Fail,
    Warn,
    Error,
}

impl ConditionCategory {
    /// Ordering used by condition tables: failures first, errors last.
    pub fn priority(&self) -> u8 {
        match self {
            ConditionCategory::Fail => 1,
            ConditionCategory::Warn => 2,
            ConditionCategory::Pass => 3,
            ConditionCategory::Error => 4,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ConditionCategory::Pass => "\u{2713}",
            ConditionCategory::Fail => "\u{2716}",
            ConditionCategory::Warn => "!",
            ConditionCategory::Error => "\u{2048}",
        }
    }
}

impl fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConditionCategory::Pass => "pass",
            ConditionCategory::Fail => "fail",
            ConditionCategory::Warn => "warn",
            ConditionCategory::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Evaluated condition attached to a check result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionResult {
    pub name: String,
    pub category: ConditionCategory,
    pub details: String,
}

impl ConditionResult {
    pub fn is_pass(&self) -> bool {
        self.category == ConditionCategory::Pass
    }
}

/// What a condition function decides about a check value.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub category: ConditionCategory,
    pub details: String,
}

impl Verdict {
    pub fn new(category: ConditionCategory, details: impl Into<String>) -> Self {
        Self {
            category,
            details: details.into(),
        }
    }

    /// `Pass` when `passed`, otherwise `failing`.
    pub fn from_bool(passed: bool, failing: ConditionCategory, details: impl Into<String>) -> Self {
        let category = if passed {
            ConditionCategory::Pass
        } else {
            failing
        };
        Self::new(category, details)
    }
}

type ConditionFn = dyn Fn(&Value) -> Result<Verdict, CheckError> + Send + Sync;

/// Named predicate over a check value.
#[derive(Clone)]
pub struct Condition {
    name: String,
    func: Arc<ConditionFn>,
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition").field("name", &self.name).finish()
    }
}

impl Condition {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Verdict, CheckError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the condition. A failing evaluation becomes an `Error` verdict.
    pub fn evaluate(&self, value: &Value) -> ConditionResult {
        match (self.func)(value) {
            Ok(verdict) => ConditionResult {
                name: self.name.clone(),
                category: verdict.category,
                details: verdict.details,
            },
            Err(e) => ConditionResult {
                name: self.name.clone(),
                category: ConditionCategory::Error,
                details: e.display_message(),
            },
        }
    }
}
