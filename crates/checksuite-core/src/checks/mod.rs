//! Checks run by a suite.
//!
//! A check computes a value for one dataset of a [`Context`] and may attach
//! conditions to it. Checks able to repair the data they inspect also
//! expose the [`Fixable`] capability through [`Check::as_fixable`].

use std::fmt;

use tracing::warn;

use crate::conditions::Condition;
use crate::context::{Context, DatasetKind};
use crate::errors::CheckError;
use crate::results::{CheckFailure, CheckResult, Outcome};
use crate::tables::Dataset;

pub mod data_duplicates;

pub use data_duplicates::DataDuplicates;

pub trait Check: Send + Sync {
    /// Display name, also used to pick a check on the command line.
    fn name(&self) -> &str;

    fn conditions(&self) -> &[Condition];

    /// Compute the check value on the dataset of the given kind.
    fn run_logic(&self, context: &Context, kind: DatasetKind) -> Result<CheckResult, CheckError>;

    /// Capability query for checks that can produce a corrected dataset.
    fn as_fixable(&self) -> Option<&dyn Fixable> {
        None
    }

    /// Run the check and evaluate its conditions.
    ///
    /// Errors never escape: they are recorded as an [`Outcome::Failure`].
    fn run(&self, context: &Context, kind: DatasetKind) -> Outcome {
        let mut header = self.name().to_string();
        if context.has_test() {
            header.push_str(kind.header_suffix());
        }

        match self.run_logic(context, kind) {
            Ok(mut result) => {
                result.check_name = self.name().to_string();
                result.header = header;
                result.conditions = self
                    .conditions()
                    .iter()
                    .map(|c| c.evaluate(&result.value))
                    .collect();
                Outcome::Success(result)
            }
            Err(error) => {
                warn!(check = self.name(), dataset = %kind, error = %error, "check failed");
                Outcome::Failure(CheckFailure::new(self.name(), header, error))
            }
        }
    }
}

/// Which row of a duplicated set survives a fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeepPolicy {
    #[default]
    First,
    Last,
    /// Drop every row that has a duplicate
    None,
}

impl fmt::Display for KeepPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeepPolicy::First => write!(f, "first"),
            KeepPolicy::Last => write!(f, "last"),
            KeepPolicy::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FixResult {
    pub fixed_train: Dataset,
}

pub trait Fixable {
    /// Build a corrected copy of the train dataset.
    fn fix(&self, context: &Context, keep: KeepPolicy) -> Result<FixResult, CheckError>;
}
