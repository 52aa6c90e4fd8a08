pub mod checks;
pub mod conditions;
pub mod context;
pub mod engine;
pub mod errors;
pub mod readers;
pub mod results;
pub mod suite;
pub mod tables;
pub mod utils;

pub use checks::{Check, DataDuplicates, FixResult, Fixable, KeepPolicy};
pub use conditions::{Condition, ConditionCategory, ConditionResult, Verdict};
pub use context::{Context, DatasetKind};
pub use errors::CheckError;
pub use results::{CheckFailure, CheckResult, DisplayItem, DisplayTable, Outcome};
pub use suite::{Suite, SuiteResult};
pub use tables::{ColumnId, Dataset, RowLabel, TabularView};
