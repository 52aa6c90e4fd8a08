pub mod classifier;
pub mod formatters;
pub mod html;
pub mod utils;

use checksuite_core::{CheckResult, DisplayTable, SuiteResult};

pub use classifier::ResultClassifier;
pub use formatters::{json::JsonFormatter, stdout::StdOutFormatter};
pub use html::{
    CheckResultHtmlRenderer, HtmlTableRenderer, ReportAssembler, ScriptResources,
    SectionBuilder, SerializeOptions,
};

/// Progress and result callbacks driven by the cli runner.
pub trait Reporter {
    fn on_start(&self);
    fn on_loading(&self);
    fn on_dataset_load(&self, current: usize, total: usize, name: &str, n_rows: usize);
    fn on_run_start(&self);
    fn on_suite_result(&mut self, result: &SuiteResult);
    fn on_summary(&self, passed: usize, failed: usize);
}

/// Part of a single check result to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckSection {
    ConditionTable,
    AdditionalOutput,
}

impl CheckSection {
    pub const ALL: [CheckSection; 2] = [CheckSection::ConditionTable, CheckSection::AdditionalOutput];
}

/// Renders one successful check result as a report fragment.
pub trait OutcomeRenderer: Sync {
    /// `anchor_id` is the element id of the result header, unique within a
    /// report. `include_resources` controls whether the fragment carries its
    /// own script bootstrap. Suite reports always pass `false`.
    fn render(
        &self,
        result: &CheckResult,
        anchor_id: Option<&str>,
        sections: &[CheckSection],
        include_resources: bool,
    ) -> String;
}

/// Renders a display table.
pub trait TableRenderer: Sync {
    fn render(&self, table: &DisplayTable) -> String;
}
