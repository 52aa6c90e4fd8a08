use checksuite_core::{CheckResult, ConditionCategory, DisplayTable, Outcome};
use maud::{html, Markup, PreEscaped};
use rayon::prelude::*;

use crate::classifier::{intersect, union, ResultClassifier};
use crate::html::common::{
    aggregate_conditions, form_check_anchor, form_output_anchor, light_hr, verdict_icon,
    MAX_INFO_LEN,
};
use crate::{CheckSection, OutcomeRenderer, TableRenderer};

pub const NO_CONDITIONS: &str = "No conditions defined on checks in the suite.";
pub const NOTHING_FOUND: &str = "Nothing found";

const PROLOGUE_NAMES: usize = 3;

/// Rendered sections of a suite report, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSections {
    pub summary: String,
    pub conditions_table: String,
    pub with_conditions: String,
    pub without_conditions: String,
    /// Empty when nothing failed and every result had a display
    pub failures: String,
}

/// Renders each group of a classified suite result into a section.
///
/// Empty groups render a placeholder so the document keeps its structure,
/// except the failures list which renders as an empty string.
pub struct SectionBuilder<'a, R, T> {
    classifier: ResultClassifier<'a>,
    renderer: &'a R,
    table_renderer: &'a T,
}

impl<'a, R: OutcomeRenderer, T: TableRenderer> SectionBuilder<'a, R, T> {
    pub fn new(classifier: ResultClassifier<'a>, renderer: &'a R, table_renderer: &'a T) -> Self {
        Self {
            classifier,
            renderer,
            table_renderer,
        }
    }

    pub fn build(&self, output_id: Option<&str>, include_check_name: bool) -> ReportSections {
        ReportSections {
            summary: self.summary(output_id),
            conditions_table: self.conditions_table(include_check_name),
            with_conditions: self.results_with_condition_and_display(output_id),
            without_conditions: self.results_without_condition(output_id),
            failures: self.failures_list(),
        }
    }

    pub fn summary(&self, output_id: Option<&str>) -> String {
        let suite = self.classifier.suite();
        let anchor = output_id.map(form_output_anchor);
        let categories = [
            ConditionCategory::Pass,
            ConditionCategory::Fail,
            ConditionCategory::Warn,
            ConditionCategory::Error,
        ];

        html! {
            h1 id=[anchor] { (suite.name) }
            p {
                (self.prologue())
                br;
                "Each check may contain conditions (which will result in pass / fail / warning / error, represented by "
                @for (i, category) in categories.iter().enumerate() {
                    @if i > 0 { " / " }
                    (verdict_icon(*category))
                }
                ") as well as other outputs such as plots or tables."
                br;
                "Suites, checks and conditions can all be modified."
            }
            @if !suite.extra_info.is_empty() {
                br;
                @for (i, line) in suite.extra_info.iter().enumerate() {
                    @if i > 0 { br; }
                    div { (line) }
                }
            }
        }
        .into_string()
    }

    /// Short description naming the distinct checks, first seen first.
    pub fn prologue(&self) -> String {
        let mut names: Vec<&str> = Vec::new();
        for outcome in &self.classifier.suite().results {
            let name = outcome.check_name();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        if names.len() > PROLOGUE_NAMES {
            format!(
                "The suite is composed of various checks such as: {}, etc...",
                names[..PROLOGUE_NAMES].join(", ")
            )
        } else {
            format!(
                "The suite is composed of the following checks: {}.",
                names.join(", ")
            )
        }
    }

    pub fn conditions_table(&self, include_check_name: bool) -> String {
        let results = self
            .classifier
            .select_successes(self.classifier.with_conditions());
        if results.is_empty() {
            return html! { p { (NO_CONDITIONS) } }.into_string();
        }
        let table = aggregate_conditions(&results, include_check_name, MAX_INFO_LEN);
        html! {
            h2 { "Conditions Summary" }
            (PreEscaped(self.table_renderer.render(&table)))
        }
        .into_string()
    }

    pub fn results_with_condition_and_display(&self, output_id: Option<&str>) -> String {
        let indices = intersect(
            self.classifier.with_conditions(),
            self.classifier.with_display(),
        );
        html! {
            h2 { "Check With Conditions Output" }
            (self.render_results(&indices, output_id))
        }
        .into_string()
    }

    pub fn results_without_condition(&self, output_id: Option<&str>) -> String {
        let indices = intersect(
            self.classifier.without_conditions(),
            self.classifier.with_display(),
        );
        html! {
            h2 { "Check Without Conditions Output" }
            (self.render_results(&indices, output_id))
        }
        .into_string()
    }

    /// Conditions are already in the summary table, so only the additional
    /// output of each result is rendered, without its own scripts.
    fn render_results(&self, indices: &[usize], output_id: Option<&str>) -> Markup {
        let suite = self.classifier.suite();
        let results: Vec<(usize, &CheckResult)> = indices
            .iter()
            .filter_map(|&i| suite.results.get(i).and_then(Outcome::as_success).map(|r| (i, r)))
            .collect();
        let rendered: Vec<String> = results
            .par_iter()
            .map(|(index, r)| {
                let anchor = output_id.map(|id| form_check_anchor(id, *index, &r.header));
                self.renderer.render(
                    r,
                    anchor.as_deref(),
                    &[CheckSection::AdditionalOutput],
                    false,
                )
            })
            .collect();

        html! {
            @for (i, fragment) in rendered.iter().enumerate() {
                @if i > 0 { (light_hr()) }
                (PreEscaped(fragment))
            }
        }
    }

    /// Failed checks first, then results with nothing to display, each in
    /// run order.
    pub fn failures_list(&self) -> String {
        let indices = union(
            self.classifier.failures(),
            self.classifier.without_display(),
        );
        if indices.is_empty() {
            return String::new();
        }

        let mut rows: Vec<(u8, Vec<String>)> = self
            .classifier
            .select(&indices)
            .into_iter()
            .map(|outcome| match outcome {
                Outcome::Failure(f) => (1, vec![f.header.clone(), f.error.display_message()]),
                Outcome::Success(r) => (2, vec![r.header.clone(), NOTHING_FOUND.to_string()]),
            })
            .collect();
        rows.sort_by_key(|(priority, _)| *priority);

        let mut table = DisplayTable::new(vec!["Check".to_string(), "Reason".to_string()]);
        for (_, row) in rows {
            table.push_row(row);
        }
        html! {
            h2 { "Other Checks That Weren't Displayed" }
            (PreEscaped(self.table_renderer.render(&table)))
        }
        .into_string()
    }
}
