use checksuite_core::{CheckResult, ConditionCategory, DisplayItem};
use maud::{html, Markup, PreEscaped};

use crate::html::common::{
    aggregate_conditions, plotlyjs_script, requirejs_script, ScriptResources,
};
use crate::html::table::HtmlTableRenderer;
use crate::{CheckSection, OutcomeRenderer, TableRenderer};

const MAX_CHECK_INFO_LEN: usize = 3000;

/// Default HTML rendering of a single check result.
#[derive(Debug, Clone, Default)]
pub struct CheckResultHtmlRenderer {
    table_renderer: HtmlTableRenderer,
    resources: ScriptResources,
}

impl CheckResultHtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resources(self, resources: ScriptResources) -> Self {
        Self { resources, ..self }
    }

    fn header(&self, result: &CheckResult, anchor_id: Option<&str>) -> Markup {
        html! {
            h3 id=[anchor_id] { b { (result.header) } }
        }
    }

    fn condition_table(&self, result: &CheckResult) -> Markup {
        if !result.have_conditions() {
            return html! {};
        }
        let table = aggregate_conditions(&[result], false, MAX_CHECK_INFO_LEN);
        html! {
            h5 { b { "Conditions Summary" } }
            (PreEscaped(self.table_renderer.render(&table)))
        }
    }

    fn additional_output(&self, result: &CheckResult) -> Markup {
        html! {
            h5 { b { "Additional Outputs" } }
            @if !result.have_display() {
                p { b { (ConditionCategory::Pass.icon()) } "Nothing to display" }
            }
            @for item in &result.display {
                @match item {
                    DisplayItem::Text(text) => { div { (text) } }
                    DisplayItem::Table(table) => { (PreEscaped(self.table_renderer.render(table))) }
                }
            }
        }
    }
}

impl OutcomeRenderer for CheckResultHtmlRenderer {
    fn render(
        &self,
        result: &CheckResult,
        anchor_id: Option<&str>,
        sections: &[CheckSection],
        include_resources: bool,
    ) -> String {
        html! {
            @if include_resources {
                (requirejs_script(&self.resources, true))
                (plotlyjs_script(&self.resources, true))
            }
            (self.header(result, anchor_id))
            @for section in sections {
                @match section {
                    CheckSection::ConditionTable => { (self.condition_table(result)) }
                    CheckSection::AdditionalOutput => { (self.additional_output(result)) }
                }
            }
        }
        .into_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checksuite_core::{ConditionCategory, ConditionResult, DisplayTable};
    use serde_json::json;

    fn result() -> CheckResult {
        let mut table = DisplayTable::new(vec!["Instances".to_string(), "v".to_string()])
            .with_index_width(1);
        table.push_row(vec!["0, 1".to_string(), "7".to_string()]);

        let mut r = CheckResult::new(json!(0.5)).with_display(vec![
            DisplayItem::Text("50% of data samples are duplicates. ".to_string()),
            DisplayItem::Table(table),
        ]);
        r.header = "Data Duplicates".to_string();
        r.conditions = vec![ConditionResult {
            name: "ratio".to_string(),
            category: ConditionCategory::Fail,
            details: "Found 50% duplicate data".to_string(),
        }];
        r
    }

    #[test]
    fn test_additional_output_only() {
        let html = CheckResultHtmlRenderer::new().render(
            &result(),
            Some("out-0-data-duplicates"),
            &[CheckSection::AdditionalOutput],
            false,
        );
        assert!(html.starts_with(r#"<h3 id="out-0-data-duplicates"><b>Data Duplicates</b></h3>"#));
        assert!(html.contains("<div>50% of data samples are duplicates. </div>"));
        assert!(html.contains("<th>0, 1</th><td>7</td>"));
        assert!(!html.contains("Conditions Summary"));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn test_all_sections_with_resources() {
        let html = CheckResultHtmlRenderer::new().render(&result(), None, &CheckSection::ALL, true);
        assert!(html.starts_with("<script"));
        assert!(html.contains("<h3><b>Data Duplicates</b></h3>"));
        assert!(html.contains("<h5><b>Conditions Summary</b></h5>"));
        assert!(html.contains("Found 50% duplicate data"));
    }

    #[test]
    fn test_nothing_to_display() {
        let mut r = result();
        r.display.clear();
        let html =
            CheckResultHtmlRenderer::new().render(&r, None, &[CheckSection::AdditionalOutput], false);
        assert!(html.ends_with("<p><b>\u{2713}</b>Nothing to display</p>"));
    }

    #[test]
    fn test_markup_in_text_is_escaped() {
        let mut r = result();
        r.header = "<script>alert(1)</script>".to_string();
        r.display = vec![DisplayItem::Text("a & \"b\"".to_string())];
        let html =
            CheckResultHtmlRenderer::new().render(&r, None, &[CheckSection::AdditionalOutput], false);
        assert!(html.starts_with("<h3><b>&lt;script&gt;alert(1)&lt;/script&gt;</b></h3>"));
        assert!(html.contains("<div>a &amp; &quot;b&quot;</div>"));
    }
}
