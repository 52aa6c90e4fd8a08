//! Report assembly tests over hand-built and real suite results.

use std::sync::{Arc, Mutex};

use arrow::array::Int64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use checksuite_core::{
    CheckError, CheckFailure, CheckResult, ConditionCategory, ConditionResult, Context,
    DataDuplicates, Dataset, DisplayItem, DisplayTable, Outcome, Suite, SuiteResult,
};
use plotly::Plot;
use serde_json::json;

use crate::classifier::ResultClassifier;
use crate::html::common::{bold_hr, light_hr, PLOTLYJS_CDN, REQUIREJS_CDN};
use crate::html::sections::{SectionBuilder, NO_CONDITIONS};
use crate::html::{HtmlTableRenderer, ReportAssembler, ScriptResources, SerializeOptions};
use crate::{CheckSection, OutcomeRenderer};

// ============================================================================
// Test Utilities
// ============================================================================

fn success(header: &str, category: Option<ConditionCategory>, display: bool) -> Outcome {
    let mut result = CheckResult::new(json!(0.1));
    result.check_name = header.to_string();
    result.header = header.to_string();
    if display {
        let mut table = DisplayTable::new(vec!["Instances".to_string(), "v".to_string()])
            .with_index_width(1);
        table.push_row(vec!["0, 5".to_string(), "1".to_string()]);
        result.display = vec![
            DisplayItem::Text(format!("{} output", header)),
            DisplayItem::Table(table),
        ];
    }
    if let Some(category) = category {
        result.conditions = vec![ConditionResult {
            name: format!("{} condition", header),
            category,
            details: format!("{} details", header),
        }];
    }
    Outcome::Success(result)
}

fn failure(header: &str, error: CheckError) -> Outcome {
    Outcome::Failure(CheckFailure::new(header, header, error))
}

/// Section of the document after the given heading.
fn section_after<'a>(html: &'a str, heading: &str) -> &'a str {
    let start = html.find(heading).expect("heading present");
    &html[start..]
}

fn dataset(values: Vec<i64>) -> Dataset {
    let schema = Schema::new(vec![Field::new("a", DataType::Int64, false)]);
    let batch = RecordBatch::try_new(Arc::new(schema), vec![Arc::new(Int64Array::from(values))])
        .unwrap();
    Dataset::new("d", batch)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_failure_and_condition_result_with_display() {
    let result = SuiteResult::new(
        "Integrity",
        vec![
            failure("Broken", CheckError::Value("bad input".to_string())),
            success("Data Duplicates", Some(ConditionCategory::Fail), true),
        ],
    );
    let html = ReportAssembler::new().serialize(&result, &SerializeOptions::default());

    assert!(!html.contains(NO_CONDITIONS));
    assert!(html.contains("<h2>Conditions Summary</h2>"));
    assert!(html.contains("Data Duplicates condition"));

    let with_conditions = section_after(&html, "<h2>Check With Conditions Output</h2>");
    assert!(with_conditions.contains("<b>Data Duplicates</b>"));
    assert!(with_conditions.contains("<div>Data Duplicates output</div>"));

    let failures = section_after(&html, "<h2>Other Checks That Weren't Displayed</h2>");
    // header row plus one failure row
    assert_eq!(failures.matches("<tr>").count(), 2);
    assert!(failures.contains("<td>Broken</td><td>ValueError: bad input</td>"));
}

#[test]
fn test_report_from_suite_run() {
    let suite = Suite::new("Data Integrity")
        .add(DataDuplicates::new().add_condition_ratio_less_or_equal(0.))
        .with_extra_info(vec!["Nightly run".to_string()]);
    let context = Context::new(dataset(vec![1, 1, 2, 3])).with_test(dataset(vec![]));
    let result = suite.run(&context);

    let html = ReportAssembler::new().serialize(&result, &SerializeOptions::full_html());
    assert!(html.starts_with("<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head>"));
    assert!(html.ends_with("</div></body></html>"));
    assert!(html.contains("<h1>Data Integrity</h1>"));
    assert!(html.contains("<div>Nightly run</div>"));
    assert!(html.contains("Duplicate data ratio is less or equal to 0%"));
    assert!(html.contains("Found 25% duplicate data"));
    assert!(html.contains("25% of data samples are duplicates. "));
    assert!(html.contains(
        "<td>Data Duplicates - Test Dataset</td><td>Dataset does not contain any data</td>"
    ));
}

#[test]
fn test_resource_bootstrap_included_once() {
    let result = SuiteResult::new(
        "s",
        vec![
            success("A", Some(ConditionCategory::Pass), true),
            success("B", None, true),
            success("C", None, true),
        ],
    );

    // Nothing supplied: bundled plotly.js once, no require.js, no CDN
    let html = ReportAssembler::new().serialize(&result, &SerializeOptions::full_html());
    assert_eq!(html.matches(Plot::offline_js_sources().as_str()).count(), 1);
    assert!(!html.contains(PLOTLYJS_CDN));
    assert!(!html.contains(REQUIREJS_CDN));
    assert!(!html.contains(r#"<script type="text/javascript" src="#));

    let resources = ScriptResources::new()
        .with_requirejs("/*require*/")
        .with_plotlyjs("/*plotly*/");
    let html = ReportAssembler::new()
        .with_resources(resources)
        .serialize(&result, &SerializeOptions::full_html());
    assert_eq!(html.matches("/*require*/").count(), 1);
    assert_eq!(html.matches("/*plotly*/").count(), 1);
    assert_eq!(html.matches("<script").count(), 2);
    assert!(!html.contains("src=\"https://"));
}

#[test]
fn test_fragment_defaults() {
    let result = SuiteResult::new("s", vec![success("A", None, true)]);
    let html = ReportAssembler::new().serialize(&result, &SerializeOptions::default());
    assert!(html.starts_with(&format!(
        r#"<script type="text/javascript" src="{}"></script><h1>"#,
        PLOTLYJS_CDN
    )));
    assert!(!html.contains(REQUIREJS_CDN));
    assert!(!html.contains("<html>"));
}

#[test]
fn test_assemble_is_idempotent() {
    let result = SuiteResult::new(
        "s",
        vec![
            success("A", Some(ConditionCategory::Warn), true),
            failure("B", CheckError::EmptyDataset),
            success("C", None, true),
        ],
    );
    let assembler = ReportAssembler::new();
    let options = SerializeOptions::full_html().with_output_id("abc");
    let sections = assembler.sections(&result, &options);
    assert_eq!(
        assembler.assemble(&sections, &options),
        assembler.assemble(&sections, &options)
    );
    assert_eq!(
        assembler.serialize(&result, &options),
        assembler.serialize(&result, &options)
    );
}

#[test]
fn test_empty_groups_render_placeholders() {
    let result = SuiteResult::new("s", vec![success("A", None, true)]);
    let html = ReportAssembler::new().serialize(&result, &SerializeOptions::default());

    assert!(html.contains(NO_CONDITIONS));
    assert!(html.contains("<h2>Check With Conditions Output</h2><hr"));
    assert!(!html.contains("Other Checks That Weren't Displayed"));
    assert_eq!(html.matches(bold_hr().into_string().as_str()).count(), 3);
}

#[test]
fn test_failures_sorted_by_priority_then_run_order() {
    let result = SuiteResult::new(
        "s",
        vec![
            success("Quiet", None, false),
            failure("Domain", CheckError::DatasetValidation("no label".to_string())),
            success("Quiet Too", Some(ConditionCategory::Pass), false),
            failure("Internal", CheckError::Process("stuck".to_string())),
            failure(
                "Crash",
                CheckError::Execution {
                    kind: "Panic".to_string(),
                    message: "boom".to_string(),
                },
            ),
        ],
    );
    let classifier = ResultClassifier::new(&result);
    let renderer = crate::html::CheckResultHtmlRenderer::new();
    let failures = SectionBuilder::new(classifier, &renderer, &HtmlTableRenderer).failures_list();

    let order: Vec<usize> = [
        "<td>Domain</td><td>no label</td>",
        "<td>Internal</td><td>stuck</td>",
        "<td>Crash</td><td>Panic: boom</td>",
        "<td>Quiet</td><td>Nothing found</td>",
        "<td>Quiet Too</td><td>Nothing found</td>",
    ]
    .iter()
    .map(|row| failures.find(row).expect("row present"))
    .collect();
    let mut sorted = order.clone();
    sorted.sort_unstable();
    assert_eq!(order, sorted);
}

#[test]
fn test_prologue_names() {
    let renderer = crate::html::CheckResultHtmlRenderer::new();

    let short = SuiteResult::new(
        "s",
        vec![success("A", None, true), success("A", None, true), success("B", None, true)],
    );
    let builder = SectionBuilder::new(ResultClassifier::new(&short), &renderer, &HtmlTableRenderer);
    assert_eq!(builder.prologue(), "The suite is composed of the following checks: A, B.");

    let long = SuiteResult::new(
        "s",
        ["A", "B", "C", "D"]
            .iter()
            .map(|n| success(n, None, true))
            .collect(),
    );
    let builder = SectionBuilder::new(ResultClassifier::new(&long), &renderer, &HtmlTableRenderer);
    assert_eq!(
        builder.prologue(),
        "The suite is composed of various checks such as: A, B, C, etc..."
    );
}

#[test]
fn test_output_id_anchors() {
    let result = SuiteResult::new("s", vec![success("A", None, true)]);
    let html = ReportAssembler::new().serialize(&result, &SerializeOptions::default().with_output_id("r1"));
    assert!(html.contains(r#"<h1 id="summary_r1">s</h1>"#));
    assert!(html.ends_with(r##"<br><a href="#summary_r1" style="font-size: 14px">Go to top</a>"##));
}

#[test]
fn test_repeated_headers_get_distinct_anchors() {
    let result = SuiteResult::new(
        "s",
        vec![
            success("Data Duplicates", Some(ConditionCategory::Fail), true),
            success("Data Duplicates", Some(ConditionCategory::Pass), true),
        ],
    );
    let html = ReportAssembler::new()
        .serialize(&result, &SerializeOptions::default().with_output_id("r"));
    assert_eq!(html.matches(r#"<h3 id="r-0-data-duplicates">"#).count(), 1);
    assert_eq!(html.matches(r#"<h3 id="r-1-data-duplicates">"#).count(), 1);
}

#[test]
fn test_summary_icons_are_coloured() {
    let result = SuiteResult::new("s", vec![success("A", None, true)]);
    let html = ReportAssembler::new().serialize(&result, &SerializeOptions::default());
    let summary = &html[..html.find("</p>").expect("summary paragraph")];

    assert!(summary.contains(
        "represented by <span style=\"color: green;display:inline-block\">\u{2713}</span> / \
         <span style=\"color: red;display:inline-block\">\u{2716}</span> / \
         <span style=\"color: orange;font-weight:bold;display:inline-block\">!</span> / \
         <span style=\"color: firebrick;font-weight:bold;display:inline-block\">\u{2048}</span>)"
    ));
}

#[test]
fn test_text_is_escaped() {
    let result = SuiteResult::new("<b>Suite</b> & co", vec![success("A", None, true)])
        .with_extra_info(vec!["x < y".to_string()]);
    let html = ReportAssembler::new().serialize(&result, &SerializeOptions::default());
    assert!(html.contains("<h1>&lt;b&gt;Suite&lt;/b&gt; &amp; co</h1>"));
    assert!(html.contains("<br><div>x &lt; y</div>"));
}

#[test]
fn test_include_check_name_column() {
    let result = SuiteResult::new("s", vec![success("A", Some(ConditionCategory::Fail), true)]);
    let options = SerializeOptions::default().with_check_name(true);
    let html = ReportAssembler::new().serialize(&result, &options);
    assert!(html.contains("<th>Status</th><th>Check</th><th>Condition</th><th>More Info</th>"));
}

// ============================================================================
// Renderer injection
// ============================================================================

#[derive(Default)]
struct RecordingRenderer {
    calls: Mutex<Vec<(String, Vec<CheckSection>, bool)>>,
}

impl OutcomeRenderer for RecordingRenderer {
    fn render(
        &self,
        result: &CheckResult,
        _anchor_id: Option<&str>,
        sections: &[CheckSection],
        include_resources: bool,
    ) -> String {
        self.calls.lock().unwrap().push((
            result.header.clone(),
            sections.to_vec(),
            include_resources,
        ));
        format!("[{}]", result.header)
    }
}

#[test]
fn test_inner_renders_are_additional_output_without_resources() {
    let result = SuiteResult::new(
        "s",
        vec![
            success("A", Some(ConditionCategory::Pass), true),
            success("B", None, true),
            success("C", None, true),
            success("D", None, false),
        ],
    );
    let assembler = ReportAssembler::with_renderers(RecordingRenderer::default(), HtmlTableRenderer);
    let html = assembler.serialize(&result, &SerializeOptions::full_html());

    let calls = assembler_calls(&assembler);
    assert_eq!(calls.len(), 3);
    assert!(calls
        .iter()
        .all(|(_, sections, resources)| sections == &[CheckSection::AdditionalOutput] && !resources));
    // Parallel rendering keeps run order
    assert!(html.contains(&format!("[B]{}[C]", light_hr().into_string())));
}

fn assembler_calls(
    assembler: &ReportAssembler<RecordingRenderer, HtmlTableRenderer>,
) -> Vec<(String, Vec<CheckSection>, bool)> {
    assembler.renderer().calls.lock().unwrap().clone()
}
