//! Markup helpers shared by the HTML renderers.

use checksuite_core::utils::truncate_string;
use checksuite_core::{CheckResult, ConditionCategory, DisplayTable};
use maud::{html, Markup, PreEscaped};
use plotly::Plot;
use tracing::debug;

const BOLD_HR_STYLE: &str = "background-color: black;border: 0 none;color: black;height: 1px;";
const LIGHT_HR_STYLE: &str = "background-color: #eee;border: 0 none;color: #eee;height: 4px;";

pub const REQUIREJS_CDN: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/require.js/2.3.6/require.min.js";
pub const PLOTLYJS_CDN: &str = "https://cdn.plot.ly/plotly-2.20.0.min.js";

/// Longest condition detail kept in suite-level condition tables.
pub const MAX_INFO_LEN: usize = 300;

/// Rule between report sections.
pub fn bold_hr() -> Markup {
    html! { hr style=(BOLD_HR_STYLE); }
}

/// Rule between check results of one section.
pub fn light_hr() -> Markup {
    html! { hr style=(LIGHT_HR_STYLE); }
}

/// Anchor id of a report's title.
pub fn form_output_anchor(output_id: &str) -> String {
    format!("summary_{}", output_id)
}

/// Anchor id of one check block inside a report.
///
/// `index` is the position of the outcome in the suite result, so checks
/// sharing a header still get distinct ids.
pub fn form_check_anchor(output_id: &str, index: usize, header: &str) -> String {
    let slug: String = header
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    format!("{}-{}-{}", output_id, index, slug)
}

/// Coloured verdict icon used in the report summary.
pub fn verdict_icon(category: ConditionCategory) -> Markup {
    let style = match category {
        ConditionCategory::Pass => "color: green;display:inline-block",
        ConditionCategory::Fail => "color: red;display:inline-block",
        ConditionCategory::Warn => "color: orange;font-weight:bold;display:inline-block",
        ConditionCategory::Error => "color: firebrick;font-weight:bold;display:inline-block",
    };
    html! { span style=(style) { (category.icon()) } }
}

/// Library code embedded in standalone documents.
///
/// Without supplied code, plotly.js comes from the build bundled with the
/// `plotly` crate. require.js has no bundled build and is left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptResources {
    pub requirejs: Option<String>,
    pub plotlyjs: Option<String>,
}

impl ScriptResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_requirejs(self, code: impl Into<String>) -> Self {
        Self {
            requirejs: Some(code.into()),
            ..self
        }
    }

    pub fn with_plotlyjs(self, code: impl Into<String>) -> Self {
        Self {
            plotlyjs: Some(code.into()),
            ..self
        }
    }
}

pub fn requirejs_script(resources: &ScriptResources, connected: bool) -> Markup {
    if connected {
        return cdn_script(REQUIREJS_CDN);
    }
    match resources.requirejs.as_deref() {
        Some(code) => inline_script(code),
        None => {
            debug!(library = "requirejs", "no inline code supplied, leaving it out");
            html! {}
        }
    }
}

pub fn plotlyjs_script(resources: &ScriptResources, connected: bool) -> Markup {
    if connected {
        return cdn_script(PLOTLYJS_CDN);
    }
    match resources.plotlyjs.as_deref() {
        Some(code) => inline_script(code),
        // Already wrapped in its own script tags
        None => PreEscaped(Plot::offline_js_sources()),
    }
}

fn cdn_script(src: &str) -> Markup {
    html! { script type="text/javascript" src=(src) {} }
}

fn inline_script(code: &str) -> Markup {
    html! { script type="text/javascript" { (PreEscaped(code)) } }
}

/// One table of every condition verdict, worst verdicts first.
///
/// Details longer than `max_info_len` characters are cut and marked.
pub fn aggregate_conditions(
    results: &[&CheckResult],
    include_check_name: bool,
    max_info_len: usize,
) -> DisplayTable {
    let mut rows: Vec<(u8, Vec<String>)> = Vec::new();
    for result in results {
        for condition in &result.conditions {
            let mut row = vec![condition.category.icon().to_string()];
            if include_check_name {
                row.push(result.header.clone());
            }
            row.push(condition.name.clone());
            row.push(truncate_string(&condition.details, max_info_len));
            rows.push((condition.category.priority(), row));
        }
    }
    rows.sort_by_key(|(priority, _)| *priority);

    let mut columns = vec!["Status".to_string()];
    if include_check_name {
        columns.push("Check".to_string());
    }
    columns.push("Condition".to_string());
    columns.push("More Info".to_string());

    let mut table = DisplayTable::new(columns);
    for (_, row) in rows {
        table.push_row(row);
    }
    table
}
