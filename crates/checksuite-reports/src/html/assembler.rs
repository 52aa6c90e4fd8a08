use checksuite_core::SuiteResult;
use maud::{html, PreEscaped, DOCTYPE};
use tracing::debug;

use crate::classifier::ResultClassifier;
use crate::html::check_result::CheckResultHtmlRenderer;
use crate::html::common::{
    bold_hr, form_output_anchor, plotlyjs_script, requirejs_script, ScriptResources,
};
use crate::html::sections::{ReportSections, SectionBuilder};
use crate::html::table::HtmlTableRenderer;
use crate::{OutcomeRenderer, TableRenderer};

/// How a suite result is serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializeOptions {
    /// Unique id used to build anchors and the "Go to top" link
    pub output_id: Option<String>,
    /// Wrap the report in a standalone document
    pub full_html: bool,
    pub include_requirejs: bool,
    pub include_plotlyjs: bool,
    /// Link libraries from a CDN instead of embedding them
    pub connected: bool,
    pub include_check_name: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            output_id: None,
            full_html: false,
            include_requirejs: false,
            include_plotlyjs: true,
            connected: true,
            include_check_name: false,
        }
    }
}

impl SerializeOptions {
    /// Options for a standalone, browser-openable document.
    pub fn full_html() -> Self {
        Self {
            full_html: true,
            ..Self::default()
        }
    }

    pub fn with_output_id(self, output_id: impl Into<String>) -> Self {
        Self {
            output_id: Some(output_id.into()),
            ..self
        }
    }

    pub fn with_check_name(self, include_check_name: bool) -> Self {
        Self {
            include_check_name,
            ..self
        }
    }

    /// A standalone document embeds its libraries instead of linking them.
    fn resolved(&self) -> Self {
        if self.full_html {
            Self {
                include_plotlyjs: true,
                include_requirejs: true,
                connected: false,
                ..self.clone()
            }
        } else {
            self.clone()
        }
    }
}

/// Builds the final HTML report of a suite result.
pub struct ReportAssembler<R = CheckResultHtmlRenderer, T = HtmlTableRenderer> {
    renderer: R,
    table_renderer: T,
    resources: ScriptResources,
}

impl ReportAssembler {
    pub fn new() -> Self {
        Self::with_renderers(CheckResultHtmlRenderer::new(), HtmlTableRenderer)
    }
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: OutcomeRenderer, T: TableRenderer> ReportAssembler<R, T> {
    pub fn with_renderers(renderer: R, table_renderer: T) -> Self {
        Self {
            renderer,
            table_renderer,
            resources: ScriptResources::default(),
        }
    }

    /// Inline library code used when the report is not connected.
    pub fn with_resources(self, resources: ScriptResources) -> Self {
        Self { resources, ..self }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Classify, render and assemble in one go.
    pub fn serialize(&self, result: &SuiteResult, options: &SerializeOptions) -> String {
        let sections = self.sections(result, options);
        self.assemble(&sections, options)
    }

    pub fn sections(&self, result: &SuiteResult, options: &SerializeOptions) -> ReportSections {
        let classifier = ResultClassifier::new(result);
        debug!(
            suite = %result.name,
            with_conditions = classifier.with_conditions().len(),
            failures = classifier.failures().len(),
            "classified suite results"
        );
        SectionBuilder::new(classifier, &self.renderer, &self.table_renderer)
            .build(options.output_id.as_deref(), options.include_check_name)
    }

    /// Join sections in document order and add the shared scripts once.
    pub fn assemble(&self, sections: &ReportSections, options: &SerializeOptions) -> String {
        let options = options.resolved();

        let content = html! {
            (PreEscaped(&sections.summary))
            (bold_hr())
            (PreEscaped(&sections.conditions_table))
            (bold_hr())
            (PreEscaped(&sections.with_conditions))
            (bold_hr())
            (PreEscaped(&sections.without_conditions))
            @if !sections.failures.is_empty() {
                (bold_hr())
                (PreEscaped(&sections.failures))
            }
            @if let Some(output_id) = &options.output_id {
                br;
                a href={ "#" (form_output_anchor(output_id)) } style="font-size: 14px" { "Go to top" }
            }
        };
        let scripts = html! {
            @if options.include_requirejs {
                (requirejs_script(&self.resources, options.connected))
            }
            @if options.include_plotlyjs {
                (plotlyjs_script(&self.resources, options.connected))
            }
        };

        if !options.full_html {
            return html! { (scripts) (content) }.into_string();
        }

        html! {
            (DOCTYPE)
            html {
                head { meta charset="utf-8"; }
                body style="display: flex; flex-direction: row; justify-content: center; padding-top: 2rem;" {
                    (scripts)
                    div style="display: flex; flex-direction: column; width: min-content;" {
                        (content)
                    }
                }
            }
        }
        .into_string()
    }
}
