//! HTML serialization of suite results.
//!
//! ```no_run
//! use checksuite_reports::{ReportAssembler, SerializeOptions};
//! # fn render(result: &checksuite_core::SuiteResult) -> String {
//! ReportAssembler::new().serialize(result, &SerializeOptions::full_html())
//! # }
//! ```

mod assembler;
mod check_result;
pub mod common;
pub mod sections;
mod table;

#[cfg(test)]
mod tests;

pub use assembler::{ReportAssembler, SerializeOptions};
pub use check_result::CheckResultHtmlRenderer;
pub use common::ScriptResources;
pub use sections::{ReportSections, SectionBuilder};
pub use table::HtmlTableRenderer;
