use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use checksuite_core::readers::{read_dataset, write_csv};
use checksuite_core::{Context, KeepPolicy, Outcome, Suite, SuiteResult, TabularView};
use checksuite_reports::{
    JsonFormatter, ReportAssembler, Reporter, ScriptResources, SerializeOptions, StdOutFormatter,
};
use tracing::{info, warn};

use crate::config::{parse_config, Config, DatasetConfig, ReportConfig};
use crate::errors::CliError;
use crate::writer::{resolve_file_path, timestamp, write_output};
use crate::{FixArgs, OutputFormat, RunArgs};

const REQUIREJS_ASSET: &str = "require.min.js";
const PLOTLYJS_ASSET: &str = "plotly.min.js";

/// Run the configured suite and write its report.
///
/// Returns whether every check ran and every condition passed.
pub fn run(args: &RunArgs) -> Result<bool> {
    let config = parse_config(&args.config)?;
    let version = env!("CARGO_PKG_VERSION").to_string();

    let result = match args.output {
        OutputFormat::Stdout => {
            let mut formatter = StdOutFormatter::new(version);
            execute(&config, &mut formatter)?
        }
        OutputFormat::Json => {
            let mut formatter = JsonFormatter::new(version);
            let result = execute(&config, &mut formatter)?;
            let path = resolve_file_path(&args.out, &format!("report_{}.json", timestamp()))?;
            write_output(&path, &formatter.to_json()?)?;
            println!("Report written to {}", path.display());
            result
        }
        OutputFormat::Html => {
            let mut formatter = StdOutFormatter::new(version);
            let result = execute(&config, &mut formatter)?;
            let options = serialize_options(&config.report, args.full_html);
            let resources = load_resources(&config.report)?;
            let html = ReportAssembler::new()
                .with_resources(resources)
                .serialize(&result, &options);
            let path = resolve_file_path(&args.out, &format!("report_{}.html", timestamp()))?;
            write_output(&path, &html)?;
            println!("Report written to {}", path.display());
            result
        }
    };
    Ok(result.passed())
}

/// Apply the fix of one check to the train dataset and write it as csv.
pub fn fix(args: &FixArgs) -> Result<()> {
    let config = parse_config(&args.config)?;
    let formatter = StdOutFormatter::new(env!("CARGO_PKG_VERSION").to_string());
    formatter.on_start();
    formatter.on_loading();
    let context = load_context(&config.dataset, &formatter)?;
    let suite = build_suite(&config);

    let check = suite.find(&args.check).ok_or_else(|| CliError::UnknownCheck {
        name: args.check.clone(),
        suite: suite.name().to_string(),
    })?;
    let fixable = check.as_fixable().ok_or_else(|| CliError::NotFixable {
        name: args.check.clone(),
    })?;
    let keep: KeepPolicy = args.keep.into();
    let fixed = fixable.fix(&context, keep).map_err(CliError::from)?;

    let path = resolve_file_path(&args.out, &format!("fixed_{}.csv", timestamp()))?;
    write_csv(&fixed.fixed_train, &path)
        .with_context(|| format!("Failed to write fixed dataset: {}", path.display()))?;
    info!(
        check = %args.check,
        %keep,
        rows = fixed.fixed_train.row_count(),
        path = %path.display(),
        "fixed dataset written"
    );
    println!(
        "Fixed dataset ({} rows) written to {}",
        fixed.fixed_train.row_count(),
        path.display()
    );
    Ok(())
}

fn execute<R: Reporter>(config: &Config, reporter: &mut R) -> Result<SuiteResult> {
    reporter.on_start();
    reporter.on_loading();
    let context = load_context(&config.dataset, reporter)?;
    let suite = build_suite(config);

    reporter.on_run_start();
    let result = suite.run(&context);
    reporter.on_suite_result(&result);

    let passed = result
        .results
        .iter()
        .filter(|o| matches!(o, Outcome::Success(r) if r.passed_conditions()))
        .count();
    reporter.on_summary(passed, result.results.len() - passed);
    Ok(result)
}

fn load_context<R: Reporter>(dataset: &DatasetConfig, reporter: &R) -> Result<Context> {
    let reader_config = dataset.reader_config()?;
    let total = if dataset.test.is_some() { 2 } else { 1 };

    let train = read_dataset(&dataset.train, &reader_config)
        .with_context(|| format!("Failed to load train dataset: '{}'", dataset.train))?;
    reporter.on_dataset_load(1, total, train.name(), train.row_count());
    let mut context = Context::new(train);

    if let Some(test_path) = &dataset.test {
        let test = read_dataset(test_path, &reader_config)
            .with_context(|| format!("Failed to load test dataset: '{}'", test_path))?;
        reporter.on_dataset_load(2, total, test.name(), test.row_count());
        context = context.with_test(test);
    }
    Ok(context)
}

fn build_suite(config: &Config) -> Suite {
    config
        .checks
        .iter()
        .fold(Suite::new(config.suite.name.clone()), |suite, check| {
            suite.add(check.build())
        })
        .with_extra_info(config.suite.extra_info.clone())
}

fn serialize_options(report: &ReportConfig, full_html: bool) -> SerializeOptions {
    let mut options = if full_html || report.full_html {
        SerializeOptions::full_html()
    } else {
        SerializeOptions::default()
    };
    if let Some(id) = &report.output_id {
        options = options.with_output_id(id.clone());
    }
    options
}

/// Inline library code read from the assets directory, when configured.
fn load_resources(report: &ReportConfig) -> Result<ScriptResources> {
    let mut resources = ScriptResources::new();
    let Some(dir) = &report.assets_dir else {
        return Ok(resources);
    };
    if let Some(code) = read_asset(dir, REQUIREJS_ASSET)? {
        resources = resources.with_requirejs(code);
    }
    if let Some(code) = read_asset(dir, PLOTLYJS_ASSET)? {
        resources = resources.with_plotlyjs(code);
    }
    Ok(resources)
}

fn read_asset(dir: &Path, name: &str) -> Result<Option<String>> {
    let path = dir.join(name);
    if !path.exists() {
        warn!(path = %path.display(), "asset not found, using the bundled default");
        return Ok(None);
    }
    let code = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read asset: {}", path.display()))?;
    Ok(Some(code))
}
