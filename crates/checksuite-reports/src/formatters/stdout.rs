use checksuite_core::{Outcome, SuiteResult};
use prettytable::{Cell, Row, Table};

use crate::{utils::numbers::format_numbers, Reporter};

pub struct StdOutFormatter {
    intro: String,
    intro_len: usize,
}

impl StdOutFormatter {
    pub fn new(version: String) -> Self {
        let s = format!("CheckSuite v{} - Suite Report", version);
        let n = s.len();
        Self {
            intro: s,
            intro_len: n,
        }
    }

    pub fn print_loading_start(&self) {
        println!("Loading data...");
    }

    pub fn print_loading_progress(&self, current: usize, total: usize, name: &str, n_rows: usize) {
        println!("  [{}/{}] {} ({} rows)", current, total, name, format_numbers(n_rows));
    }

    pub fn print_run_start(&self) {
        println!("\nRunning checks...");
    }

    pub fn print_suite_result(&self, result: &SuiteResult) {
        let status = if result.passed() { "PASSED" } else { "FAILED" };
        println!("\n{} - {}", result.name, status);

        for outcome in &result.results {
            let line = match outcome {
                Outcome::Success(r) if !r.have_conditions() => "done".to_string(),
                Outcome::Success(r) if r.passed_conditions() => "passed".to_string(),
                Outcome::Success(_) => "failed".to_string(),
                Outcome::Failure(f) => format!("error: {}", f.error.display_message()),
            };
            println!("  {} ... {}", outcome.header(), line);
        }

        let conditions = conditions_table(result);
        if !conditions.is_empty() {
            println!("\nConditions Summary");
            print!("{}", conditions);
        }
    }

    pub fn print_summary(&self, passed: usize, failed: usize) {
        println!("\n===================================");
        println!("Result: {} failed, {} passed", failed, passed);
    }
}

/// Condition rows of every successful result, worst verdict first.
pub fn conditions_table(result: &SuiteResult) -> Table {
    let mut rows: Vec<(u8, Row)> = result
        .results
        .iter()
        .filter_map(Outcome::as_success)
        .flat_map(|r| {
            r.conditions.iter().map(move |c| {
                (
                    c.category.priority(),
                    Row::new(vec![
                        Cell::new(c.category.icon()),
                        Cell::new(&r.header),
                        Cell::new(&c.name),
                        Cell::new(&c.details),
                    ]),
                )
            })
        })
        .collect();
    rows.sort_by_key(|(priority, _)| *priority);

    let mut table = Table::new();
    if rows.is_empty() {
        return table;
    }
    table.set_titles(Row::new(vec![
        Cell::new("Status"),
        Cell::new("Check"),
        Cell::new("Condition"),
        Cell::new("More Info"),
    ]));
    for (_, row) in rows {
        table.add_row(row);
    }
    table
}

impl Reporter for StdOutFormatter {
    fn on_start(&self) {
        let i = "=".repeat(self.intro_len);

        println!("{}", self.intro);
        println!("{}", i);
    }

    fn on_loading(&self) {
        self.print_loading_start();
    }

    fn on_dataset_load(&self, current: usize, total: usize, name: &str, n_rows: usize) {
        self.print_loading_progress(current, total, name, n_rows);
    }

    fn on_run_start(&self) {
        self.print_run_start();
    }

    fn on_suite_result(&mut self, result: &SuiteResult) {
        self.print_suite_result(result);
    }

    fn on_summary(&self, passed: usize, failed: usize) {
        self.print_summary(passed, failed);
    }
}
