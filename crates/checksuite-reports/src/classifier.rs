//! Grouping of suite outcomes for report sections.
//!
//! Groups are ordered index sets into [`SuiteResult::results`], so an
//! outcome can belong to several groups without being copied.

use checksuite_core::{CheckResult, Outcome, SuiteResult};

pub type IndexSet = Vec<usize>;

#[derive(Debug, Clone)]
pub struct ResultClassifier<'a> {
    result: &'a SuiteResult,
    with_conditions: IndexSet,
    without_conditions: IndexSet,
    failures: IndexSet,
    with_display: IndexSet,
    without_display: IndexSet,
}

impl<'a> ResultClassifier<'a> {
    pub fn new(result: &'a SuiteResult) -> Self {
        let mut classifier = Self {
            result,
            with_conditions: Vec::new(),
            without_conditions: Vec::new(),
            failures: Vec::new(),
            with_display: Vec::new(),
            without_display: Vec::new(),
        };

        for (index, outcome) in result.results.iter().enumerate() {
            match outcome {
                Outcome::Success(r) => {
                    if r.have_conditions() {
                        classifier.with_conditions.push(index);
                    } else {
                        classifier.without_conditions.push(index);
                    }
                    if r.have_display() {
                        classifier.with_display.push(index);
                    } else {
                        classifier.without_display.push(index);
                    }
                }
                Outcome::Failure(_) => classifier.failures.push(index),
            }
        }
        classifier
    }

    pub fn suite(&self) -> &'a SuiteResult {
        self.result
    }

    pub fn with_conditions(&self) -> &[usize] {
        &self.with_conditions
    }

    pub fn without_conditions(&self) -> &[usize] {
        &self.without_conditions
    }

    pub fn failures(&self) -> &[usize] {
        &self.failures
    }

    pub fn with_display(&self) -> &[usize] {
        &self.with_display
    }

    pub fn without_display(&self) -> &[usize] {
        &self.without_display
    }

    /// Resolve indices into outcomes, in index order.
    pub fn select(&self, indices: &[usize]) -> Vec<&'a Outcome> {
        indices
            .iter()
            .filter_map(|&i| self.result.results.get(i))
            .collect()
    }

    /// Resolve indices into successful results, skipping failures.
    pub fn select_successes(&self, indices: &[usize]) -> Vec<&'a CheckResult> {
        self.select(indices)
            .into_iter()
            .filter_map(Outcome::as_success)
            .collect()
    }
}

/// Indices present in both sets, in run order.
pub fn intersect(a: &[usize], b: &[usize]) -> IndexSet {
    a.iter().filter(|i| b.contains(*i)).copied().collect()
}

/// Indices present in either set, in run order.
pub fn union(a: &[usize], b: &[usize]) -> IndexSet {
    let mut out: IndexSet = a.iter().chain(b).copied().collect();
    out.sort_unstable();
    out.dedup();
    out
}
