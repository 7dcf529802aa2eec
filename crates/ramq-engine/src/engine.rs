//! Orchestrator running every registered rule over one validation run.

use ramq_model::{BillingRecord, Diagnostic, Rule, RunContext, Violation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// A rule whose `validate` returned an error. The run continues with the
/// sibling rules; the failure is reported, not masked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleFailure {
    pub rule_id: String,
    pub error: String,
}

/// Aggregated outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub violations: Vec<Violation>,
    pub diagnostics: Vec<Diagnostic>,
    pub failures: Vec<RuleFailure>,
}

impl RunReport {
    pub fn error_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|violation| violation.severity == ramq_model::Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|violation| violation.severity == ramq_model::Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0 || !self.failures.is_empty()
    }
}

/// Holds the registered rules and dispatches them over a record batch.
#[derive(Default)]
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Run every enabled rule over the batch. A failing rule is recorded as
    /// a `RuleFailure` and never aborts its siblings.
    pub fn run(&self, records: &[BillingRecord], run_id: &str) -> RunReport {
        let ctx = RunContext::new(run_id);
        let mut report = RunReport {
            run_id: run_id.to_string(),
            violations: Vec::new(),
            diagnostics: Vec::new(),
            failures: Vec::new(),
        };

        for rule in &self.rules {
            if !rule.enabled() {
                debug!(rule = rule.id(), "rule disabled, skipping");
                continue;
            }
            match rule.validate(records, &ctx) {
                Ok(output) => {
                    debug!(
                        rule = rule.id(),
                        violations = output.violations.len(),
                        diagnostics = output.diagnostics.len(),
                        "rule completed"
                    );
                    report.violations.extend(output.violations);
                    report.diagnostics.extend(output.diagnostics);
                }
                Err(err) => {
                    error!(rule = rule.id(), error = %err, "rule failed");
                    report.failures.push(RuleFailure {
                        rule_id: rule.id().to_string(),
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            run_id,
            records = records.len(),
            violations = report.violations.len(),
            failures = report.failures.len(),
            "validation run complete"
        );
        report
    }
}
