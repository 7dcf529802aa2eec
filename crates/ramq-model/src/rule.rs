use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::BillingRecord;
use crate::violation::{RuleCategory, Severity, Violation};

/// Per-run context handed to every rule by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Identifier correlating every finding of one validation run.
    pub run_id: String,
}

impl RunContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
        }
    }
}

/// A non-finding condition a rule wants to surface (e.g. the rule had
/// nothing to check because its configuration resolved to an empty code
/// set). Returned alongside the violation list instead of being buried in a
/// logging sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Everything one rule invocation produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleOutput {
    pub violations: Vec<Violation>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RuleOutput {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_diagnostic(diagnostic: Diagnostic) -> Self {
        Self {
            violations: Vec::new(),
            diagnostics: vec![diagnostic],
        }
    }
}

/// Contract between the orchestrator and every billing rule.
///
/// `validate` receives the full record batch in scope for the run; a rule is
/// a pure, read-only computation over the batch plus whatever reference data
/// it fetches itself. Errors (e.g. a failed catalogue fetch) propagate to
/// the orchestrator uncaught; the rule performs no retry and no partial
/// recovery.
pub trait Rule: Send + Sync {
    /// Stable rule identifier, attached to every finding.
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    fn category(&self) -> RuleCategory;

    /// Disabled rules are registered but skipped by the orchestrator.
    fn enabled(&self) -> bool {
        true
    }

    fn validate(&self, records: &[BillingRecord], ctx: &RunContext) -> Result<RuleOutput>;
}
