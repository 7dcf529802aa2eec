use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Rule family, used to group findings in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Frequency / multiplicity constraints (at most N per period).
    Frequency,
    /// Catalogue membership and status constraints.
    Catalogue,
    /// Codes that may not be billed together.
    Prohibition,
    /// Minimum-delay constraints between acts.
    TimeRestriction,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Frequency => "frequency",
            RuleCategory::Catalogue => "catalogue",
            RuleCategory::Prohibition => "prohibition",
            RuleCategory::TimeRestriction => "time_restriction",
        }
    }
}

/// A rule finding for one group of billing records.
///
/// Created once per violated group and never mutated afterwards; ownership
/// passes to the orchestrator, which persists or renders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Validation run this finding belongs to, attached verbatim from the
    /// run context.
    pub run_id: String,
    /// Identifier of the rule that produced the finding.
    pub rule_id: String,
    pub severity: Severity,
    pub category: RuleCategory,
    /// Human-readable description of the finding.
    pub message: String,
    /// Suggested remediation.
    pub solution: String,
    /// Representative affected record: the first record of the group in
    /// input order. The choice is arbitrary but deterministic for a given
    /// input ordering.
    pub record_id: Option<String>,
    /// Comma-joined deduplicated claim identifiers across the group, `None`
    /// when no record carried one.
    pub claim_ids: Option<String>,
    /// Every record of the group, each exactly once.
    pub affected_record_ids: Vec<String>,
    /// Every quantity used to derive the message (counts, dates, amounts,
    /// tariff, monetary impact), so consumers can re-derive the narrative
    /// without re-querying records.
    pub rule_data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Error).expect("serialize"),
            "\"error\""
        );
        assert_eq!(
            serde_json::to_string(&RuleCategory::TimeRestriction).expect("serialize"),
            "\"time_restriction\""
        );
    }
}
