//! Catalogue-membership rule: every billed code must exist in the catalogue
//! and be active.

use std::collections::BTreeMap;
use std::sync::Arc;

use ramq_catalog::{CodeStore, PageRequest};
use ramq_model::{
    BillingRecord, Diagnostic, Result, Rule, RuleCategory, RuleOutput, RunContext, Severity,
    Violation,
};
use serde_json::json;
use tracing::warn;

pub const UNKNOWN_CODE_RULE_ID: &str = "unknown_code";

pub struct UnknownCodeRule {
    store: Arc<dyn CodeStore>,
}

impl UnknownCodeRule {
    pub fn new(store: Arc<dyn CodeStore>) -> Self {
        Self { store }
    }
}

impl Rule for UnknownCodeRule {
    fn id(&self) -> &str {
        UNKNOWN_CODE_RULE_ID
    }

    fn name(&self) -> &str {
        "Code inconnu ou inactif"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Catalogue
    }

    fn validate(&self, records: &[BillingRecord], ctx: &RunContext) -> Result<RuleOutput> {
        let codes = self.store.fetch_codes(PageRequest::unbounded())?;
        if codes.is_empty() {
            let message = "catalogue is empty; cannot check code membership";
            warn!(rule = UNKNOWN_CODE_RULE_ID, "{message}");
            return Ok(RuleOutput::with_diagnostic(Diagnostic::warning(
                UNKNOWN_CODE_RULE_ID,
                message,
            )));
        }
        let active: BTreeMap<&str, bool> = codes
            .iter()
            .map(|code| (code.code.as_str(), code.active))
            .collect();

        // One violation per offending code value, records aggregated.
        let mut offending: BTreeMap<&str, Vec<&BillingRecord>> = BTreeMap::new();
        for record in records {
            match active.get(record.billing_code.as_str()) {
                Some(true) => {}
                Some(false) | None => {
                    offending
                        .entry(record.billing_code.as_str())
                        .or_default()
                        .push(record);
                }
            }
        }

        let violations = offending
            .into_iter()
            .map(|(code, group)| {
                let known = active.contains_key(code);
                let message = if known {
                    format!("Le code {code} est inactif au catalogue des codes.")
                } else {
                    format!("Le code {code} n'existe pas dans le catalogue des codes.")
                };
                Violation {
                    run_id: ctx.run_id.clone(),
                    rule_id: UNKNOWN_CODE_RULE_ID.to_string(),
                    severity: Severity::Warning,
                    category: RuleCategory::Catalogue,
                    message,
                    solution: "Vérifier le code facturé et le remplacer par un code valide du \
                               catalogue."
                        .to_string(),
                    record_id: group.first().map(|record| record.id.clone()),
                    claim_ids: None,
                    affected_record_ids: group.iter().map(|record| record.id.clone()).collect(),
                    rule_data: json!({
                        "code": code,
                        "known": known,
                        "count": group.len(),
                        "recordIds": group.iter().map(|r| r.id.clone()).collect::<Vec<_>>(),
                    }),
                }
            })
            .collect();

        Ok(RuleOutput {
            violations,
            diagnostics: Vec::new(),
        })
    }
}
