//! Temporal-uniqueness rule for annually restricted billing codes.
//!
//! Some fee-schedule codes may be billed at most once per patient per
//! calendar year. This rule finds every (patient, year) group with more than
//! one billing of such a code, classifies the group by its payment status
//! and estimates the monetary impact of the extra billings.

use std::collections::BTreeMap;
use std::sync::Arc;

use ramq_catalog::{CatalogSnapshot, CodeStore, PageRequest};
use ramq_model::{
    BillingRecord, Diagnostic, Result, Rule, RuleCategory, RuleOutput, RunContext, Severity,
    Violation,
};
use serde_json::json;
use tracing::{debug, warn};

/// Leaf labels of the fee schedule that carry the once-per-year constraint,
/// used when no labels are configured explicitly.
pub const DEFAULT_ANNUAL_LEAVES: &[&str] =
    &["Visite de prise en charge", "Examen médical périodique"];

pub const ANNUAL_LIMIT_RULE_ID: &str = "annual_limit";

/// Payment-status tier of a violated group.
///
/// Selected by a total function of the (paid, unpaid) split, with
/// `MultiplePaid` taking precedence: a group with two paid and one unpaid
/// record is `MultiplePaid`, never `SinglePaidWithUnpaid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// More than one record was paid, whatever the unpaid count. The
    /// monetary impact cannot be estimated without knowing which record
    /// would be replaced.
    MultiplePaid,
    /// Exactly one record was paid; the rest can be withdrawn before
    /// submission, so the impact is zero.
    SinglePaidWithUnpaid,
    /// Nothing was paid yet. At least one occurrence is expected to be paid
    /// eventually, so the tariff value is a conservative lower bound on the
    /// amount at stake.
    AllUnpaid,
}

impl Tier {
    /// Classify a group with more than one record from its paid/unpaid
    /// split. Exhaustive: exactly one tier applies to every valid split.
    pub fn classify(paid_count: usize, unpaid_count: usize) -> Tier {
        if paid_count > 1 {
            Tier::MultiplePaid
        } else if paid_count == 1 && unpaid_count > 0 {
            Tier::SinglePaidWithUnpaid
        } else {
            Tier::AllUnpaid
        }
    }
}

/// The annually-restricted-code rule.
///
/// Holds its catalogue access and configured leaf labels; `validate` is a
/// pure read-only pass over the batch apart from the single catalogue fetch,
/// so one instance can serve concurrent runs.
pub struct AnnualLimitRule {
    store: Arc<dyn CodeStore>,
    leaf_labels: Vec<String>,
}

impl AnnualLimitRule {
    pub fn new(store: Arc<dyn CodeStore>) -> Self {
        Self::with_leaves(
            store,
            DEFAULT_ANNUAL_LEAVES.iter().map(|s| (*s).to_string()).collect(),
        )
    }

    pub fn with_leaves(store: Arc<dyn CodeStore>, leaf_labels: Vec<String>) -> Self {
        Self { store, leaf_labels }
    }
}

impl Rule for AnnualLimitRule {
    fn id(&self) -> &str {
        ANNUAL_LIMIT_RULE_ID
    }

    fn name(&self) -> &str {
        "Limite annuelle de facturation"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Frequency
    }

    fn validate(&self, records: &[BillingRecord], ctx: &RunContext) -> Result<RuleOutput> {
        if self.leaf_labels.is_empty() {
            let message = "no annual-limit leaf labels configured; nothing to check";
            warn!(rule = ANNUAL_LIMIT_RULE_ID, "{message}");
            return Ok(RuleOutput::with_diagnostic(Diagnostic::warning(
                ANNUAL_LIMIT_RULE_ID,
                message,
            )));
        }

        // The one external call: a single unbounded fetch, failure
        // propagates to the orchestrator untouched.
        let codes = self.store.fetch_codes(PageRequest::unbounded())?;
        let snapshot = CatalogSnapshot::restricted_to(&codes, &self.leaf_labels);
        if snapshot.is_empty() {
            let message = format!(
                "no catalogue code matches the configured leaf labels ({})",
                self.leaf_labels.join(", ")
            );
            warn!(rule = ANNUAL_LIMIT_RULE_ID, "{message}");
            return Ok(RuleOutput::with_diagnostic(Diagnostic::warning(
                ANNUAL_LIMIT_RULE_ID,
                message,
            )));
        }

        let groups = group_by_patient_year(records, &snapshot);
        debug!(
            rule = ANNUAL_LIMIT_RULE_ID,
            restricted_codes = snapshot.len(),
            groups = groups.len(),
            "grouped restricted billings"
        );

        let mut violations = Vec::new();
        for ((code, patient, year), group) in &groups {
            // A single billing in the year is exactly what the constraint
            // allows.
            if group.len() < 2 {
                continue;
            }
            violations.push(build_violation(
                ctx, &snapshot, code, patient, *year, group,
            ));
        }
        Ok(RuleOutput {
            violations,
            diagnostics: Vec::new(),
        })
    }
}

type GroupKey = (String, String, i32);

/// Partition the batch by (code, patient, calendar year), keeping only
/// restricted codes. Records without a patient or service date cannot be
/// grouped and are skipped; they may still be valid for other rules.
/// Input order is preserved within each group.
fn group_by_patient_year<'a>(
    records: &'a [BillingRecord],
    snapshot: &CatalogSnapshot,
) -> BTreeMap<GroupKey, Vec<&'a BillingRecord>> {
    let mut groups: BTreeMap<GroupKey, Vec<&BillingRecord>> = BTreeMap::new();
    for record in records {
        if !snapshot.is_restricted(&record.billing_code) {
            continue;
        }
        let (Some(patient), Some(year)) = (record.patient_id.as_ref(), record.service_year())
        else {
            continue;
        };
        groups
            .entry((record.billing_code.clone(), patient.clone(), year))
            .or_default()
            .push(record);
    }
    groups
}

fn build_violation(
    ctx: &RunContext,
    snapshot: &CatalogSnapshot,
    code: &str,
    patient: &str,
    year: i32,
    group: &[&BillingRecord],
) -> Violation {
    let leaf = snapshot.leaf(code).unwrap_or_default().to_string();
    let tariff = snapshot.tariff(code);

    let paid: Vec<&BillingRecord> = group.iter().copied().filter(|r| r.is_paid()).collect();
    let unpaid: Vec<&BillingRecord> = group.iter().copied().filter(|r| !r.is_paid()).collect();
    let total = group.len();
    let tier = Tier::classify(paid.len(), unpaid.len());

    let (message, solution, impact) = match tier {
        Tier::MultiplePaid => (
            format!(
                "Le code {code} ({leaf}) est limité à 1 facturation par patient par année \
                 civile: il a été facturé {total} fois pour ce patient en {year} et payé \
                 {paid_count} fois.",
                paid_count = paid.len()
            ),
            "Vérifier que chaque visite payée était légitime et, le cas échéant, remplacer \
             l'une des facturations par un code conforme."
                .to_string(),
            0.0,
        ),
        Tier::SinglePaidWithUnpaid => (
            format!(
                "Le code {code} ({leaf}) est limité à 1 facturation par patient par année \
                 civile: la demande {paid_claim} a été payée en {year}; les demandes non \
                 payées ({unpaid_claims}) sont en trop.",
                paid_claim = claim_ref(paid[0]),
                unpaid_claims = unpaid.iter().map(|r| claim_ref(r)).collect::<Vec<_>>().join(", ")
            ),
            "Remplacer uniquement les demandes non payées par un code conforme.".to_string(),
            0.0,
        ),
        Tier::AllUnpaid => (
            format!(
                "Le code {code} ({leaf}) est limité à 1 facturation par patient par année \
                 civile: {total} demandes non payées ont été soumises pour ce patient en \
                 {year}."
            ),
            "Valider le motif de refus et corriger les demandes restantes.".to_string(),
            tariff,
        ),
    };

    let claim_ids = dedup_claim_ids(group);
    let joined_claim_ids = if claim_ids.is_empty() {
        None
    } else {
        Some(claim_ids.join(","))
    };
    let rule_data = json!({
        "code": code,
        "leaf": leaf,
        "patient": patient,
        "year": year,
        "totalCount": total,
        "paidCount": paid.len(),
        "unpaidCount": unpaid.len(),
        "tariffValue": tariff,
        "monetaryImpact": impact,
        "claimIds": claim_ids,
        "paidRecords": record_details(&paid),
        "unpaidRecords": record_details(&unpaid),
        "paidRecordIds": record_ids(&paid),
        "unpaidRecordIds": record_ids(&unpaid),
    });

    Violation {
        run_id: ctx.run_id.clone(),
        rule_id: ANNUAL_LIMIT_RULE_ID.to_string(),
        severity: Severity::Error,
        category: RuleCategory::Frequency,
        message,
        solution,
        // Representative record: first of the group in input order.
        record_id: group.first().map(|record| record.id.clone()),
        claim_ids: joined_claim_ids,
        affected_record_ids: group.iter().map(|record| record.id.clone()).collect(),
        rule_data,
    }
}

/// Claim reference used in messages; falls back to the record id when the
/// claim identifier is blank.
fn claim_ref(record: &BillingRecord) -> String {
    record
        .claim_id
        .clone()
        .unwrap_or_else(|| record.id.clone())
}

/// Deduplicated claim identifiers across the group, first occurrence wins.
fn dedup_claim_ids(group: &[&BillingRecord]) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    let mut ids = Vec::new();
    for record in group {
        if let Some(claim) = &record.claim_id
            && seen.insert(claim.clone())
        {
            ids.push(claim.clone());
        }
    }
    ids
}

fn record_details(records: &[&BillingRecord]) -> serde_json::Value {
    json!(
        records
            .iter()
            .map(|record| {
                json!({
                    "recordId": record.id,
                    "claimId": record.claim_id,
                    "serviceDate": record.service_date.map(|d| d.format("%Y-%m-%d").to_string()),
                    "paidAmount": record.paid(),
                })
            })
            .collect::<Vec<_>>()
    )
}

fn record_ids(records: &[&BillingRecord]) -> Vec<String> {
    records.iter().map(|record| record.id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_precedence() {
        assert_eq!(Tier::classify(2, 0), Tier::MultiplePaid);
        assert_eq!(Tier::classify(2, 1), Tier::MultiplePaid);
        assert_eq!(Tier::classify(1, 1), Tier::SinglePaidWithUnpaid);
        assert_eq!(Tier::classify(1, 3), Tier::SinglePaidWithUnpaid);
        assert_eq!(Tier::classify(0, 2), Tier::AllUnpaid);
        assert_eq!(Tier::classify(0, 5), Tier::AllUnpaid);
    }
}
