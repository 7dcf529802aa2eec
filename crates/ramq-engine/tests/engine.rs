use std::sync::Arc;

use chrono::NaiveDate;
use ramq_catalog::{CodeStore, InMemoryCodeStore, PageRequest};
use ramq_engine::RuleEngine;
use ramq_model::{
    BillingRecord, Code, RamqError, Result, Rule, RuleCategory, RuleOutput, RunContext,
};
use ramq_rules::{AnnualLimitRule, UnknownCodeRule};

fn record(id: &str, patient: &str, code: &str, day: u32, paid: f64) -> BillingRecord {
    BillingRecord {
        id: id.to_string(),
        patient_id: Some(patient.to_string()),
        billing_code: code.to_string(),
        service_date: NaiveDate::from_ymd_opt(2024, 6, day),
        paid_amount: Some(paid),
        claim_id: Some(format!("claim-{id}")),
        row_id: None,
    }
}

fn catalogue() -> Vec<Code> {
    vec![Code {
        code: "19928".to_string(),
        description: "Visite de prise en charge".to_string(),
        leaf: Some("Visite de prise en charge".to_string()),
        tariff_value: Some(49.15),
        active: true,
    }]
}

struct UnreachableStore;

impl CodeStore for UnreachableStore {
    fn fetch_codes(&self, _page: PageRequest) -> Result<Vec<Code>> {
        Err(RamqError::Catalog("connection refused".to_string()))
    }
}

struct DisabledRule;

impl Rule for DisabledRule {
    fn id(&self) -> &str {
        "disabled"
    }
    fn name(&self) -> &str {
        "Disabled"
    }
    fn category(&self) -> RuleCategory {
        RuleCategory::Prohibition
    }
    fn enabled(&self) -> bool {
        false
    }
    fn validate(&self, _records: &[BillingRecord], _ctx: &RunContext) -> Result<RuleOutput> {
        panic!("disabled rule must not run");
    }
}

#[test]
fn run_attaches_run_id_to_every_violation() {
    let store = Arc::new(InMemoryCodeStore::new(catalogue()));
    let mut engine = RuleEngine::new();
    engine.register(Box::new(AnnualLimitRule::new(Arc::clone(&store) as Arc<dyn CodeStore>)));
    engine.register(Box::new(UnknownCodeRule::new(store)));

    let records = vec![
        record("r1", "p1", "19928", 1, 49.15),
        record("r2", "p1", "19928", 20, 49.15),
        record("r3", "p2", "99999", 5, 0.0),
    ];
    let report = engine.run(&records, "run-42");

    assert_eq!(report.run_id, "run-42");
    assert!(!report.violations.is_empty());
    assert!(report.violations.iter().all(|v| v.run_id == "run-42"));
    assert!(report.failures.is_empty());
    // One annual-limit error plus one unknown-code warning.
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.warning_count(), 1);
}

#[test]
fn failing_rule_does_not_abort_siblings() {
    let healthy = Arc::new(InMemoryCodeStore::new(catalogue()));
    let mut engine = RuleEngine::new();
    engine.register(Box::new(AnnualLimitRule::new(Arc::new(UnreachableStore))));
    engine.register(Box::new(UnknownCodeRule::new(healthy)));

    let records = vec![record("r1", "p1", "99999", 1, 0.0)];
    let report = engine.run(&records, "run-1");

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].rule_id, "annual_limit");
    assert!(report.failures[0].error.contains("connection refused"));
    // The sibling still ran and produced its finding.
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].rule_id, "unknown_code");
    assert!(report.has_errors());
}

#[test]
fn disabled_rules_are_skipped() {
    let mut engine = RuleEngine::new();
    engine.register(Box::new(DisabledRule));
    let report = engine.run(&[], "run-1");
    assert!(report.violations.is_empty());
    assert!(report.failures.is_empty());
}

#[test]
fn report_round_trips_through_json() {
    let store = Arc::new(InMemoryCodeStore::new(catalogue()));
    let mut engine = RuleEngine::new();
    engine.register(Box::new(AnnualLimitRule::new(store)));
    let records = vec![
        record("r1", "p1", "19928", 1, 49.15),
        record("r2", "p1", "19928", 20, 49.15),
    ];
    let report = engine.run(&records, "run-1");

    let json = ramq_engine::run_report_json(&report).expect("serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
    assert_eq!(value["run_id"], "run-1");
    assert_eq!(value["violations"].as_array().expect("violations").len(), 1);
}
