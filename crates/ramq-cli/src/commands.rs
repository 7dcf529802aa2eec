use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use ramq_catalog::{CodeStore, InMemoryCodeStore, load_codes_csv};
use ramq_engine::{RuleEngine, RunReport, write_run_report_json};
use ramq_ingest::load_records_csv;
use ramq_rules::{AnnualLimitRule, UnknownCodeRule};
use tracing::info;

use crate::cli::RunArgs;

pub struct RunResult {
    pub report: RunReport,
    pub record_count: usize,
    pub report_path: Option<PathBuf>,
}

pub fn run_validation(args: &RunArgs) -> Result<RunResult> {
    let codes = load_codes_csv(&args.codes)
        .with_context(|| format!("load code catalogue {}", args.codes.display()))?;
    let records = load_records_csv(&args.records)
        .with_context(|| format!("load billing records {}", args.records.display()))?;
    info!(
        codes = codes.len(),
        records = records.len(),
        "inputs loaded"
    );

    let store: Arc<dyn CodeStore> = Arc::new(InMemoryCodeStore::new(codes));
    let engine = build_engine(&store, &args.annual_leaves);

    let run_id = args
        .run_id
        .clone()
        .unwrap_or_else(|| format!("run-{}", Utc::now().format("%Y%m%dT%H%M%S")));
    let report = engine.run(&records, &run_id);

    let report_path = match &args.output_dir {
        Some(dir) => Some(
            write_run_report_json(dir, &report)
                .with_context(|| format!("write run report to {}", dir.display()))?,
        ),
        None => None,
    };

    Ok(RunResult {
        report,
        record_count: records.len(),
        report_path,
    })
}

pub fn list_rules() {
    let store: Arc<dyn CodeStore> = Arc::new(InMemoryCodeStore::default());
    let engine = build_engine(&store, &[]);
    for rule in engine.rules() {
        println!(
            "{:<16} {:<16} {}",
            rule.id(),
            rule.category().as_str(),
            rule.name()
        );
    }
}

fn build_engine(store: &Arc<dyn CodeStore>, annual_leaves: &[String]) -> RuleEngine {
    let mut engine = RuleEngine::new();
    let annual = if annual_leaves.is_empty() {
        AnnualLimitRule::new(Arc::clone(store))
    } else {
        AnnualLimitRule::with_leaves(Arc::clone(store), annual_leaves.to_vec())
    };
    engine.register(Box::new(annual));
    engine.register(Box::new(UnknownCodeRule::new(Arc::clone(store))));
    engine
}
