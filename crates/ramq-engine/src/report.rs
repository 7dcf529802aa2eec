use std::path::{Path, PathBuf};

use chrono::Utc;
use ramq_model::{RamqError, Result};
use serde::Serialize;

use crate::engine::RunReport;

const REPORT_SCHEMA: &str = "ramq-validator.run-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

/// Schema-tagged wrapper written to disk for downstream persistence.
#[derive(Debug, Serialize)]
pub struct RunReportPayload<'a> {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    #[serde(flatten)]
    pub report: &'a RunReport,
}

pub fn run_report_json(report: &RunReport) -> Result<String> {
    let payload = RunReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        report,
    };
    serde_json::to_string_pretty(&payload)
        .map_err(|error| RamqError::Message(format!("serialize run report: {error}")))
}

pub fn write_run_report_json(output_dir: &Path, report: &RunReport) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join("run_report.json");
    let json = run_report_json(report)?;
    std::fs::write(&output_path, format!("{json}\n"))?;
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_schema_and_report_fields() {
        let report = RunReport {
            run_id: "run-1".to_string(),
            violations: Vec::new(),
            diagnostics: Vec::new(),
            failures: Vec::new(),
        };
        let json = run_report_json(&report).expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["schema"], "ramq-validator.run-report");
        assert_eq!(value["schema_version"], 1);
        assert_eq!(value["run_id"], "run-1");
        assert!(value["generated_at"].is_string());
    }
}
