mod engine;
mod report;

pub use engine::{RuleEngine, RuleFailure, RunReport};
pub use report::{run_report_json, write_run_report_json};
