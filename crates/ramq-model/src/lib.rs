pub mod code;
pub mod error;
pub mod record;
pub mod rule;
pub mod violation;

pub use code::Code;
pub use error::{RamqError, Result};
pub use record::BillingRecord;
pub use rule::{Diagnostic, Rule, RuleOutput, RunContext};
pub use violation::{RuleCategory, Severity, Violation};
