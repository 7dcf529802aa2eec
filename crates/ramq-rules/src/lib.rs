mod annual_limit;
mod unknown_code;

pub use annual_limit::{ANNUAL_LIMIT_RULE_ID, AnnualLimitRule, DEFAULT_ANNUAL_LEAVES, Tier};
pub use unknown_code::{UNKNOWN_CODE_RULE_ID, UnknownCodeRule};
