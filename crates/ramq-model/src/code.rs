use serde::{Deserialize, Serialize};

/// One entry of the RAMQ code catalogue.
///
/// Reference data owned by the catalogue store. The `leaf` label is the
/// finest classification level of the fee schedule and is what rules match
/// against when a constraint applies to a whole family of codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Code {
    /// Billing code identifier, possibly suffixed with the place of service
    /// (e.g. "19928" or "19928-cabinet").
    pub code: String,
    /// Human-readable description from the fee schedule.
    #[serde(default)]
    pub description: String,
    /// Leaf category label (e.g. "Visite de prise en charge").
    pub leaf: Option<String>,
    /// Unit price from the fee schedule.
    pub tariff_value: Option<f64>,
    /// Whether the code is currently billable.
    pub active: bool,
}

impl Code {
    /// Tariff with the no-entry-means-zero convention applied.
    pub fn tariff(&self) -> f64 {
        self.tariff_value.unwrap_or(0.0)
    }
}
