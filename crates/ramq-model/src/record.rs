use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single billed act as submitted to the payer.
///
/// Records are immutable inputs to the rule engine; they are never fetched
/// or mutated here. Fields that the upstream source may leave blank are
/// optional and it is up to each rule to decide whether a blank field makes
/// the record unusable for that rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecord {
    /// Internal record identifier.
    pub id: String,
    /// Patient identifier. Absent on malformed rows.
    pub patient_id: Option<String>,
    /// RAMQ billing code.
    pub billing_code: String,
    /// Date the act was rendered. Absent on malformed rows.
    pub service_date: Option<NaiveDate>,
    /// Amount paid by the payer. Absent means nothing was paid yet.
    pub paid_amount: Option<f64>,
    /// External claim reference ("numéro de demande de paiement").
    pub claim_id: Option<String>,
    /// Source row identifier, when the batch came from a flat file.
    pub row_id: Option<u64>,
}

impl BillingRecord {
    /// Paid amount with the blank-means-zero convention applied.
    pub fn paid(&self) -> f64 {
        self.paid_amount.unwrap_or(0.0)
    }

    /// True when the payer has paid anything on this record.
    pub fn is_paid(&self) -> bool {
        self.paid() > 0.0
    }

    /// Calendar year of the service date, when present.
    pub fn service_year(&self) -> Option<i32> {
        self.service_date.map(|date| date.year())
    }
}
