//! CSV ingestion of billing-record batches.
//!
//! Ingestion is deliberately tolerant: a blank patient, service date or paid
//! amount does not reject the row. Such a record may still be valid for some
//! rules, so the decision to skip it belongs to each rule, not to ingestion.

use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use ramq_model::{BillingRecord, RamqError, Result};
use tracing::debug;

/// Column layout of a billing-record export.
///
/// Expected headers: `id`, `patient_id`, `billing_code`, `service_date`
/// (ISO `YYYY-MM-DD`), `paid_amount`, `claim_id`. Extra columns are
/// ignored; header matching is case-insensitive.
pub fn load_records_csv(path: &Path) -> Result<Vec<BillingRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|error| RamqError::Message(format!("read csv {}: {error}", path.display())))?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim_matches('\u{feff}').trim().to_lowercase())
        .collect();
    let column = |name: &str| headers.iter().position(|header| header == name);

    let id_col = column("id");
    let patient_col = column("patient_id");
    let code_col = column("billing_code");
    let date_col = column("service_date");
    let paid_col = column("paid_amount");
    let claim_col = column("claim_id");

    let code_col = code_col.ok_or_else(|| {
        RamqError::Message(format!(
            "missing required column 'billing_code' in {}",
            path.display()
        ))
    })?;

    let mut records = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |idx: Option<usize>| -> Option<String> {
            idx.and_then(|idx| record.get(idx))
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let billing_code = match cell(Some(code_col)) {
            Some(code) => code,
            None => continue,
        };
        let service_date = match cell(date_col) {
            Some(raw) => Some(parse_service_date(&raw)?),
            None => None,
        };
        let paid_amount = cell(paid_col).and_then(|raw| raw.replace(',', ".").parse::<f64>().ok());

        records.push(BillingRecord {
            id: cell(id_col).unwrap_or_else(|| format!("row-{}", row_idx + 1)),
            patient_id: cell(patient_col),
            billing_code,
            service_date,
            paid_amount,
            claim_id: cell(claim_col),
            row_id: Some(row_idx as u64 + 1),
        });
    }
    debug!(count = records.len(), path = %path.display(), "loaded billing records");
    Ok(records)
}

fn parse_service_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|source| RamqError::Date {
        value: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(contents: &str) -> std::path::PathBuf {
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("ramq_records_{stamp}.csv"));
        let mut file = std::fs::File::create(&path).expect("create temp csv");
        file.write_all(contents.as_bytes()).expect("write temp csv");
        path
    }

    #[test]
    fn loads_records_with_blank_fields() {
        let path = write_temp_csv(
            "id,patient_id,billing_code,service_date,paid_amount,claim_id\n\
             r1,p1,19928,2024-03-14,49.15,c1\n\
             r2,,19928,,,c2\n",
        );
        let records = load_records_csv(&path).expect("load records");
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].paid_amount, Some(49.15));
        assert_eq!(
            records[0].service_date,
            NaiveDate::from_ymd_opt(2024, 3, 14)
        );
        assert_eq!(records[1].patient_id, None);
        assert_eq!(records[1].service_date, None);
        assert_eq!(records[1].paid_amount, None);
    }

    #[test]
    fn invalid_date_is_an_error() {
        let path = write_temp_csv(
            "id,patient_id,billing_code,service_date,paid_amount,claim_id\n\
             r1,p1,19928,14/03/2024,49.15,c1\n",
        );
        let result = load_records_csv(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(RamqError::Date { .. })));
    }

    #[test]
    fn missing_billing_code_column_is_an_error() {
        let path = write_temp_csv("id,patient_id\nr1,p1\n");
        let result = load_records_csv(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
