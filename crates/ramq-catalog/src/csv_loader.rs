use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;
use ramq_model::{Code, RamqError, Result};
use tracing::debug;

/// Load a RAMQ fee-schedule export into catalogue codes.
///
/// Expected columns: `billing_code`, `place`, `description`, `leaf`,
/// `tariff_value`, `unit_require`. The stored code is the billing code
/// suffixed with the place of service when the entry is place-specific
/// (`19928-cabinet`), matching how the production import keys the table.
/// `unit_require == FALSE` marks the code as active.
pub fn load_codes_csv(path: &Path) -> Result<Vec<Code>> {
    let rows = read_csv_rows(path)?;
    let mut codes = Vec::with_capacity(rows.len());
    for row in &rows {
        let billing_code = get_field(row, "billing_code");
        if billing_code.is_empty() {
            continue;
        }
        let place = get_field(row, "place");
        let code = if place.is_empty() || place == "all" {
            billing_code
        } else {
            format!("{billing_code}-{place}")
        };
        codes.push(Code {
            code,
            description: get_field(row, "description"),
            leaf: get_optional(row, "leaf"),
            tariff_value: get_optional(row, "tariff_value")
                .as_deref()
                .and_then(parse_amount),
            active: get_field(row, "unit_require").eq_ignore_ascii_case("false"),
        });
    }
    debug!(count = codes.len(), path = %path.display(), "loaded code catalogue");
    Ok(codes)
}

/// Read a CSV file into a vector of row maps keyed by header.
///
/// Handles BOM characters and trims whitespace from values.
fn read_csv_rows(path: &Path) -> Result<Vec<BTreeMap<String, String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|error| RamqError::Message(format!("read csv {}: {error}", path.display())))?;

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = BTreeMap::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers
                .get(idx)
                .unwrap_or("")
                .trim_matches('\u{feff}')
                .trim()
                .to_string();
            row.insert(key, value.trim().to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

fn get_field(row: &BTreeMap<String, String>, key: &str) -> String {
    row.get(key).cloned().unwrap_or_default()
}

fn get_optional(row: &BTreeMap<String, String>, key: &str) -> Option<String> {
    row.get(key).filter(|value| !value.is_empty()).cloned()
}

/// Parse a monetary amount from the export. The source mixes "49.15" and
/// French-formatted "49,15", sometimes with a trailing dollar sign.
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = raw
        .trim()
        .trim_end_matches('$')
        .trim()
        .replace(',', ".")
        .replace(' ', "");
    cleaned.parse::<f64>().ok()
}
