use std::collections::{BTreeMap, BTreeSet};

use ramq_model::Code;

/// Immutable view of the catalogue restricted to the codes a rule cares
/// about: the codes whose leaf label matches one of the configured category
/// labels, with their tariff and leaf lookups.
///
/// Built once per rule invocation from a full-catalogue fetch and never
/// mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    restricted: BTreeSet<String>,
    tariffs: BTreeMap<String, f64>,
    leaves: BTreeMap<String, String>,
}

impl CatalogSnapshot {
    /// Keep the codes whose `leaf` matches one of `leaf_labels` (trimmed,
    /// exact match). Codes without a tariff entry simply stay out of the
    /// tariff map and read back as 0.
    pub fn restricted_to(codes: &[Code], leaf_labels: &[String]) -> Self {
        let labels: BTreeSet<&str> = leaf_labels.iter().map(|label| label.trim()).collect();
        let mut snapshot = Self::default();
        if labels.is_empty() {
            return snapshot;
        }
        for code in codes {
            let Some(leaf) = code.leaf.as_deref().map(str::trim) else {
                continue;
            };
            if !labels.contains(leaf) {
                continue;
            }
            snapshot.restricted.insert(code.code.clone());
            snapshot.leaves.insert(code.code.clone(), leaf.to_string());
            if let Some(tariff) = code.tariff_value {
                snapshot.tariffs.insert(code.code.clone(), tariff);
            }
        }
        snapshot
    }

    pub fn is_empty(&self) -> bool {
        self.restricted.is_empty()
    }

    pub fn len(&self) -> usize {
        self.restricted.len()
    }

    pub fn is_restricted(&self, code: &str) -> bool {
        self.restricted.contains(code)
    }

    /// Tariff for `code`, 0 when the fee schedule has no entry.
    pub fn tariff(&self, code: &str) -> f64 {
        self.tariffs.get(code).copied().unwrap_or(0.0)
    }

    /// Leaf label the code matched on.
    pub fn leaf(&self, code: &str) -> Option<&str> {
        self.leaves.get(code).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(id: &str, leaf: Option<&str>, tariff: Option<f64>) -> Code {
        Code {
            code: id.to_string(),
            description: String::new(),
            leaf: leaf.map(str::to_string),
            tariff_value: tariff,
            active: true,
        }
    }

    #[test]
    fn keeps_only_matching_leaves() {
        let codes = vec![
            code("19928", Some("Visite de prise en charge"), Some(49.15)),
            code("15838", Some("Visite ordinaire"), Some(20.0)),
            code("00000", None, Some(5.0)),
        ];
        let labels = vec!["Visite de prise en charge".to_string()];
        let snapshot = CatalogSnapshot::restricted_to(&codes, &labels);
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.is_restricted("19928"));
        assert!(!snapshot.is_restricted("15838"));
        assert_eq!(snapshot.tariff("19928"), 49.15);
        assert_eq!(snapshot.leaf("19928"), Some("Visite de prise en charge"));
    }

    #[test]
    fn missing_tariff_reads_back_as_zero() {
        let codes = vec![code("19928", Some("Visite de prise en charge"), None)];
        let labels = vec!["Visite de prise en charge".to_string()];
        let snapshot = CatalogSnapshot::restricted_to(&codes, &labels);
        assert!(snapshot.is_restricted("19928"));
        assert_eq!(snapshot.tariff("19928"), 0.0);
    }

    #[test]
    fn no_labels_means_empty_snapshot() {
        let codes = vec![code("19928", Some("Visite de prise en charge"), Some(49.15))];
        let snapshot = CatalogSnapshot::restricted_to(&codes, &[]);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn labels_are_trimmed_before_matching() {
        let codes = vec![code("19928", Some(" Visite de prise en charge "), Some(49.15))];
        let labels = vec!["Visite de prise en charge".to_string()];
        let snapshot = CatalogSnapshot::restricted_to(&codes, &labels);
        assert!(snapshot.is_restricted("19928"));
    }
}
