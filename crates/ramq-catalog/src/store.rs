use ramq_model::{Code, Result};

/// A page of the catalogue to fetch.
///
/// The catalogue is assumed to fit in memory, so callers that need the full
/// catalogue request a single unbounded page rather than iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    /// `None` means no limit: return everything from `offset` on.
    pub limit: Option<usize>,
}

impl PageRequest {
    pub fn unbounded() -> Self {
        Self {
            offset: 0,
            limit: None,
        }
    }

    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }
}

/// Read access to the RAMQ code catalogue.
///
/// The one operation rules are allowed to call during validation. A fetch
/// failure propagates to the caller unchanged; no retry happens at this
/// layer.
pub trait CodeStore: Send + Sync {
    fn fetch_codes(&self, page: PageRequest) -> Result<Vec<Code>>;
}

/// Catalogue held entirely in memory, used by the CLI after a CSV import
/// and by tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCodeStore {
    codes: Vec<Code>,
}

impl InMemoryCodeStore {
    pub fn new(codes: Vec<Code>) -> Self {
        Self { codes }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl CodeStore for InMemoryCodeStore {
    fn fetch_codes(&self, page: PageRequest) -> Result<Vec<Code>> {
        let end = match page.limit {
            Some(limit) => (page.offset + limit).min(self.codes.len()),
            None => self.codes.len(),
        };
        let start = page.offset.min(end);
        Ok(self.codes[start..end].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(id: &str) -> Code {
        Code {
            code: id.to_string(),
            description: String::new(),
            leaf: None,
            tariff_value: None,
            active: true,
        }
    }

    #[test]
    fn unbounded_page_returns_everything() {
        let store = InMemoryCodeStore::new(vec![code("a"), code("b"), code("c")]);
        let codes = store
            .fetch_codes(PageRequest::unbounded())
            .expect("fetch codes");
        assert_eq!(codes.len(), 3);
    }

    #[test]
    fn bounded_page_clamps_to_length() {
        let store = InMemoryCodeStore::new(vec![code("a"), code("b")]);
        let codes = store
            .fetch_codes(PageRequest::new(1, 10))
            .expect("fetch codes");
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].code, "b");
    }
}
