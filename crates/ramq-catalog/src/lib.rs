mod csv_loader;
mod snapshot;
mod store;

pub use csv_loader::load_codes_csv;
pub use snapshot::CatalogSnapshot;
pub use store::{CodeStore, InMemoryCodeStore, PageRequest};
