use thiserror::Error;

#[derive(Debug, Error)]
pub enum RamqError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid date '{value}': {source}")]
    Date {
        value: String,
        source: chrono::ParseError,
    },
    #[error("catalogue fetch failed: {0}")]
    Catalog(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, RamqError>;
