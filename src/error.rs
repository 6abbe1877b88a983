use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("invalid signature for reference {reference}")]
    IntegrityFailure { reference: String },
    #[error("no transaction found for reference {0}")]
    TransactionNotFound(String),
    #[error("{count} transactions found for reference {reference}")]
    AmbiguousReference { reference: String, count: usize },
    #[error("callback is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid parameters for reference {reference}: {details}")]
    InvalidParameters { reference: String, details: String },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
