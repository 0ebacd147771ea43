use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("Invalid amount '{0}'. Please enter a valid amount greater than zero.")]
    InvalidAmount(String),
    #[error("Category required. Please select a category for your transaction.")]
    CategoryRequired,
    #[error("Category '{category}' is not available for {kind} transactions. Choose one of: {allowed}")]
    UnknownCategory {
        category: String,
        kind: String,
        allowed: String,
    },
    #[error("Invalid transaction type '{0}'. Use 'income' or 'expense'.")]
    InvalidType(String),
    #[error("Invalid date '{0}'. Use YYYY-MM-DD or an RFC 3339 timestamp.")]
    InvalidDate(String),
    #[error("Invalid number of details provided. Expected at least 3 fields separated by commas but got {0}")]
    WrongFieldCount(usize),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage failure: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Stored value for '{key}' is not valid JSON: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unknown dashboard template '{0}'. Use 'default', 'minimal' or 'detailed'.")]
    UnknownTemplate(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to export. You don't have any transactions to export yet.")]
    NoData,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Failed to write export file '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Terminal error: {0}")]
    Terminal(String),
}
