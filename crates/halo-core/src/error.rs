use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid CSV headers. Expected: {expected}")]
    CsvHeader { expected: String },
    #[error("{message}")]
    Csv { row: usize, message: String },
    #[error("{collection} record not found: {id}")]
    NotFound { collection: &'static str, id: String },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn not_found(collection: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            collection,
            id: id.into(),
        }
    }

    pub fn csv_row(row: usize, message: impl Into<String>) -> Self {
        CoreError::Csv {
            row,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(err: csv::Error) -> Self {
        CoreError::Serde(format!("csv: {err}"))
    }
}
