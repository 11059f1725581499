use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing required column `{0}`")]
    MissingColumn(String),
    #[error("Line {line}, column `{column}`: {message}")]
    InvalidRow {
        line: u64,
        column: String,
        message: String,
    },
    #[error("Malformed table: {0}")]
    Malformed(String),
    #[error("Dataset not loaded")]
    DatasetNotLoaded,
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
}
