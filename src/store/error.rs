use std::path::PathBuf;

use super::Dataset;

/// Failures raised while loading or reading a table
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Dataset {dataset} not found at {}", path.display())]
    DatasetNotFound { dataset: Dataset, path: PathBuf },

    #[error("Dataset {dataset} is corrupt: {source}")]
    Corrupt {
        dataset: Dataset,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Column {column} has {found} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Column {column} holds {found} where {expected} was expected")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: String,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
