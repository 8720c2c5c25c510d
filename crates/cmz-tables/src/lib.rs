//! cmz-tables: persisted extracted-table artifacts.

pub mod hash;
pub mod store;
pub mod types;

pub use hash::content_hash;
pub use store::TableStore;
pub use types::*;

pub type TablesResult<T> = Result<T, TablesError>;

#[derive(thiserror::Error, Debug)]
pub enum TablesError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Table not found: {family}")]
    TableNotFound { family: String },

    #[error("Table {family} content hash mismatch (manifest {expected}, data {actual})")]
    HashMismatch {
        family: String,
        expected: String,
        actual: String,
    },

    #[error("Table {family} given more than once in one save")]
    DuplicateTable { family: String },

    #[error("Extraction error: {0}")]
    Extract(#[from] cmz_extract::ExtractError),
}
