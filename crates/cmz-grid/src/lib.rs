//! cmz-grid: model grid catalog and per-run time series access.

pub mod catalog;
pub mod memory;
pub mod source;
pub mod store;
pub mod types;

pub use catalog::{Availability, Catalog, partition_available, validate_catalog};
pub use memory::MemoryGrid;
pub use source::GridSource;
pub use store::GridStore;
pub use types::*;

pub type GridResult<T> = Result<T, GridError>;

#[derive(thiserror::Error, Debug)]
pub enum GridError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed series for {run_id} at line {line}: {source}")]
    MalformedSeries {
        run_id: String,
        line: usize,
        source: serde_json::Error,
    },

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Duplicate run_id in catalog: {run_id}")]
    DuplicateRunId { run_id: String },

    #[error("Run {run_id} references parent {parent_run_id}, which is not in the catalog")]
    ParentNotFound {
        run_id: String,
        parent_run_id: String,
    },

    #[error("Run {run_id} is missing parameter {parameter}")]
    MissingParameter {
        run_id: String,
        parameter: &'static str,
    },

    #[error("Run {run_id}: {source}")]
    InvalidParameter {
        run_id: String,
        source: cmz_core::CoreError,
    },
}
