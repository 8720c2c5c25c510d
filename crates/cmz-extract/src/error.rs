//! Error types for extraction passes.

/// Fatal extraction faults. Any of these aborts the whole pass; per-run
/// convergence rejections are not errors (see [`crate::Rejection`]).
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Parent run {parent_run_id} of {run_id} is not in the catalog")]
    ParentNotFound {
        run_id: String,
        parent_run_id: String,
    },

    #[error("Run {run_id} passed the convergence gate but never reaches its transition")]
    TransitionNotFound { run_id: String },

    #[error("Run {run_id} is missing parameter {parameter}")]
    MissingParameter {
        run_id: String,
        parameter: &'static str,
    },

    #[error("Run {run_id} has no abundance column for species {species}")]
    SpeciesMissing { run_id: String, species: String },

    #[error("Inconsistent table: {reason}")]
    InconsistentTable { reason: String },

    #[error("Grid error: {0}")]
    Grid(#[from] cmz_grid::GridError),
}

pub type ExtractResult<T> = Result<T, ExtractError>;
