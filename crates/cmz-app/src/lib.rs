//! Shared application service layer for the CMZ explorer.
//!
//! Frontends (the CLI, or a dashboard) go through this crate for
//! configuration, table regeneration and read-only table queries.

pub mod config;
pub mod error;
pub mod extract_service;
pub mod query;

// Re-export key types for convenience
pub use config::{ExplorerConfig, SpeciesPreset, SpeciesSelection, load_config};
pub use error::{AppError, AppResult};
pub use extract_service::{
    ExtractRequest, ExtractResponse, FamilyAvailability, GridOverview, inspect_grid, load_table,
    regenerate, regenerate_from_config, regenerate_tables,
};
pub use query::{
    RatioPoint, RecordFilter, TableSummary, parse_filter, parse_ratio, project_csv, ratio_csv,
    resolve_columns, segment, species_ratio, table_summary,
};
