//! Persisted table metadata.

use cmz_core::ModelFamily;
use cmz_extract::{Column, ExtractionReport};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableManifest {
    pub family: ModelFamily,
    pub columns: Vec<Column>,
    pub species: Vec<String>,
    pub record_count: usize,
    pub run_count: usize,
    /// SHA-256 over the table content; identical for identical regenerations.
    pub content_hash: String,
    pub generated_at: String,
    pub tool_version: String,
    pub report: ExtractionReport,
}
