//! cmz-extract: stage classification and table extraction.
//!
//! The pipeline, per model family:
//! catalog → convergence gate → run extractor (transition age once, stage per
//! sample) → table assembler.

pub mod assemble;
pub mod classify;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod record;
pub mod transition;

pub use assemble::{
    AssembleOptions, ExtractedTable, ExtractionReport, assemble_table, table_columns,
};
pub use classify::{classify_hotcore, classify_shock};
pub use error::{ExtractError, ExtractResult};
pub use extractor::{RunOutcome, extract_run};
pub use gate::{Rejection, check_convergence};
pub use record::{Cell, Column, ExtractedRecord};
pub use transition::{age_at_final_temp, age_at_post_shock};
