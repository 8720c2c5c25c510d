//! cmz-core: shared foundation for the CMZ explorer.
//!
//! Contains:
//! - numeric (physical constants + rounding helpers)
//! - stage (model families and evolutionary stage labels)
//! - species (tracked molecules and their phases)
//! - ranges (discrete grid parameter values)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod ranges;
pub mod species;
pub mod stage;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use species::Phase;
pub use stage::{ModelFamily, Stage};
