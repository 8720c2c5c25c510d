//! Storage capability consumed by the extraction pipeline.

use crate::types::{GridRow, TimeSample};
use crate::GridResult;

/// Read access to a model grid: the catalog of runs plus, per `run_id`, an
/// independently retrievable ordered time series.
pub trait GridSource: Sync {
    /// All catalog rows, in catalog order.
    fn catalog_rows(&self) -> GridResult<Vec<GridRow>>;

    /// Catalog rows matching a predicate, in catalog order.
    fn query(&self, predicate: &dyn Fn(&GridRow) -> bool) -> GridResult<Vec<GridRow>> {
        Ok(self
            .catalog_rows()?
            .into_iter()
            .filter(|row| predicate(row))
            .collect())
    }

    /// Whether a stored series exists for this run.
    fn has_series(&self, run_id: &str) -> bool;

    /// The run's samples in temporal order.
    fn load_series(&self, run_id: &str) -> GridResult<Vec<TimeSample>>;
}
