//! In-memory grid, for tests and for callers that already hold the data.

use std::collections::HashMap;

use crate::source::GridSource;
use crate::types::{GridRow, TimeSample};
use crate::{GridError, GridResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryGrid {
    rows: Vec<GridRow>,
    series: HashMap<String, Vec<TimeSample>>,
}

impl MemoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row(mut self, row: GridRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn with_series(mut self, run_id: &str, samples: Vec<TimeSample>) -> Self {
        self.series.insert(run_id.to_string(), samples);
        self
    }

    pub fn push_row(&mut self, row: GridRow) {
        self.rows.push(row);
    }

    pub fn insert_series(&mut self, run_id: &str, samples: Vec<TimeSample>) {
        self.series.insert(run_id.to_string(), samples);
    }
}

impl GridSource for MemoryGrid {
    fn catalog_rows(&self) -> GridResult<Vec<GridRow>> {
        Ok(self.rows.clone())
    }

    fn has_series(&self, run_id: &str) -> bool {
        self.series.contains_key(run_id)
    }

    fn load_series(&self, run_id: &str) -> GridResult<Vec<TimeSample>> {
        self.series
            .get(run_id)
            .cloned()
            .ok_or_else(|| GridError::RunNotFound {
                run_id: run_id.to_string(),
            })
    }
}
