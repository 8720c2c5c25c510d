//! Table assembly: one extraction pass over the catalog for one family.

use std::collections::BTreeMap;

use cmz_core::{ModelFamily, scale_zeta};
use cmz_grid::{Catalog, GridRow, GridSource, partition_available};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::extractor::{RunOutcome, extract_run};
use crate::gate::Rejection;
use crate::record::{Column, ExtractedRecord};
use crate::{ExtractError, ExtractResult};

#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// Extract runs on the rayon pool. Row order is unchanged.
    pub parallel: bool,
}

/// The full ordered collection of extracted records for one model family.
///
/// Rows follow catalog order, then sample order. Tables are never edited in
/// place; regeneration replaces the whole table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTable {
    family: ModelFamily,
    columns: Vec<Column>,
    species: Vec<String>,
    records: Vec<ExtractedRecord>,
}

impl ExtractedTable {
    /// Rebuild a table from persisted parts, checking the invariants the
    /// assembler guarantees.
    pub fn from_parts(
        family: ModelFamily,
        columns: Vec<Column>,
        species: Vec<String>,
        records: Vec<ExtractedRecord>,
    ) -> ExtractResult<Self> {
        let inconsistent = |reason: String| ExtractError::InconsistentTable { reason };
        if columns != table_columns(family) {
            return Err(inconsistent(format!("unexpected column set for {family}")));
        }
        for record in &records {
            if !record.stage.belongs_to(family) {
                return Err(inconsistent(format!(
                    "stage {} in {} table (run {})",
                    record.stage, family, record.run_id
                )));
            }
            if record.zeta_scaled != Some(scale_zeta(record.zeta)) {
                return Err(inconsistent(format!(
                    "zeta_scaled out of step with zeta (run {})",
                    record.run_id
                )));
            }
            if let Some(name) = species.iter().find(|s| !record.abundances.contains_key(*s)) {
                return Err(inconsistent(format!(
                    "species {} missing (run {})",
                    name, record.run_id
                )));
            }
        }
        Ok(Self {
            family,
            columns,
            species,
            records,
        })
    }

    pub fn family(&self) -> ModelFamily {
        self.family
    }

    /// Fixed columns, in order. Species columns follow, see [`Self::species`].
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn records(&self) -> &[ExtractedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Header names: fixed columns then species.
    pub fn header(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|c| c.name())
            .chain(self.species.iter().map(String::as_str))
            .collect()
    }

    /// Distinct run ids, in row order.
    pub fn run_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for record in &self.records {
            if ids.last() != Some(&record.run_id.as_str()) {
                ids.push(&record.run_id);
            }
        }
        ids
    }
}

/// Counts from one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Runs of the family whose parent series is stored.
    pub candidate_runs: usize,
    /// Candidates without a stored series of their own.
    pub unavailable_runs: usize,
    pub extracted_runs: usize,
    /// Gate rejections by kind.
    pub rejections: BTreeMap<String, usize>,
    pub records: usize,
}

impl ExtractionReport {
    pub fn rejected_runs(&self) -> usize {
        self.rejections.values().sum()
    }
}

/// Fixed column order of an assembled table: `zeta_scaled` sits right after
/// `zeta`.
pub fn table_columns(family: ModelFamily) -> Vec<Column> {
    let mut columns = Column::extracted(family);
    let at = columns
        .iter()
        .position(|c| *c == Column::Zeta)
        .map_or(columns.len(), |i| i + 1);
    columns.insert(at, Column::ZetaScaled);
    columns
}

fn insert_zeta_scaled(records: &mut [ExtractedRecord]) {
    for record in records {
        record.zeta_scaled = Some(scale_zeta(record.zeta));
    }
}

fn process_run(
    source: &dyn GridSource,
    catalog: &Catalog,
    row: &GridRow,
    family: ModelFamily,
    species: &[String],
) -> ExtractResult<RunOutcome> {
    if !row.is_family(family) {
        return Ok(RunOutcome::Rejected(Rejection::WrongModelType {
            found: row.model_type,
        }));
    }
    let series = source.load_series(&row.run_id)?;
    extract_run(catalog, row, &series, family, species)
}

/// Run one extraction pass over the catalog and build the family's table.
///
/// Any fatal fault aborts the pass with no table. With `parallel`, runs are
/// extracted into private batches and concatenated in catalog order.
pub fn assemble_table(
    source: &dyn GridSource,
    catalog: &Catalog,
    family: ModelFamily,
    species: &[String],
    options: &AssembleOptions,
) -> ExtractResult<(ExtractedTable, ExtractionReport)> {
    let availability = partition_available(catalog, source, family);
    if let Some(row) = availability.orphaned.first() {
        return Err(match &row.parent_run_id {
            Some(parent) => ExtractError::ParentNotFound {
                run_id: row.run_id.clone(),
                parent_run_id: parent.clone(),
            },
            None => ExtractError::MissingParameter {
                run_id: row.run_id.clone(),
                parameter: "parent_run_id",
            },
        });
    }
    info!(
        family = %family,
        runs = availability.successful.len(),
        parallel = options.parallel,
        "extraction pass starting"
    );

    let outcomes: Vec<ExtractResult<RunOutcome>> = if options.parallel {
        availability
            .successful
            .par_iter()
            .map(|row| process_run(source, catalog, row, family, species))
            .collect()
    } else {
        availability
            .successful
            .iter()
            .map(|row| process_run(source, catalog, row, family, species))
            .collect()
    };

    let mut report = ExtractionReport {
        candidate_runs: availability.successful.len() + availability.unsuccessful.len(),
        unavailable_runs: availability.unsuccessful.len(),
        ..ExtractionReport::default()
    };
    let mut records = Vec::new();
    for (row, outcome) in availability.successful.iter().zip(outcomes) {
        match outcome? {
            RunOutcome::Extracted(batch) => {
                report.extracted_runs += 1;
                records.extend(batch);
            }
            RunOutcome::Rejected(rejection) => {
                debug!(run_id = %row.run_id, reason = %rejection, "run rejected");
                *report
                    .rejections
                    .entry(rejection.kind().to_string())
                    .or_default() += 1;
            }
        }
    }

    insert_zeta_scaled(&mut records);
    report.records = records.len();

    info!(
        family = %family,
        extracted = report.extracted_runs,
        rejected = report.rejected_runs(),
        records = report.records,
        "extraction pass complete"
    );

    let table = ExtractedTable {
        family,
        columns: table_columns(family),
        species: species.to_vec(),
        records,
    };
    Ok((table, report))
}
