//! Table regeneration service.

use std::time::Instant;

use cmz_core::ModelFamily;
use cmz_extract::{AssembleOptions, ExtractedTable, ExtractionReport, assemble_table};
use cmz_grid::{Catalog, GridSource, GridStore, partition_available, validate_catalog};
use cmz_tables::{TableManifest, TableStore};
use tracing::info;

use crate::config::ExplorerConfig;
use crate::error::AppResult;

/// Request to regenerate both extracted tables.
pub struct ExtractRequest<'a> {
    pub grid: &'a dyn GridSource,
    pub output: &'a TableStore,
    pub species: &'a [String],
    pub options: AssembleOptions,
}

/// Response from a regeneration pass.
#[derive(Debug, Clone)]
pub struct ExtractResponse {
    pub hotcore: TableManifest,
    pub shock: TableManifest,
    pub elapsed_s: f64,
}

impl ExtractResponse {
    pub fn manifest(&self, family: ModelFamily) -> &TableManifest {
        match family {
            ModelFamily::HotCore => &self.hotcore,
            ModelFamily::Shock => &self.shock,
        }
    }
}

/// Build both family tables without persisting them.
pub fn regenerate_tables(
    grid: &dyn GridSource,
    species: &[String],
    options: &AssembleOptions,
) -> AppResult<Vec<(ExtractedTable, ExtractionReport)>> {
    let catalog = Catalog::load(grid)?;
    validate_catalog(&catalog)?;
    info!(runs = catalog.len(), species = species.len(), "catalog loaded");

    let mut tables = Vec::with_capacity(ModelFamily::ALL.len());
    for family in ModelFamily::ALL {
        tables.push(assemble_table(grid, &catalog, family, species, options)?);
    }
    Ok(tables)
}

/// Regenerate and persist both tables. Nothing is written unless both passes
/// succeed, and the two tables are published as one unit.
pub fn regenerate(request: &ExtractRequest<'_>) -> AppResult<ExtractResponse> {
    let started = Instant::now();
    let tables = regenerate_tables(request.grid, request.species, &request.options)?;

    let refs: Vec<_> = tables.iter().map(|(table, report)| (table, report)).collect();
    let manifests = request.output.save_tables(&refs)?;

    let mut hotcore = None;
    let mut shock = None;
    for manifest in manifests {
        match manifest.family {
            ModelFamily::HotCore => hotcore = Some(manifest),
            ModelFamily::Shock => shock = Some(manifest),
        }
    }
    let (Some(hotcore), Some(shock)) = (hotcore, shock) else {
        return Err(crate::AppError::Extract(
            "regeneration did not produce both tables".to_string(),
        ));
    };

    Ok(ExtractResponse {
        hotcore,
        shock,
        elapsed_s: started.elapsed().as_secs_f64(),
    })
}

/// Regenerate both tables as configured.
pub fn regenerate_from_config(config: &ExplorerConfig) -> AppResult<ExtractResponse> {
    let grid = GridStore::open(config.grid_dir.clone())?;
    let output = TableStore::new(config.output_dir.clone())?;
    let species = config.species.resolve();
    regenerate(&ExtractRequest {
        grid: &grid,
        output: &output,
        species: &species,
        options: AssembleOptions {
            parallel: config.parallel,
        },
    })
}

/// Per-family run availability of a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyAvailability {
    pub family: ModelFamily,
    pub candidates: usize,
    pub unavailable: usize,
}

/// Catalog check result.
#[derive(Debug, Clone)]
pub struct GridOverview {
    pub run_count: usize,
    pub families: Vec<FamilyAvailability>,
}

/// Load and validate the configured grid's catalog without extracting anything.
pub fn inspect_grid(config: &ExplorerConfig) -> AppResult<GridOverview> {
    let grid = GridStore::open(config.grid_dir.clone())?;
    let catalog = Catalog::load(&grid)?;
    validate_catalog(&catalog)?;

    let families = ModelFamily::ALL
        .into_iter()
        .map(|family| {
            let availability = partition_available(&catalog, &grid, family);
            FamilyAvailability {
                family,
                candidates: availability.successful.len(),
                unavailable: availability.unsuccessful.len(),
            }
        })
        .collect();
    Ok(GridOverview {
        run_count: catalog.len(),
        families,
    })
}

/// Load a persisted table as configured.
pub fn load_table(config: &ExplorerConfig, family: ModelFamily) -> AppResult<ExtractedTable> {
    let store = TableStore::new(config.output_dir.clone())?;
    Ok(store.load_table(family)?)
}
