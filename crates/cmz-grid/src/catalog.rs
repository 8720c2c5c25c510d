//! Indexed grid catalog, validation and availability partitioning.

use std::collections::HashMap;

use cmz_core::{ModelFamily, ensure_finite};
use tracing::{debug, warn};

use crate::source::GridSource;
use crate::types::GridRow;
use crate::{GridError, GridResult};

/// Catalog rows with a `run_id` index. Row order is the catalog order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    rows: Vec<GridRow>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(rows: Vec<GridRow>) -> GridResult<Self> {
        let mut index = HashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if index.insert(row.run_id.clone(), i).is_some() {
                return Err(GridError::DuplicateRunId {
                    run_id: row.run_id.clone(),
                });
            }
        }
        Ok(Self { rows, index })
    }

    pub fn load(source: &dyn GridSource) -> GridResult<Self> {
        Self::new(source.catalog_rows()?)
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, run_id: &str) -> Option<&GridRow> {
        self.index.get(run_id).map(|&i| &self.rows[i])
    }

    /// Rows of one model family, in catalog order.
    pub fn family_rows(&self, family: ModelFamily) -> impl Iterator<Item = &GridRow> {
        self.rows.iter().filter(move |row| row.is_family(family))
    }
}

/// Check that every model row carries the parameters its family needs and that
/// all physical parameters are finite.
pub fn validate_catalog(catalog: &Catalog) -> GridResult<()> {
    for row in catalog.rows() {
        let finite = |v: f64, what: &'static str| {
            ensure_finite(v, what).map_err(|source| GridError::InvalidParameter {
                run_id: row.run_id.clone(),
                source,
            })
        };
        finite(row.initial_temp, "initialTemp")?;
        finite(row.initial_dens, "initialDens")?;
        finite(row.zeta, "zeta")?;
        finite(row.radfield, "radfield")?;

        let required: Vec<(&'static str, Option<f64>)> = match row.model_type.family() {
            Some(ModelFamily::HotCore) => vec![("final_temp", row.final_temp)],
            Some(ModelFamily::Shock) => vec![("shock_vel", row.shock_vel), ("bm0", row.bm0)],
            None => Vec::new(),
        };
        for (parameter, value) in required {
            if value.is_none() {
                return Err(GridError::MissingParameter {
                    run_id: row.run_id.clone(),
                    parameter,
                });
            }
        }
        if row.model_type.family().is_some() {
            let Some(parent) = row.parent_run_id.as_deref() else {
                return Err(GridError::MissingParameter {
                    run_id: row.run_id.clone(),
                    parameter: "parent_run_id",
                });
            };
            if catalog.get(parent).is_none() {
                return Err(GridError::ParentNotFound {
                    run_id: row.run_id.clone(),
                    parent_run_id: parent.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Family runs whose parent cloud has a stored series, split by whether the
/// run itself produced one. Runs whose parent is absent from the catalog are
/// kept apart in `orphaned`; callers treat them as a catalog fault.
#[derive(Debug, Clone, Default)]
pub struct Availability {
    pub successful: Vec<GridRow>,
    pub unsuccessful: Vec<GridRow>,
    pub orphaned: Vec<GridRow>,
}

pub fn partition_available(
    catalog: &Catalog,
    source: &dyn GridSource,
    family: ModelFamily,
) -> Availability {
    let mut availability = Availability::default();
    for row in catalog.family_rows(family) {
        let Some(parent) = row
            .parent_run_id
            .as_deref()
            .filter(|parent| catalog.get(parent).is_some())
        else {
            availability.orphaned.push(row.clone());
            continue;
        };
        if !source.has_series(parent) {
            debug!(run_id = %row.run_id, "parent series missing, run skipped");
            continue;
        }
        if source.has_series(&row.run_id) {
            availability.successful.push(row.clone());
        } else {
            availability.unsuccessful.push(row.clone());
        }
    }
    if !availability.unsuccessful.is_empty() {
        warn!(
            family = %family,
            count = availability.unsuccessful.len(),
            "runs without a stored series"
        );
    }
    availability
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModelType;

    fn row(run_id: &str, parent: Option<&str>, model_type: ModelType) -> GridRow {
        GridRow {
            run_id: run_id.to_string(),
            parent_run_id: parent.map(str::to_string),
            model_type,
            initial_temp: 15.0,
            initial_dens: 1.0e6,
            zeta: 10.0,
            radfield: 1000.0,
            metallicity: 1.0,
            final_temp: Some(300.0),
            shock_vel: None,
            bm0: None,
            model_index: Some(1),
        }
    }

    #[test]
    fn duplicate_run_ids_rejected() {
        let rows = vec![
            row("a", None, ModelType::Other),
            row("a", None, ModelType::Other),
        ];
        let err = Catalog::new(rows).unwrap_err();
        assert!(matches!(err, GridError::DuplicateRunId { run_id } if run_id == "a"));
    }

    #[test]
    fn lookup_and_family_filter() {
        let catalog = Catalog::new(vec![
            row("cloud", None, ModelType::Other),
            row("hc1", Some("cloud"), ModelType::HotCore),
        ])
        .unwrap();
        assert_eq!(catalog.get("hc1").map(|r| r.run_id.as_str()), Some("hc1"));
        assert!(catalog.get("missing").is_none());
        assert_eq!(catalog.family_rows(ModelFamily::HotCore).count(), 1);
        assert_eq!(catalog.family_rows(ModelFamily::Shock).count(), 0);
    }

    #[test]
    fn shock_rows_need_velocity() {
        let mut shock = row("s1", Some("cloud"), ModelType::CShock);
        shock.bm0 = Some(1.0);
        let catalog = Catalog::new(vec![row("cloud", None, ModelType::Other), shock]).unwrap();
        let err = validate_catalog(&catalog).unwrap_err();
        assert!(matches!(
            err,
            GridError::MissingParameter { parameter: "shock_vel", .. }
        ));
    }

    #[test]
    fn dangling_parent_rejected() {
        let catalog = Catalog::new(vec![row("hc1", Some("ghost"), ModelType::HotCore)]).unwrap();
        assert!(matches!(
            validate_catalog(&catalog),
            Err(GridError::ParentNotFound { run_id, parent_run_id })
                if run_id == "hc1" && parent_run_id == "ghost"
        ));
    }

    #[test]
    fn runs_without_catalogued_parent_are_orphaned() {
        let catalog = Catalog::new(vec![
            row("cloud", None, ModelType::Other),
            row("hc1", Some("cloud"), ModelType::HotCore),
            row("hc2", Some("ghost"), ModelType::HotCore),
            row("hc3", None, ModelType::HotCore),
        ])
        .unwrap();
        let grid = crate::MemoryGrid::new()
            .with_series("cloud", Vec::new())
            .with_series("hc1", Vec::new())
            .with_series("hc2", Vec::new());
        let availability = partition_available(&catalog, &grid, ModelFamily::HotCore);
        assert_eq!(availability.successful.len(), 1);
        let orphans: Vec<&str> = availability.orphaned.iter().map(|r| r.run_id.as_str()).collect();
        assert_eq!(orphans, vec!["hc2", "hc3"]);
    }

    #[test]
    fn non_finite_parameter_rejected() {
        let mut hc = row("hc1", Some("cloud"), ModelType::HotCore);
        hc.zeta = f64::NAN;
        let catalog = Catalog::new(vec![hc]).unwrap();
        assert!(matches!(
            validate_catalog(&catalog),
            Err(GridError::InvalidParameter { .. })
        ));
    }
}
