//! Per-run extraction: gate, transition age, per-sample classification.

use std::collections::BTreeMap;

use cmz_core::{ModelFamily, field_strength};
use cmz_grid::{Catalog, GridRow, TimeSample};

use crate::classify::{classify_hotcore, classify_shock};
use crate::gate::{Rejection, check_convergence, terminal_temp};
use crate::record::ExtractedRecord;
use crate::transition::{age_at_final_temp, age_at_post_shock};
use crate::{ExtractError, ExtractResult};

/// Result of extracting one run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// One record per sample, in temporal order.
    Extracted(Vec<ExtractedRecord>),
    /// The run failed the convergence gate and contributes nothing.
    Rejected(Rejection),
}

/// Per-run reference values shared by every sample's classification.
#[derive(Clone, Copy)]
enum Reference {
    HotCore {
        final_temp: f64,
        age_at_final_temp: f64,
    },
    Shock {
        age_at_post_shock: f64,
    },
}

fn require(row: &GridRow, parameter: &'static str, value: Option<f64>) -> ExtractResult<f64> {
    value.ok_or_else(|| ExtractError::MissingParameter {
        run_id: row.run_id.clone(),
        parameter,
    })
}

/// Extract one run of `family` into flat records.
///
/// `catalog` resolves the parent cloud; `species` selects and orders the
/// abundance columns. `zeta_scaled` is left for the assembler.
pub fn extract_run(
    catalog: &Catalog,
    row: &GridRow,
    series: &[TimeSample],
    family: ModelFamily,
    species: &[String],
) -> ExtractResult<RunOutcome> {
    if let Err(rejection) = check_convergence(row, series, family)? {
        return Ok(RunOutcome::Rejected(rejection));
    }

    let parent_run_id = row
        .parent_run_id
        .as_deref()
        .ok_or_else(|| ExtractError::MissingParameter {
            run_id: row.run_id.clone(),
            parameter: "parent_run_id",
        })?;
    let parent = catalog
        .get(parent_run_id)
        .ok_or_else(|| ExtractError::ParentNotFound {
            run_id: row.run_id.clone(),
            parent_run_id: parent_run_id.to_string(),
        })?;

    let reference = match family {
        ModelFamily::HotCore => {
            let final_temp = terminal_temp(row, family)?;
            Reference::HotCore {
                final_temp,
                age_at_final_temp: age_at_final_temp(&row.run_id, series, final_temp)?,
            }
        }
        ModelFamily::Shock => Reference::Shock {
            age_at_post_shock: age_at_post_shock(&row.run_id, series, row.initial_temp)?,
        },
    };

    let (b0, shock_vel, index) = match family {
        ModelFamily::HotCore => (None, None, row.model_index),
        ModelFamily::Shock => {
            let bm0 = require(row, "bm0", row.bm0)?;
            let shock_vel = require(row, "shock_vel", row.shock_vel)?;
            (Some(field_strength(bm0, row.initial_dens)), Some(shock_vel), None)
        }
    };
    let final_temp = match reference {
        Reference::HotCore { final_temp, .. } => Some(final_temp),
        Reference::Shock { .. } => None,
    };

    let mut records = Vec::with_capacity(series.len());
    for sample in series {
        let stage = match reference {
            Reference::HotCore {
                final_temp,
                age_at_final_temp,
            } => classify_hotcore(
                sample.gas_temp,
                sample.time,
                row.initial_temp,
                final_temp,
                age_at_final_temp,
            ),
            Reference::Shock { age_at_post_shock } => {
                classify_shock(sample.time, sample.gas_temp, row.initial_temp, age_at_post_shock)
            }
        };

        let mut abundances = BTreeMap::new();
        for name in species {
            let value = sample
                .abundance(name)
                .ok_or_else(|| ExtractError::SpeciesMissing {
                    run_id: row.run_id.clone(),
                    species: name.clone(),
                })?;
            abundances.insert(name.clone(), value);
        }

        records.push(ExtractedRecord {
            age: sample.time,
            loc_dens: sample.density,
            loc_temp: sample.gas_temp,
            av: sample.av,
            stage,
            run_id: row.run_id.clone(),
            parent_run_id: parent_run_id.to_string(),
            bm0: row.bm0,
            b0,
            shock_vel,
            final_temp,
            initial_dens: row.initial_dens,
            initial_temp: row.initial_temp,
            zeta: row.zeta,
            zeta_scaled: None,
            radfield: row.radfield,
            metallicity: parent.metallicity,
            index,
            cloud_radfield: parent.radfield,
            cloud_zeta: parent.zeta,
            abundances,
        });
    }

    Ok(RunOutcome::Extracted(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmz_core::Stage;
    use cmz_grid::ModelType;

    fn cloud() -> GridRow {
        GridRow {
            run_id: "cloud".to_string(),
            parent_run_id: None,
            model_type: ModelType::Other,
            initial_temp: 15.0,
            initial_dens: 1.0e4,
            zeta: 1000.0,
            radfield: 100.0,
            metallicity: 0.5,
            final_temp: None,
            shock_vel: None,
            bm0: None,
            model_index: None,
        }
    }

    fn hotcore() -> GridRow {
        GridRow {
            run_id: "hc1".to_string(),
            parent_run_id: Some("cloud".to_string()),
            model_type: ModelType::HotCore,
            initial_temp: 15.0,
            initial_dens: 1.0e6,
            zeta: 10.0,
            radfield: 1000.0,
            metallicity: 1.0,
            final_temp: Some(300.0),
            shock_vel: None,
            bm0: Some(1.0),
            model_index: Some(3),
        }
    }

    fn sample(time: f64, gas_temp: f64) -> TimeSample {
        TimeSample {
            time,
            gas_temp,
            density: 1.0e6,
            av: 10.0,
            abundances: BTreeMap::from([
                ("CH3OH".to_string(), 1.0e-8),
                ("#CH3OH".to_string(), 1.0e-6),
            ]),
        }
    }

    fn warmup_series() -> Vec<TimeSample> {
        vec![
            sample(0.0, 15.0),
            sample(500.0, 150.0),
            sample(1000.0, 300.0),
            sample(1000.0 + 1e5 - 1.0, 300.0),
            sample(1000.0 + 1e5 + 1.0, 300.0),
        ]
    }

    fn species() -> Vec<String> {
        vec!["CH3OH".to_string()]
    }

    #[test]
    fn hotcore_run_records_carry_parent_context() {
        let catalog = Catalog::new(vec![cloud(), hotcore()]).unwrap();
        let outcome = extract_run(
            &catalog,
            &hotcore(),
            &warmup_series(),
            ModelFamily::HotCore,
            &species(),
        )
        .unwrap();
        let RunOutcome::Extracted(records) = outcome else {
            panic!("run should be extracted");
        };

        let stages: Vec<Stage> = records.iter().map(|r| r.stage).collect();
        assert_eq!(
            stages,
            vec![
                Stage::PreWarmup,
                Stage::Warmup,
                Stage::HotCore,
                Stage::HotCore,
                Stage::Unknown,
            ]
        );

        let first = &records[0];
        assert_eq!(first.metallicity, 0.5);
        assert_eq!(first.cloud_radfield, 100.0);
        assert_eq!(first.cloud_zeta, 1000.0);
        assert_eq!(first.radfield, 1000.0);
        assert_eq!(first.final_temp, Some(300.0));
        assert_eq!(first.index, Some(3));
        assert_eq!(first.b0, None);
        assert_eq!(first.zeta_scaled, None);
        assert_eq!(first.abundances.len(), 1);
        assert_eq!(first.abundance("CH3OH"), Some(1.0e-8));
    }

    #[test]
    fn unconverged_run_is_rejected() {
        let catalog = Catalog::new(vec![cloud(), hotcore()]).unwrap();
        let mut series = warmup_series();
        series.push(sample(2.0e5, 310.0));
        let outcome =
            extract_run(&catalog, &hotcore(), &series, ModelFamily::HotCore, &species()).unwrap();
        assert!(matches!(
            outcome,
            RunOutcome::Rejected(Rejection::NotConverged { .. })
        ));
    }

    #[test]
    fn missing_parent_is_fatal() {
        let catalog = Catalog::new(vec![hotcore()]).unwrap();
        let err = extract_run(
            &catalog,
            &hotcore(),
            &warmup_series(),
            ModelFamily::HotCore,
            &species(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ExtractError::ParentNotFound { parent_run_id, .. } if parent_run_id == "cloud"
        ));
    }

    #[test]
    fn missing_species_is_fatal() {
        let catalog = Catalog::new(vec![cloud(), hotcore()]).unwrap();
        let err = extract_run(
            &catalog,
            &hotcore(),
            &warmup_series(),
            ModelFamily::HotCore,
            &["HC3N".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::SpeciesMissing { species, .. } if species == "HC3N"));
    }

    #[test]
    fn shock_run_derives_field_strength() {
        let shock = GridRow {
            run_id: "cs1".to_string(),
            parent_run_id: Some("cloud".to_string()),
            model_type: ModelType::CShock,
            initial_temp: 20.0,
            initial_dens: 1.0e4,
            zeta: 100.0,
            radfield: 10.0,
            metallicity: 1.0,
            final_temp: None,
            shock_vel: Some(25.0),
            bm0: Some(1.0),
            model_index: None,
        };
        let series = vec![
            sample(0.0, 20.0),
            sample(10.0, 45.0),
            sample(20.0, 20.0),
            sample(1e5 + 21.0, 20.0),
        ];
        let catalog = Catalog::new(vec![cloud(), shock.clone()]).unwrap();
        let RunOutcome::Extracted(records) =
            extract_run(&catalog, &shock, &series, ModelFamily::Shock, &species()).unwrap()
        else {
            panic!("shock run should be extracted");
        };

        let stages: Vec<Stage> = records.iter().map(|r| r.stage).collect();
        assert_eq!(
            stages,
            vec![Stage::PreShock, Stage::Shock, Stage::PostShock, Stage::Unknown]
        );
        assert!(records.iter().all(|r| r.b0 == Some(100.0)));
        assert!(records.iter().all(|r| r.shock_vel == Some(25.0)));
        assert!(records.iter().all(|r| r.final_temp.is_none() && r.index.is_none()));
    }
}
