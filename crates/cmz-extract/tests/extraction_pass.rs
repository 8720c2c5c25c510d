use std::collections::BTreeMap;

use cmz_core::{ModelFamily, Stage, ZETA_SCALE_FACTOR};
use cmz_extract::{AssembleOptions, ExtractError, assemble_table};
use cmz_grid::{Catalog, GridRow, MemoryGrid, ModelType, TimeSample};

const SPECIES: [&str; 2] = ["SIO", "#CH3OH"];

fn species() -> Vec<String> {
    SPECIES.iter().map(|s| s.to_string()).collect()
}

fn sample(time: f64, gas_temp: f64) -> TimeSample {
    TimeSample {
        time,
        gas_temp,
        density: 1.0e5,
        av: 5.0,
        abundances: SPECIES
            .iter()
            .map(|s| (s.to_string(), 1.0e-9 * (time + 1.0)))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn row(run_id: &str, model_type: ModelType) -> GridRow {
    GridRow {
        run_id: run_id.to_string(),
        parent_run_id: Some("cloud".to_string()),
        model_type,
        initial_temp: 20.0,
        initial_dens: 1.0e5,
        zeta: 100.0,
        radfield: 10.0,
        metallicity: 1.0,
        final_temp: Some(300.0),
        shock_vel: Some(20.0),
        bm0: Some(1.0),
        model_index: Some(2),
    }
}

fn cloud() -> GridRow {
    GridRow {
        run_id: "cloud".to_string(),
        parent_run_id: None,
        model_type: ModelType::Other,
        initial_temp: 10.0,
        initial_dens: 1.0e2,
        zeta: 1000.0,
        radfield: 1.0,
        metallicity: 0.8,
        final_temp: None,
        shock_vel: None,
        bm0: None,
        model_index: None,
    }
}

/// Cloud, two good shocks, one that never cools, one that never heats, one
/// hot core, and one shock whose series was never written.
fn grid() -> MemoryGrid {
    MemoryGrid::new()
        .with_row(cloud())
        .with_row(row("s_good", ModelType::CShock))
        .with_row(row("s_hot_end", ModelType::CShock))
        .with_row(row("s_flat", ModelType::CShock))
        .with_row(row("hc", ModelType::HotCore))
        .with_row(row("s_good2", ModelType::CShock))
        .with_row(row("s_missing", ModelType::CShock))
        .with_series("cloud", vec![sample(0.0, 10.0)])
        .with_series(
            "s_good",
            vec![
                sample(0.0, 20.0),
                sample(10.0, 45.0),
                sample(20.0, 20.0),
                sample(1e5 + 21.0, 20.0),
            ],
        )
        .with_series(
            "s_hot_end",
            vec![sample(0.0, 20.0), sample(10.0, 800.0), sample(20.0, 60.0)],
        )
        .with_series(
            "s_flat",
            vec![sample(0.0, 20.0), sample(10.0, 20.0), sample(20.0, 20.0)],
        )
        .with_series(
            "hc",
            vec![sample(0.0, 20.0), sample(100.0, 150.0), sample(200.0, 300.0)],
        )
        .with_series(
            "s_good2",
            vec![sample(0.0, 20.0), sample(5.0, 1200.0), sample(50.0, 20.0)],
        )
}

fn shock_pass(grid: &MemoryGrid, parallel: bool) -> cmz_extract::ExtractedTable {
    let catalog = Catalog::load(grid).expect("catalog");
    let (table, _) = assemble_table(
        grid,
        &catalog,
        ModelFamily::Shock,
        &species(),
        &AssembleOptions { parallel },
    )
    .expect("shock pass failed");
    table
}

#[test]
fn only_converged_shocks_are_extracted() {
    let grid = grid();
    let catalog = Catalog::load(&grid).expect("catalog");
    let (table, report) = assemble_table(
        &grid,
        &catalog,
        ModelFamily::Shock,
        &species(),
        &AssembleOptions::default(),
    )
    .expect("shock pass failed");

    assert_eq!(table.run_ids(), vec!["s_good", "s_good2"]);
    assert_eq!(table.len(), 7);
    assert!(table.records().iter().all(|r| r.run_id != "s_hot_end"));
    assert!(table.records().iter().all(|r| r.run_id != "s_flat"));

    assert_eq!(report.candidate_runs, 5);
    assert_eq!(report.unavailable_runs, 1);
    assert_eq!(report.extracted_runs, 2);
    assert_eq!(report.rejections.get("not-converged"), Some(&1));
    assert_eq!(report.rejections.get("no-shock-event"), Some(&1));
    assert_eq!(report.records, 7);

    let stages: Vec<Stage> = table
        .records()
        .iter()
        .filter(|r| r.run_id == "s_good")
        .map(|r| r.stage)
        .collect();
    assert_eq!(
        stages,
        vec![Stage::PreShock, Stage::Shock, Stage::PostShock, Stage::Unknown]
    );
}

#[test]
fn records_carry_scaled_zeta_and_cloud_context() {
    let table = shock_pass(&grid(), false);
    for record in table.records() {
        assert_eq!(record.zeta_scaled, Some(record.zeta * ZETA_SCALE_FACTOR));
        assert_eq!(record.cloud_zeta, 1000.0);
        assert_eq!(record.cloud_radfield, 1.0);
        assert_eq!(record.metallicity, 0.8);
        assert_eq!(record.b0, Some(300.0));
        assert!(record.stage.belongs_to(ModelFamily::Shock));
        assert_eq!(record.abundances.len(), SPECIES.len());
    }

    let header = table.header();
    let zeta = header.iter().position(|c| *c == "zeta").unwrap();
    assert_eq!(header[zeta + 1], "zeta_scaled");
    assert_eq!(&header[header.len() - 2..], &["SIO", "#CH3OH"]);
}

#[test]
fn hotcore_pass_uses_hotcore_rows_only() {
    let grid = grid();
    let catalog = Catalog::load(&grid).expect("catalog");
    let (table, report) = assemble_table(
        &grid,
        &catalog,
        ModelFamily::HotCore,
        &species(),
        &AssembleOptions::default(),
    )
    .expect("hotcore pass failed");

    assert_eq!(table.run_ids(), vec!["hc"]);
    assert_eq!(report.candidate_runs, 1);
    let stages: Vec<Stage> = table.records().iter().map(|r| r.stage).collect();
    assert_eq!(stages, vec![Stage::PreWarmup, Stage::Warmup, Stage::HotCore]);
    assert!(table.records().iter().all(|r| r.index == Some(2)));
}

#[test]
fn regeneration_is_stable() {
    let grid = grid();
    let first = shock_pass(&grid, false);
    let second = shock_pass(&grid, false);
    let parallel = shock_pass(&grid, true);
    assert_eq!(first, second);
    assert_eq!(first, parallel);
}

#[test]
fn missing_parent_aborts_the_pass() {
    let mut orphan = row("s_orphan", ModelType::CShock);
    orphan.parent_run_id = Some("ghost".to_string());
    let grid = grid()
        .with_row(orphan)
        .with_series(
            "s_orphan",
            vec![sample(0.0, 20.0), sample(10.0, 90.0), sample(20.0, 20.0)],
        );

    let catalog = Catalog::load(&grid).expect("catalog");
    let err = assemble_table(
        &grid,
        &catalog,
        ModelFamily::Shock,
        &species(),
        &AssembleOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ExtractError::ParentNotFound { run_id, parent_run_id }
            if run_id == "s_orphan" && parent_run_id == "ghost"
    ));
}

#[test]
fn missing_parent_aborts_even_when_the_run_is_rejected() {
    let mut orphan = row("s_orphan_flat", ModelType::CShock);
    orphan.parent_run_id = Some("ghost".to_string());
    let grid = MemoryGrid::new()
        .with_row(cloud())
        .with_row(orphan)
        .with_series("cloud", vec![sample(0.0, 10.0)])
        .with_series("s_orphan_flat", vec![sample(0.0, 20.0), sample(10.0, 20.0)]);

    let catalog = Catalog::load(&grid).expect("catalog");
    for parallel in [false, true] {
        let err = assemble_table(
            &grid,
            &catalog,
            ModelFamily::Shock,
            &species(),
            &AssembleOptions { parallel },
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::ParentNotFound { .. }));
    }
}

#[test]
fn gate_passing_run_without_transition_is_fatal() {
    // Heated and back at ambient, but every sample sits at age 0.
    let grid = MemoryGrid::new()
        .with_row(cloud())
        .with_row(row("s_instant", ModelType::CShock))
        .with_series("cloud", vec![sample(0.0, 10.0)])
        .with_series("s_instant", vec![sample(0.0, 90.0), sample(0.0, 20.0)]);

    let catalog = Catalog::load(&grid).expect("catalog");
    let err = assemble_table(
        &grid,
        &catalog,
        ModelFamily::Shock,
        &species(),
        &AssembleOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ExtractError::TransitionNotFound { run_id } if run_id == "s_instant"));
}
