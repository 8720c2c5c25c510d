//! Extracted records and the fixed column schema.

use std::collections::BTreeMap;

use cmz_core::{ModelFamily, Stage};
use serde::{Deserialize, Serialize};

/// One flat row: a sample's instantaneous values, its run's static parameters,
/// its parent cloud's parameters and the derived stage.
///
/// Family-specific parameters are `None` for the other family. Species
/// abundances live in a keyed container; the owning table's species list
/// fixes their column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub age: f64,
    #[serde(rename = "locDens")]
    pub loc_dens: f64,
    #[serde(rename = "locTemp")]
    pub loc_temp: f64,
    #[serde(rename = "Av")]
    pub av: f64,
    pub stage: Stage,
    pub run_id: String,
    pub parent_run_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bm0: Option<f64>,
    #[serde(rename = "B0", default, skip_serializing_if = "Option::is_none")]
    pub b0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shock_vel: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_temp: Option<f64>,
    #[serde(rename = "initialDens")]
    pub initial_dens: f64,
    #[serde(rename = "initialTemp")]
    pub initial_temp: f64,
    pub zeta: f64,
    /// Filled in by the table assembler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zeta_scaled: Option<f64>,
    pub radfield: f64,
    pub metallicity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    pub cloud_radfield: f64,
    pub cloud_zeta: f64,
    #[serde(default)]
    pub abundances: BTreeMap<String, f64>,
}

/// Fixed (non-species) columns of an extracted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "age")]
    Age,
    #[serde(rename = "locDens")]
    LocDens,
    #[serde(rename = "locTemp")]
    LocTemp,
    #[serde(rename = "Av")]
    Av,
    #[serde(rename = "stage")]
    Stage,
    #[serde(rename = "run_id")]
    RunId,
    #[serde(rename = "parent_run_id")]
    ParentRunId,
    #[serde(rename = "bm0")]
    Bm0,
    #[serde(rename = "B0")]
    B0,
    #[serde(rename = "shock_vel")]
    ShockVel,
    #[serde(rename = "final_temp")]
    FinalTemp,
    #[serde(rename = "initialDens")]
    InitialDens,
    #[serde(rename = "initialTemp")]
    InitialTemp,
    #[serde(rename = "zeta")]
    Zeta,
    #[serde(rename = "zeta_scaled")]
    ZetaScaled,
    #[serde(rename = "radfield")]
    Radfield,
    #[serde(rename = "metallicity")]
    Metallicity,
    #[serde(rename = "index")]
    Index,
    #[serde(rename = "cloud_radfield")]
    CloudRadfield,
    #[serde(rename = "cloud_zeta")]
    CloudZeta,
}

const ALL_COLUMNS: [Column; 20] = [
    Column::Age,
    Column::LocDens,
    Column::LocTemp,
    Column::Av,
    Column::Stage,
    Column::RunId,
    Column::ParentRunId,
    Column::Bm0,
    Column::B0,
    Column::ShockVel,
    Column::FinalTemp,
    Column::InitialDens,
    Column::InitialTemp,
    Column::Zeta,
    Column::ZetaScaled,
    Column::Radfield,
    Column::Metallicity,
    Column::Index,
    Column::CloudRadfield,
    Column::CloudZeta,
];

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::Age => "age",
            Column::LocDens => "locDens",
            Column::LocTemp => "locTemp",
            Column::Av => "Av",
            Column::Stage => "stage",
            Column::RunId => "run_id",
            Column::ParentRunId => "parent_run_id",
            Column::Bm0 => "bm0",
            Column::B0 => "B0",
            Column::ShockVel => "shock_vel",
            Column::FinalTemp => "final_temp",
            Column::InitialDens => "initialDens",
            Column::InitialTemp => "initialTemp",
            Column::Zeta => "zeta",
            Column::ZetaScaled => "zeta_scaled",
            Column::Radfield => "radfield",
            Column::Metallicity => "metallicity",
            Column::Index => "index",
            Column::CloudRadfield => "cloud_radfield",
            Column::CloudZeta => "cloud_zeta",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        ALL_COLUMNS.into_iter().find(|c| c.name() == name)
    }

    /// Columns a family's records carry before assembly, in table order.
    /// `zeta_scaled` is inserted by the assembler.
    pub fn extracted(family: ModelFamily) -> Vec<Column> {
        let mut columns = vec![
            Column::Age,
            Column::LocDens,
            Column::LocTemp,
            Column::Av,
            Column::Stage,
            Column::RunId,
            Column::ParentRunId,
            Column::Bm0,
        ];
        match family {
            ModelFamily::HotCore => columns.push(Column::FinalTemp),
            ModelFamily::Shock => columns.extend([Column::B0, Column::ShockVel]),
        }
        columns.extend([
            Column::InitialDens,
            Column::InitialTemp,
            Column::Zeta,
            Column::Radfield,
            Column::Metallicity,
        ]);
        if family == ModelFamily::HotCore {
            columns.push(Column::Index);
        }
        columns.extend([Column::CloudRadfield, Column::CloudZeta]);
        columns
    }
}

/// A single value of a record, borrowed for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Number(f64),
    Integer(i64),
    Text(&'a str),
    Missing,
}

impl ExtractedRecord {
    pub fn cell(&self, column: Column) -> Cell<'_> {
        let opt = |v: Option<f64>| v.map(Cell::Number).unwrap_or(Cell::Missing);
        match column {
            Column::Age => Cell::Number(self.age),
            Column::LocDens => Cell::Number(self.loc_dens),
            Column::LocTemp => Cell::Number(self.loc_temp),
            Column::Av => Cell::Number(self.av),
            Column::Stage => Cell::Text(self.stage.label()),
            Column::RunId => Cell::Text(&self.run_id),
            Column::ParentRunId => Cell::Text(&self.parent_run_id),
            Column::Bm0 => opt(self.bm0),
            Column::B0 => opt(self.b0),
            Column::ShockVel => opt(self.shock_vel),
            Column::FinalTemp => opt(self.final_temp),
            Column::InitialDens => Cell::Number(self.initial_dens),
            Column::InitialTemp => Cell::Number(self.initial_temp),
            Column::Zeta => Cell::Number(self.zeta),
            Column::ZetaScaled => opt(self.zeta_scaled),
            Column::Radfield => Cell::Number(self.radfield),
            Column::Metallicity => Cell::Number(self.metallicity),
            Column::Index => self.index.map(Cell::Integer).unwrap_or(Cell::Missing),
            Column::CloudRadfield => Cell::Number(self.cloud_radfield),
            Column::CloudZeta => Cell::Number(self.cloud_zeta),
        }
    }

    /// Numeric value of a parameter column, for membership filtering.
    pub fn numeric(&self, column: Column) -> Option<f64> {
        match self.cell(column) {
            Cell::Number(v) => Some(v),
            Cell::Integer(v) => Some(v as f64),
            Cell::Text(_) | Cell::Missing => None,
        }
    }

    pub fn abundance(&self, species: &str) -> Option<f64> {
        self.abundances.get(species).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_columns_follow_grid_order() {
        let names: Vec<&str> = Column::extracted(ModelFamily::HotCore)
            .into_iter()
            .map(Column::name)
            .collect();
        assert_eq!(
            names,
            vec![
                "age", "locDens", "locTemp", "Av", "stage", "run_id", "parent_run_id", "bm0",
                "final_temp", "initialDens", "initialTemp", "zeta", "radfield", "metallicity",
                "index", "cloud_radfield", "cloud_zeta",
            ]
        );

        let shock = Column::extracted(ModelFamily::Shock);
        assert!(shock.contains(&Column::B0));
        assert!(shock.contains(&Column::ShockVel));
        assert!(!shock.contains(&Column::FinalTemp));
        assert!(!shock.contains(&Column::Index));
    }

    #[test]
    fn column_names_round_trip() {
        for column in ALL_COLUMNS {
            assert_eq!(Column::from_name(column.name()), Some(column));
            let json = serde_json::to_string(&column).unwrap();
            assert_eq!(json, format!("\"{}\"", column.name()));
        }
        assert_eq!(Column::from_name("CH3OH"), None);
    }
}
