//! Read-only query helpers over extracted tables: stage segments, parameter
//! membership filters, column projection, abundance ratios and CSV rendering.

use std::collections::BTreeMap;

use cmz_core::{ModelFamily, Stage, ranges};
use cmz_extract::{Cell, Column, ExtractedRecord, ExtractedTable};

use crate::error::{AppError, AppResult};

/// Records of one stage, in table order.
pub fn segment(table: &ExtractedTable, stage: Stage) -> Vec<&ExtractedRecord> {
    table
        .records()
        .iter()
        .filter(|record| record.stage == stage)
        .collect()
}

/// Columns that can be constrained by a membership filter.
const FILTERABLE: [Column; 12] = [
    Column::Zeta,
    Column::InitialDens,
    Column::InitialTemp,
    Column::Radfield,
    Column::FinalTemp,
    Column::ShockVel,
    Column::Index,
    Column::CloudRadfield,
    Column::CloudZeta,
    Column::Metallicity,
    Column::Bm0,
    Column::B0,
];

/// Conjunction of per-column membership tests. A record passes when, for every
/// constrained column, its value is one of the selected values.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    constraints: Vec<(Column, Vec<f64>)>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain a column. An empty selection leaves the column unconstrained.
    pub fn with(mut self, column: Column, values: Vec<f64>) -> AppResult<Self> {
        if !FILTERABLE.contains(&column) {
            return Err(AppError::InvalidInput(format!(
                "Column {} cannot be filtered",
                column.name()
            )));
        }
        if !values.is_empty() {
            self.constraints.push((column, values));
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn matches(&self, record: &ExtractedRecord) -> bool {
        self.constraints.iter().all(|(column, values)| {
            record
                .numeric(*column)
                .is_some_and(|value| values.contains(&value))
        })
    }

    pub fn apply<'a>(
        &self,
        records: impl IntoIterator<Item = &'a ExtractedRecord>,
    ) -> Vec<&'a ExtractedRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }

    /// Selected values that are not grid points of `family`. Such selections
    /// can only ever match nothing.
    pub fn off_grid(&self, family: ModelFamily) -> Vec<(Column, f64)> {
        let mut off = Vec::new();
        for (column, values) in &self.constraints {
            let Some(grid) = ranges::values(family, column.name()) else {
                continue;
            };
            for value in values {
                if !grid.contains(value) {
                    off.push((*column, *value));
                }
            }
        }
        off
    }
}

/// Parse a `column=v1,v2,...` filter argument.
pub fn parse_filter(arg: &str) -> AppResult<(Column, Vec<f64>)> {
    let (name, list) = arg
        .split_once('=')
        .ok_or_else(|| AppError::InvalidInput(format!("Expected column=values, got {}", arg)))?;
    let column = Column::from_name(name.trim())
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown column: {}", name)))?;
    let values = list
        .split(',')
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| AppError::InvalidInput(format!("Not a number: {}", v)))
        })
        .collect::<AppResult<Vec<f64>>>()?;
    Ok((column, values))
}

/// Split requested column names into fixed columns and species of `table`.
/// An empty request selects every column.
pub fn resolve_columns(
    table: &ExtractedTable,
    names: &[String],
) -> AppResult<(Vec<Column>, Vec<String>)> {
    if names.is_empty() {
        return Ok((table.columns().to_vec(), table.species().to_vec()));
    }

    let mut columns = Vec::new();
    let mut species = Vec::new();
    for name in names {
        if let Some(column) = Column::from_name(name).filter(|c| table.columns().contains(c)) {
            columns.push(column);
        } else if table.species().contains(name) {
            species.push(name.clone());
        } else {
            return Err(AppError::InvalidInput(format!(
                "Unknown column for {} table: {}",
                table.family(),
                name
            )));
        }
    }
    Ok((columns, species))
}

fn csv_field(out: &mut String, cell: Cell<'_>) {
    match cell {
        // Debug switches to exponent notation for abundances.
        Cell::Number(v) => out.push_str(&format!("{:?}", v)),
        Cell::Integer(v) => out.push_str(&v.to_string()),
        Cell::Text(s) if s.contains([',', '"', '\n']) => {
            out.push('"');
            out.push_str(&s.replace('"', "\"\""));
            out.push('"');
        }
        Cell::Text(s) => out.push_str(s),
        Cell::Missing => {}
    }
}

/// CSV text of a projection: header line, then one line per record.
pub fn project_csv(records: &[&ExtractedRecord], columns: &[Column], species: &[String]) -> String {
    let mut csv = String::new();
    let header: Vec<&str> = columns
        .iter()
        .map(|c| c.name())
        .chain(species.iter().map(String::as_str))
        .collect();
    for (i, name) in header.iter().enumerate() {
        if i > 0 {
            csv.push(',');
        }
        csv_field(&mut csv, Cell::Text(name));
    }
    csv.push('\n');

    for record in records {
        let mut first = true;
        for column in columns {
            if !first {
                csv.push(',');
            }
            first = false;
            csv_field(&mut csv, record.cell(*column));
        }
        for name in species {
            if !first {
                csv.push(',');
            }
            first = false;
            let cell = record
                .abundance(name)
                .map(Cell::Number)
                .unwrap_or(Cell::Missing);
            csv_field(&mut csv, cell);
        }
        csv.push('\n');
    }
    csv
}

/// One sample of an abundance ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioPoint<'a> {
    pub run_id: &'a str,
    pub age: f64,
    pub ratio: f64,
}

/// Parse a `numerator/denominator` ratio argument.
pub fn parse_ratio(arg: &str) -> AppResult<(String, String)> {
    let (numerator, denominator) = arg
        .split_once('/')
        .ok_or_else(|| AppError::InvalidInput(format!("Expected A/B, got {}", arg)))?;
    Ok((numerator.trim().to_string(), denominator.trim().to_string()))
}

/// Per-record `numerator / denominator` abundance ratio, in record order.
///
/// Both species must be columns of `table` and must differ. A zero
/// denominator yields an infinite or NaN ratio, which is kept.
pub fn species_ratio<'a>(
    table: &ExtractedTable,
    records: &[&'a ExtractedRecord],
    numerator: &str,
    denominator: &str,
) -> AppResult<Vec<RatioPoint<'a>>> {
    if numerator == denominator {
        return Err(AppError::InvalidInput(format!(
            "Ratio needs two different species, got {} twice",
            numerator
        )));
    }
    for name in [numerator, denominator] {
        if !table.species().iter().any(|s| s == name) {
            return Err(AppError::InvalidInput(format!(
                "Species {} is not in the {} table",
                name,
                table.family()
            )));
        }
    }

    let mut points = Vec::with_capacity(records.len());
    for record in records {
        let (Some(top), Some(bottom)) = (record.abundance(numerator), record.abundance(denominator))
        else {
            return Err(AppError::InvalidInput(format!(
                "Run {} lacks {} or {}",
                record.run_id, numerator, denominator
            )));
        };
        points.push(RatioPoint {
            run_id: &record.run_id,
            age: record.age,
            ratio: top / bottom,
        });
    }
    Ok(points)
}

/// CSV text of a ratio series: `run_id,age,<numerator>/<denominator>`.
pub fn ratio_csv(points: &[RatioPoint<'_>], numerator: &str, denominator: &str) -> String {
    let mut csv = String::from("run_id,age,");
    csv_field(&mut csv, Cell::Text(&format!("{}/{}", numerator, denominator)));
    csv.push('\n');
    for point in points {
        csv_field(&mut csv, Cell::Text(point.run_id));
        csv.push(',');
        csv_field(&mut csv, Cell::Number(point.age));
        csv.push(',');
        csv_field(&mut csv, Cell::Number(point.ratio));
        csv.push('\n');
    }
    csv
}

/// Summary of a table's contents.
#[derive(Debug, Clone)]
pub struct TableSummary {
    pub family: ModelFamily,
    pub record_count: usize,
    pub run_count: usize,
    pub stage_counts: BTreeMap<Stage, usize>,
    pub age_range: Option<(f64, f64)>,
}

pub fn table_summary(table: &ExtractedTable) -> TableSummary {
    let mut stage_counts = BTreeMap::new();
    let mut age_range: Option<(f64, f64)> = None;
    for record in table.records() {
        *stage_counts.entry(record.stage).or_insert(0) += 1;
        age_range = Some(match age_range {
            Some((lo, hi)) => (lo.min(record.age), hi.max(record.age)),
            None => (record.age, record.age),
        });
    }
    TableSummary {
        family: table.family(),
        record_count: table.len(),
        run_count: table.run_ids().len(),
        stage_counts,
        age_range,
    }
}
