//! Convergence gate: decides whether a run is extracted at all.

use cmz_core::ModelFamily;
use cmz_grid::{GridRow, ModelType, TimeSample};

use crate::{ExtractError, ExtractResult};

/// Why a run was excluded from its table. Rejections are counted and logged,
/// never raised.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("model type {found:?} does not belong to this pass")]
    WrongModelType { found: ModelType },

    #[error("run has no samples")]
    EmptySeries,

    #[error("last sample at {last_temp} K, expected {expected} K")]
    NotConverged { last_temp: f64, expected: f64 },

    #[error("temperature never rises above ambient")]
    NoShockEvent,
}

impl Rejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::WrongModelType { .. } => "wrong-model-type",
            Rejection::EmptySeries => "empty-series",
            Rejection::NotConverged { .. } => "not-converged",
            Rejection::NoShockEvent => "no-shock-event",
        }
    }
}

/// Temperature a converged run must end on: the final temperature for hot
/// cores, the ambient temperature for shocks.
pub fn terminal_temp(row: &GridRow, family: ModelFamily) -> ExtractResult<f64> {
    match family {
        ModelFamily::HotCore => row.final_temp.ok_or_else(|| ExtractError::MissingParameter {
            run_id: row.run_id.clone(),
            parameter: "final_temp",
        }),
        ModelFamily::Shock => Ok(row.initial_temp),
    }
}

/// Check a run against its family's convergence criteria.
///
/// The outer `Result` carries catalog faults; the inner one the verdict.
pub fn check_convergence(
    row: &GridRow,
    series: &[TimeSample],
    family: ModelFamily,
) -> ExtractResult<Result<(), Rejection>> {
    if !row.is_family(family) {
        return Ok(Err(Rejection::WrongModelType {
            found: row.model_type,
        }));
    }

    let expected = terminal_temp(row, family)?;
    let Some(last) = series.last() else {
        return Ok(Err(Rejection::EmptySeries));
    };
    if last.gas_temp != expected {
        return Ok(Err(Rejection::NotConverged {
            last_temp: last.gas_temp,
            expected,
        }));
    }

    if family == ModelFamily::Shock && !series.iter().any(|s| s.gas_temp > row.initial_temp) {
        return Ok(Err(Rejection::NoShockEvent));
    }

    Ok(Ok(()))
}
