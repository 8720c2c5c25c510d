//! Ages at which a run crosses its defining transition.

use cmz_grid::TimeSample;

use crate::{ExtractError, ExtractResult};

fn first_age(
    run_id: &str,
    series: &[TimeSample],
    predicate: impl Fn(&TimeSample) -> bool,
) -> ExtractResult<f64> {
    series
        .iter()
        .find(|sample| predicate(sample))
        .map(|sample| sample.time)
        .ok_or_else(|| ExtractError::TransitionNotFound {
            run_id: run_id.to_string(),
        })
}

/// Age of the first sample at the run's final temperature.
pub fn age_at_final_temp(run_id: &str, series: &[TimeSample], final_temp: f64) -> ExtractResult<f64> {
    first_age(run_id, series, |s| s.gas_temp == final_temp)
}

/// Age of the first sample back at ambient temperature. Age 0 is excluded so
/// the pre-shock sample never matches.
pub fn age_at_post_shock(
    run_id: &str,
    series: &[TimeSample],
    initial_temp: f64,
) -> ExtractResult<f64> {
    first_age(run_id, series, |s| s.gas_temp == initial_temp && s.time > 0.0)
}
