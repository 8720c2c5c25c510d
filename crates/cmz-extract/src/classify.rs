//! Stage classification of single samples.
//!
//! Temperature comparisons are exact. The grid emits temperatures on a clamped
//! schedule, so plateau samples repeat the boundary value bit for bit.

use cmz_core::{HOT_PHASE_LIFETIME, Stage};

/// Stage of a warm-up / hot-core sample. Rules are tried in order.
pub fn classify_hotcore(
    temp: f64,
    age: f64,
    initial_temp: f64,
    final_temp: f64,
    age_at_final_temp: f64,
) -> Stage {
    if temp == initial_temp {
        Stage::PreWarmup
    } else if temp > initial_temp && temp < final_temp {
        Stage::Warmup
    } else if temp == final_temp && age <= age_at_final_temp + HOT_PHASE_LIFETIME {
        Stage::HotCore
    } else {
        Stage::Unknown
    }
}

/// Stage of a shock / post-shock sample. Rules are tried in order.
pub fn classify_shock(age: f64, temp: f64, initial_temp: f64, age_at_post_shock: f64) -> Stage {
    if age == 0.0 && temp == initial_temp {
        Stage::PreShock
    } else if temp > initial_temp {
        Stage::Shock
    } else if temp == initial_temp
        && age >= age_at_post_shock
        && age < age_at_post_shock + HOT_PHASE_LIFETIME
    {
        Stage::PostShock
    } else {
        Stage::Unknown
    }
}
