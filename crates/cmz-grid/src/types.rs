//! Grid data types.

use std::collections::BTreeMap;

use cmz_core::ModelFamily;
use serde::{Deserialize, Serialize};

pub type RunId = String;

/// `model_type` tag of a catalog row. Parent clouds and any other auxiliary
/// runs collapse into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    #[serde(rename = "hotcore")]
    HotCore,
    #[serde(rename = "cshock")]
    CShock,
    #[serde(other, rename = "other")]
    Other,
}

impl ModelType {
    pub fn family(self) -> Option<ModelFamily> {
        match self {
            ModelType::HotCore => Some(ModelFamily::HotCore),
            ModelType::CShock => Some(ModelFamily::Shock),
            ModelType::Other => None,
        }
    }
}

impl From<ModelFamily> for ModelType {
    fn from(family: ModelFamily) -> Self {
        match family {
            ModelFamily::HotCore => ModelType::HotCore,
            ModelFamily::Shock => ModelType::CShock,
        }
    }
}

/// One simulation run's static configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridRow {
    pub run_id: RunId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_run_id: Option<RunId>,
    pub model_type: ModelType,
    #[serde(rename = "initialTemp")]
    pub initial_temp: f64,
    #[serde(rename = "initialDens")]
    pub initial_dens: f64,
    pub zeta: f64,
    pub radfield: f64,
    pub metallicity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shock_vel: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bm0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_index: Option<i64>,
}

impl GridRow {
    pub fn is_family(&self, family: ModelFamily) -> bool {
        self.model_type.family() == Some(family)
    }
}

/// One row of a run's trajectory. Every column other than the four physical
/// ones is a species abundance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSample {
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "gasTemp")]
    pub gas_temp: f64,
    #[serde(rename = "Density")]
    pub density: f64,
    #[serde(rename = "Av")]
    pub av: f64,
    #[serde(flatten)]
    pub abundances: BTreeMap<String, f64>,
}

impl TimeSample {
    pub fn abundance(&self, species: &str) -> Option<f64> {
        self.abundances.get(species).copied()
    }
}
