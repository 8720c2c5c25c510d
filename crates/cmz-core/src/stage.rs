//! Model families and evolutionary stage labels.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Simulation model family. Serialized as the grid's `model_type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFamily {
    /// Protostellar warm-up / hot-core models.
    #[serde(rename = "hotcore")]
    HotCore,
    /// C-type shock / post-shock models.
    #[serde(rename = "cshock")]
    Shock,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 2] = [ModelFamily::HotCore, ModelFamily::Shock];

    /// The `model_type` tag used in the grid catalog.
    pub fn tag(self) -> &'static str {
        match self {
            ModelFamily::HotCore => "hotcore",
            ModelFamily::Shock => "cshock",
        }
    }

    /// Closed set of stage labels a record of this family may carry.
    pub fn stages(self) -> &'static [Stage] {
        match self {
            ModelFamily::HotCore => &[
                Stage::PreWarmup,
                Stage::Warmup,
                Stage::HotCore,
                Stage::Unknown,
            ],
            ModelFamily::Shock => &[
                Stage::PreShock,
                Stage::Shock,
                Stage::PostShock,
                Stage::Unknown,
            ],
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ModelFamily {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hotcore" => Ok(ModelFamily::HotCore),
            "cshock" => Ok(ModelFamily::Shock),
            other => Err(CoreError::UnknownModelType(other.to_string())),
        }
    }
}

/// Evolutionary stage of a single time sample.
///
/// `Unknown` is a valid label (e.g. temperature overshoot, or a sample past the
/// hot-phase lifetime); consumers may filter it but it is never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "pre-warmup")]
    PreWarmup,
    #[serde(rename = "warmup")]
    Warmup,
    #[serde(rename = "hotcore")]
    HotCore,
    #[serde(rename = "pre-shock")]
    PreShock,
    #[serde(rename = "shock")]
    Shock,
    #[serde(rename = "post-shock")]
    PostShock,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::PreWarmup => "pre-warmup",
            Stage::Warmup => "warmup",
            Stage::HotCore => "hotcore",
            Stage::PreShock => "pre-shock",
            Stage::Shock => "shock",
            Stage::PostShock => "post-shock",
            Stage::Unknown => "unknown",
        }
    }

    pub fn belongs_to(self, family: ModelFamily) -> bool {
        family.stages().contains(&self)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Stage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Stage::PreWarmup,
            Stage::Warmup,
            Stage::HotCore,
            Stage::PreShock,
            Stage::Shock,
            Stage::PostShock,
            Stage::Unknown,
        ]
        .into_iter()
        .find(|stage| stage.label() == s)
        .ok_or_else(|| CoreError::UnknownStage(s.to_string()))
    }
}
