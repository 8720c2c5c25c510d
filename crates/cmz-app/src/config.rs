//! Explorer configuration file.
//!
//! ```yaml
//! grid_dir: grid            # catalog.json + runs/
//! output_dir: tables        # one directory per family
//! species: all              # all | exclude_coms | [CO, "#CO", ...]
//! parallel: false
//! ```
//! Relative paths are resolved against the config file's directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use cmz_core::species;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesPreset {
    All,
    ExcludeComs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpeciesSelection {
    Preset(SpeciesPreset),
    List(Vec<String>),
}

impl Default for SpeciesSelection {
    fn default() -> Self {
        SpeciesSelection::Preset(SpeciesPreset::All)
    }
}

impl SpeciesSelection {
    pub fn resolve(&self) -> Vec<String> {
        match self {
            SpeciesSelection::Preset(SpeciesPreset::All) => species::all(),
            SpeciesSelection::Preset(SpeciesPreset::ExcludeComs) => species::excluding_coms(),
            SpeciesSelection::List(names) => names.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    pub grid_dir: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub species: SpeciesSelection,
    #[serde(default)]
    pub parallel: bool,
}

impl ExplorerConfig {
    pub fn validate(&self) -> AppResult<()> {
        let names = self.species.resolve();
        if names.is_empty() {
            return Err(AppError::Config("species list is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for name in &names {
            if name.trim().is_empty() {
                return Err(AppError::Config("blank species name".to_string()));
            }
            if !seen.insert(name.as_str()) {
                return Err(AppError::Config(format!("duplicate species: {}", name)));
            }
        }
        Ok(())
    }

    fn resolve_paths(mut self, base: &Path) -> Self {
        if self.grid_dir.is_relative() {
            self.grid_dir = base.join(&self.grid_dir);
        }
        if self.output_dir.is_relative() {
            self.output_dir = base.join(&self.output_dir);
        }
        self
    }
}

pub fn load_config(path: &Path) -> AppResult<ExplorerConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ExplorerConfig = serde_yaml::from_str(&content)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let config = config.resolve_paths(base);
    config.validate()?;
    Ok(config)
}
