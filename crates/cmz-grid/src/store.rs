//! Directory-backed grid storage.
//!
//! Layout:
//! ```text
//! <root>/catalog.json        array of catalog rows
//! <root>/runs/<run_id>.jsonl one sample per line, temporal order
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::source::GridSource;
use crate::types::{GridRow, TimeSample};
use crate::{GridError, GridResult};

#[derive(Clone)]
pub struct GridStore {
    root_dir: PathBuf,
}

impl GridStore {
    pub fn open(root_dir: PathBuf) -> GridResult<Self> {
        let catalog_path = root_dir.join("catalog.json");
        if !catalog_path.exists() {
            return Err(GridError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("grid catalog not found: {}", catalog_path.display()),
            )));
        }
        Ok(Self { root_dir })
    }

    /// Create an empty grid directory for writing.
    pub fn create(root_dir: PathBuf) -> GridResult<Self> {
        fs::create_dir_all(root_dir.join("runs"))?;
        Ok(Self { root_dir })
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    fn series_path(&self, run_id: &str) -> PathBuf {
        self.root_dir.join("runs").join(format!("{run_id}.jsonl"))
    }

    pub fn save_catalog(&self, rows: &[GridRow]) -> GridResult<()> {
        let json = serde_json::to_string_pretty(rows)?;
        fs::write(self.root_dir.join("catalog.json"), json)?;
        Ok(())
    }

    pub fn save_series(&self, run_id: &str, samples: &[TimeSample]) -> GridResult<()> {
        fs::create_dir_all(self.root_dir.join("runs"))?;
        let mut content = String::new();
        for sample in samples {
            content.push_str(&serde_json::to_string(sample)?);
            content.push('\n');
        }
        fs::write(self.series_path(run_id), content)?;
        Ok(())
    }

    /// Run ids with a stored series, sorted.
    pub fn stored_runs(&self) -> GridResult<Vec<String>> {
        let runs_dir = self.root_dir.join("runs");
        let mut ids = Vec::new();
        if !runs_dir.exists() {
            return Ok(ids);
        }
        for entry in fs::read_dir(runs_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "jsonl")
                && let Some(stem) = path.file_stem()
            {
                ids.push(stem.to_string_lossy().to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl GridSource for GridStore {
    fn catalog_rows(&self) -> GridResult<Vec<GridRow>> {
        let content = fs::read_to_string(self.root_dir.join("catalog.json"))?;
        Ok(serde_json::from_str(&content)?)
    }

    fn has_series(&self, run_id: &str) -> bool {
        self.series_path(run_id).exists()
    }

    fn load_series(&self, run_id: &str) -> GridResult<Vec<TimeSample>> {
        let path = self.series_path(run_id);
        if !path.exists() {
            return Err(GridError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        let mut samples = Vec::new();
        for (i, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let sample =
                serde_json::from_str(line).map_err(|source| GridError::MalformedSeries {
                    run_id: run_id.to_string(),
                    line: i + 1,
                    source,
                })?;
            samples.push(sample);
        }
        Ok(samples)
    }
}
