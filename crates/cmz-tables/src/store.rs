//! Table storage API.
//!
//! Layout, one directory per family:
//! ```text
//! <root>/<family>/manifest.json
//! <root>/<family>/records.jsonl
//! ```
//! Saves go through `.<family>.staging`; a replaced table is parked in
//! `.<family>.previous` until every table of the save is in place.

use std::fs;
use std::path::{Path, PathBuf};

use cmz_core::ModelFamily;
use cmz_extract::{ExtractedRecord, ExtractedTable, ExtractionReport};
use tracing::{info, warn};

use crate::hash::content_hash;
use crate::types::TableManifest;
use crate::{TablesError, TablesResult};

#[derive(Clone)]
pub struct TableStore {
    root_dir: PathBuf,
}

impl TableStore {
    pub fn new(root_dir: PathBuf) -> TablesResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    fn table_dir(&self, family: ModelFamily) -> PathBuf {
        self.root_dir.join(family.tag())
    }

    fn staging_dir(&self, family: ModelFamily) -> PathBuf {
        self.root_dir.join(format!(".{}.staging", family.tag()))
    }

    fn previous_dir(&self, family: ModelFamily) -> PathBuf {
        self.root_dir.join(format!(".{}.previous", family.tag()))
    }

    pub fn has_table(&self, family: ModelFamily) -> bool {
        self.table_dir(family).join("manifest.json").exists()
    }

    /// Write a table, replacing any previous one.
    pub fn save_table(
        &self,
        table: &ExtractedTable,
        report: &ExtractionReport,
    ) -> TablesResult<TableManifest> {
        let family = table.family();
        self.save_tables(&[(table, report)])?
            .pop()
            .ok_or_else(|| TablesError::TableNotFound {
                family: family.to_string(),
            })
    }

    /// Write several tables as one unit. Every table is staged before any is
    /// published; if a publish step fails, tables already swapped in are rolled
    /// back to their previous contents.
    pub fn save_tables(
        &self,
        tables: &[(&ExtractedTable, &ExtractionReport)],
    ) -> TablesResult<Vec<TableManifest>> {
        for (i, (table, _)) in tables.iter().enumerate() {
            if tables[..i].iter().any(|(t, _)| t.family() == table.family()) {
                return Err(TablesError::DuplicateTable {
                    family: table.family().to_string(),
                });
            }
        }

        let mut manifests = Vec::with_capacity(tables.len());
        for (table, report) in tables {
            match self.stage(table, report) {
                Ok(manifest) => manifests.push(manifest),
                Err(err) => {
                    self.discard_staging(tables);
                    return Err(err);
                }
            }
        }

        let mut published: Vec<(ModelFamily, bool)> = Vec::with_capacity(manifests.len());
        for manifest in &manifests {
            match self.publish(manifest.family) {
                Ok(replaced) => published.push((manifest.family, replaced)),
                Err(err) => {
                    warn!(family = %manifest.family, error = %err, "publish failed, rolling back");
                    for (family, replaced) in published.iter().rev() {
                        self.unpublish(*family, *replaced);
                    }
                    self.discard_staging(tables);
                    return Err(err);
                }
            }
        }

        for (family, replaced) in published {
            if replaced && let Err(err) = fs::remove_dir_all(self.previous_dir(family)) {
                warn!(family = %family, error = %err, "could not remove replaced table");
            }
        }
        for manifest in &manifests {
            info!(
                family = %manifest.family,
                records = manifest.record_count,
                hash = %manifest.content_hash,
                "table saved"
            );
        }
        Ok(manifests)
    }

    fn stage(
        &self,
        table: &ExtractedTable,
        report: &ExtractionReport,
    ) -> TablesResult<TableManifest> {
        let family = table.family();
        let manifest = TableManifest {
            family,
            columns: table.columns().to_vec(),
            species: table.species().to_vec(),
            record_count: table.len(),
            run_count: table.run_ids().len(),
            content_hash: content_hash(table)?,
            generated_at: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            report: report.clone(),
        };

        let staging = self.staging_dir(family);
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;

        let mut records_content = String::new();
        for record in table.records() {
            records_content.push_str(&serde_json::to_string(record)?);
            records_content.push('\n');
        }
        fs::write(staging.join("records.jsonl"), records_content)?;
        fs::write(
            staging.join("manifest.json"),
            serde_json::to_string_pretty(&manifest)?,
        )?;
        Ok(manifest)
    }

    /// Swap the staged table into place. Returns whether an older table was
    /// parked in the previous-table slot.
    fn publish(&self, family: ModelFamily) -> TablesResult<bool> {
        let final_dir = self.table_dir(family);
        let previous = self.previous_dir(family);
        if previous.exists() {
            fs::remove_dir_all(&previous)?;
        }

        let replaced = final_dir.exists();
        if replaced {
            fs::rename(&final_dir, &previous)?;
        }
        if let Err(err) = fs::rename(self.staging_dir(family), &final_dir) {
            if replaced && let Err(restore) = fs::rename(&previous, &final_dir) {
                warn!(family = %family, error = %restore, "could not restore previous table");
            }
            return Err(err.into());
        }
        Ok(replaced)
    }

    fn unpublish(&self, family: ModelFamily, replaced: bool) {
        let final_dir = self.table_dir(family);
        if let Err(err) = fs::remove_dir_all(&final_dir) {
            warn!(family = %family, error = %err, "could not remove new table");
        }
        if replaced && let Err(err) = fs::rename(self.previous_dir(family), &final_dir) {
            warn!(family = %family, error = %err, "could not restore previous table");
        }
    }

    fn discard_staging(&self, tables: &[(&ExtractedTable, &ExtractionReport)]) {
        for (table, _) in tables {
            let staging = self.staging_dir(table.family());
            if staging.is_dir() {
                let _ = fs::remove_dir_all(staging);
            }
        }
    }

    pub fn load_manifest(&self, family: ModelFamily) -> TablesResult<TableManifest> {
        let manifest_path = self.table_dir(family).join("manifest.json");

        if !manifest_path.exists() {
            return Err(TablesError::TableNotFound {
                family: family.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    /// Load a table and verify it against its manifest hash.
    pub fn load_table(&self, family: ModelFamily) -> TablesResult<ExtractedTable> {
        let manifest = self.load_manifest(family)?;
        let records_path = self.table_dir(family).join("records.jsonl");

        if !records_path.exists() {
            return Err(TablesError::TableNotFound {
                family: family.to_string(),
            });
        }

        let content = fs::read_to_string(records_path)?;
        let mut records = Vec::with_capacity(manifest.record_count);
        for line in content.lines() {
            if !line.trim().is_empty() {
                let record: ExtractedRecord = serde_json::from_str(line)?;
                records.push(record);
            }
        }

        let table = ExtractedTable::from_parts(family, manifest.columns, manifest.species, records)?;
        let actual = content_hash(&table)?;
        if actual != manifest.content_hash {
            return Err(TablesError::HashMismatch {
                family: family.to_string(),
                expected: manifest.content_hash,
                actual,
            });
        }
        Ok(table)
    }

    pub fn delete_table(&self, family: ModelFamily) -> TablesResult<()> {
        let dir = self.table_dir(family);
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }
}
