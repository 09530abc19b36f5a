use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::models::{ColumnValues, Industry, RecordTable, Region};
use crate::readers::parquet_reader::read_table;
use crate::utils::constants::INDUSTRY_COLUMN;
use crate::utils::paths;

/// Read-through table store over the processed data directory.
///
/// Loads are cached by exact path for the life of the process; there is no
/// eviction because the dataset is small and read-only. Every load failure
/// (missing file, corrupt file) is reported as `None` so the presentation
/// layer renders a placeholder instead of crashing.
pub struct DatasetStore {
    root: PathBuf,
    cache: Mutex<HashMap<PathBuf, Arc<RecordTable>>>,
}

impl DatasetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load a parquet file, serving repeats from the cache
    pub fn load(&self, path: &Path) -> Option<Arc<RecordTable>> {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(table) = cache.get(path) {
            tracing::debug!(path = %path.display(), "cache hit");
            return Some(Arc::clone(table));
        }

        match read_table(path) {
            Ok(table) => {
                tracing::debug!(
                    path = %path.display(),
                    rows = table.num_rows(),
                    columns = table.num_columns(),
                    "loaded dataset"
                );
                let table = Arc::new(table);
                cache.insert(path.to_path_buf(), Arc::clone(&table));
                Some(table)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to load dataset");
                None
            }
        }
    }

    /// Load the table for a (region, industry) combination.
    ///
    /// `Industry::All` combines the Transport and Warehouse files, tagging
    /// each part with an `Industry` column; if either file is unavailable
    /// the combined load fails.
    pub fn load_dataset(&self, region: Region, industry: Industry) -> Option<Arc<RecordTable>> {
        match industry {
            Industry::All => {
                let parts: Option<Vec<RecordTable>> = Industry::CONCRETE
                    .iter()
                    .map(|&ind| {
                        let path = paths::dataset_path(&self.root, region, ind)?;
                        let table = self.load(&path)?;
                        tag_industry(&table, ind)
                    })
                    .collect();
                let parts = parts?;
                let refs: Vec<&RecordTable> = parts.iter().collect();
                match RecordTable::concat(&refs) {
                    Ok(combined) => Some(Arc::new(combined)),
                    Err(err) => {
                        tracing::warn!(
                            region = region.as_str(),
                            error = %err,
                            "failed to combine industry tables"
                        );
                        None
                    }
                }
            }
            _ => {
                let path = paths::dataset_path(&self.root, region, industry)?;
                self.load(&path)
            }
        }
    }

    /// Load temperature data for a region, falling back to the shared file
    pub fn load_temperature(&self, region: Region) -> Option<Arc<RecordTable>> {
        let region_file = paths::temperature_path(&self.root, region);
        if region_file.exists() {
            return self.load(&region_file);
        }
        let fallback = paths::temperature_fallback_path(&self.root);
        if fallback.exists() {
            return self.load(&fallback);
        }
        tracing::debug!(region = region.as_str(), "no temperature data found");
        None
    }
}

/// Copy of `table` with a constant `Industry` column appended
fn tag_industry(table: &RecordTable, industry: Industry) -> Option<RecordTable> {
    let mut tagged = table.clone();
    let labels = vec![industry.as_str(); table.num_rows()];
    tagged
        .push_column(INDUSTRY_COLUMN, ColumnValues::strings(labels))
        .ok()?;
    Some(tagged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_returns_none() {
        let store = DatasetStore::new("definitely/not/here");
        assert!(store
            .load(Path::new("definitely/not/here/kansai_transport.parquet"))
            .is_none());
        assert!(store
            .load_dataset(Region::Kansai, Industry::Transport)
            .is_none());
        assert!(store.load_temperature(Region::Kanto).is_none());
    }

    #[test]
    fn test_all_industry_requires_both_files() {
        let store = DatasetStore::new("definitely/not/here");
        assert!(store.load_dataset(Region::Kanto, Industry::All).is_none());
    }

    #[test]
    fn test_tag_industry_appends_column() {
        let mut table = RecordTable::new();
        table
            .push_column("Total", ColumnValues::floats(vec![1.0, 2.0]))
            .unwrap();
        let tagged = tag_industry(&table, Industry::Warehouse).unwrap();
        let col = tagged.column(INDUSTRY_COLUMN).unwrap();
        assert_eq!(col.display_at(0).as_deref(), Some("Warehouse"));
        assert_eq!(col.display_at(1).as_deref(), Some("Warehouse"));
    }
}
