use std::path::{Path, PathBuf};

use crate::models::{Industry, Region};

/// Path of a processed dataset: `{root}/{region}_{industry}.parquet`,
/// both lowercase. `Industry::All` has no single file; callers combine
/// the two per-industry files instead.
pub fn dataset_path(root: &Path, region: Region, industry: Industry) -> Option<PathBuf> {
    match industry {
        Industry::All => None,
        _ => Some(root.join(format!(
            "{}_{}.parquet",
            region.as_key(),
            industry.as_key()
        ))),
    }
}

/// Region-specific temperature file: `temperature_{region}.parquet`
pub fn temperature_path(root: &Path, region: Region) -> PathBuf {
    root.join(format!("temperature_{}.parquet", region.as_key()))
}

/// Fallback temperature file shared by all regions
pub fn temperature_fallback_path(root: &Path) -> PathBuf {
    root.join("temperature_data.parquet")
}
