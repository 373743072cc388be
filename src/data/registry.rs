//! Fetch registry: where each source dataset came from and when it was fetched.
//! Written next to the cache by the loader; provenance only, the merge never reads it.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSetEntry {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub path: String,
}

pub type Registry = BTreeMap<String, DataSetEntry>;

pub const REGISTRY_FILE_NAME: &str = "registry.json";

pub fn registry_entry(source: &str, data_version: &str, path: &Path) -> DataSetEntry {
    DataSetEntry {
        source: source.to_string(),
        data_version: Some(data_version.to_string()),
        last_updated: Some(chrono::Utc::now().to_rfc3339()),
        path: path.display().to_string(),
    }
}

/// Entry for a file found in the cache with no recorded fetch.
pub fn cached_entry(source: &str, data_version: &str, path: &Path) -> DataSetEntry {
    DataSetEntry {
        source: source.to_string(),
        data_version: Some(data_version.to_string()),
        last_updated: None,
        path: path.display().to_string(),
    }
}

/// Load the registry in `data_dir`; a missing or unreadable file yields an empty registry.
pub fn load_registry(data_dir: &Path) -> Registry {
    let Ok(raw) = fs::read_to_string(data_dir.join(REGISTRY_FILE_NAME)) else {
        return Registry::new();
    };
    serde_json::from_str(&raw).unwrap_or_default()
}

pub fn save_registry(data_dir: &Path, registry: &Registry) -> Result<()> {
    fs::create_dir_all(data_dir)?;
    let payload = serde_json::to_string_pretty(registry)?;
    fs::write(data_dir.join(REGISTRY_FILE_NAME), payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fetch::tests::unique_temp_dir;

    #[test]
    fn registry_round_trips_through_data_dir() {
        let dir = unique_temp_dir("registry");
        assert!(load_registry(&dir).is_empty());

        let mut registry = Registry::new();
        registry.insert(
            "set_data".to_string(),
            registry_entry("https://cdn.test/en_us.json", "11", &dir.join("en_us.json")),
        );
        save_registry(&dir, &registry).unwrap();

        let loaded = load_registry(&dir);
        assert_eq!(loaded, registry);
        assert_eq!(loaded["set_data"].data_version.as_deref(), Some("11"));
        assert!(loaded["set_data"].last_updated.is_some());

        let _ = fs::remove_dir_all(dir);
    }
}
