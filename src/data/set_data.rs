//! Authoritative per-set champion stats (`cdragon/tft/en_us.json`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetData {
    /// Set number -> set contents.
    #[serde(default)]
    pub sets: BTreeMap<String, SetInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub champions: Vec<SetChampion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetChampion {
    #[serde(rename = "apiName")]
    pub api_name: String,
    /// Copied verbatim into the merged record.
    #[serde(default)]
    pub stats: Value,
}
