//! Team planner roster: one entry per character, in display order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::version_prefix;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub character_id: String,
    pub tier: u32,
    pub display_name: String,
    #[serde(default)]
    pub traits: Vec<Value>,
    #[serde(default, rename = "squareIconPath", skip_serializing_if = "Option::is_none")]
    pub square_icon_path: Option<String>,
    #[serde(
        default,
        rename = "squareSplashIconPath",
        skip_serializing_if = "Option::is_none"
    )]
    pub square_splash_icon_path: Option<String>,
}

/// Upstream has shipped the roster both as a bare list and grouped by set name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RosterFile {
    List(Vec<RosterEntry>),
    BySet(BTreeMap<String, Vec<RosterEntry>>),
}

/// Parse either roster shape into one list. Grouped rosters are flattened in set-name order.
pub fn parse_roster(value: Value) -> Result<Vec<RosterEntry>, serde_json::Error> {
    let file: RosterFile = serde_json::from_value(value)?;
    Ok(match file {
        RosterFile::List(entries) => entries,
        RosterFile::BySet(sets) => sets.into_values().flatten().collect(),
    })
}

/// Entries whose id carries the active set tag (e.g. `TFT11_`), in roster order.
pub fn filter_roster(roster: &[RosterEntry], content_version: &str) -> Vec<RosterEntry> {
    let prefix = version_prefix(content_version);
    roster
        .iter()
        .filter(|entry| entry.character_id.contains(&prefix))
        .cloned()
        .collect()
}
