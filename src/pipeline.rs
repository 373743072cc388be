//! Merge driver: one [MergedChampion] per active roster entry, written as a single JSON artifact.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::data::{filter_roster, CharacterBin, RosterEntry, SourceData, SourceLoader, StringTable};
use crate::error::{MergeError, Result};
use crate::parallel::WorkerPool;
use crate::resolve::{
    classify_damage_type, resolve_role, select_stat_and_spell, DamageType, RoleIndex,
    SetStatsIndex,
};
use crate::spell::compute_spell_variables;
use crate::tooltip::render_tooltip;

/// Consolidated record for one champion. Built once, never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedChampion {
    pub character_id: String,
    pub tier: u32,
    pub display_name: String,
    pub traits: Vec<Value>,
    /// Rendered extended ability tooltip.
    #[serde(rename = "spell")]
    pub spell_html: String,
    pub damage_type: DamageType,
    /// Authoritative set stats, verbatim.
    pub stats: Value,
}

/// Shared read-only lookups for one run.
pub struct MergeContext<'a> {
    roles: RoleIndex<'a>,
    set_stats: SetStatsIndex<'a>,
    strings: &'a StringTable,
    bins: &'a BTreeMap<String, CharacterBin>,
}

impl<'a> MergeContext<'a> {
    pub fn new(sources: &'a SourceData, content_version: &str) -> Result<Self> {
        Ok(Self {
            roles: RoleIndex::build(&sources.roles),
            set_stats: SetStatsIndex::for_version(&sources.set_data, content_version)?,
            strings: &sources.strings,
            bins: &sources.bins,
        })
    }
}

/// Resolve, compute and render one roster entry.
pub fn merge_champion(entry: &RosterEntry, context: &MergeContext<'_>) -> Result<MergedChampion> {
    let id = entry.character_id.as_str();

    let role = resolve_role(id, &context.roles)?;
    let damage_type = classify_damage_type(&role.name)?;

    let bin = context
        .bins
        .get(id)
        .ok_or_else(|| MergeError::join("character bin", id, 0))?;
    let selected = select_stat_and_spell(id, bin)?;
    let set_champion = context.set_stats.lookup(id)?;

    let variables = compute_spell_variables(selected.spell_key, selected.spell, &selected.stats)?;
    let template = context.strings.tooltip_template(id)?;
    let spell_html = render_tooltip(id, template, &variables)?;
    debug!(character_id = id, role = %role.name, variables = variables.len(), "merged");

    Ok(MergedChampion {
        character_id: entry.character_id.clone(),
        tier: entry.tier,
        display_name: entry.display_name.clone(),
        traits: entry.traits.clone(),
        spell_html,
        damage_type,
        stats: set_champion.stats.clone(),
    })
}

/// Merge every active-version roster entry, in roster order. The first fault aborts the run.
pub fn build_merged_data(
    sources: &SourceData,
    config: &PipelineConfig,
) -> Result<Vec<MergedChampion>> {
    config.validate()?;
    let active = filter_roster(&sources.roster, &config.content_version);
    let context = MergeContext::new(sources, &config.content_version)?;

    if config.workers == 1 {
        return active
            .iter()
            .map(|entry| merge_champion(entry, &context))
            .collect();
    }
    WorkerPool::with_workers(config.workers).install(|| {
        active
            .par_iter()
            .map(|entry| merge_champion(entry, &context))
            .collect::<Result<Vec<_>>>()
    })?
}

/// Serialize the artifact: a JSON array with four-space indentation. Strings are raw UTF-8
/// and object keys inside `stats` and `traits` come out sorted.
pub fn serialize_output(champions: &[MergedChampion]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    champions.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Replace the artifact at `path` wholesale. Writes a sibling temp file and renames it over.
pub fn write_output(path: &Path, champions: &[MergedChampion]) -> Result<()> {
    let payload = serialize_output(champions)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);
    fs::write(&tmp_path, payload)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Load, merge and write. Nothing is written unless every entry merged.
pub fn run_merge<L: SourceLoader + ?Sized>(
    loader: &L,
    config: &PipelineConfig,
) -> Result<Vec<MergedChampion>> {
    let sources = loader.load_sources()?;
    let merged = build_merged_data(&sources, config)?;
    info!(
        champions = merged.len(),
        version = %config.content_version,
        "found champions for set"
    );
    write_output(&config.output_path, &merged)?;
    info!(path = %config.output_path.display(), "wrote merged data");
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fetch::tests::unique_temp_dir;
    use serde_json::json;

    fn champion(id: &str) -> MergedChampion {
        MergedChampion {
            character_id: id.to_string(),
            tier: 1,
            display_name: id.to_string(),
            traits: vec![json!({ "name": "Mage" })],
            spell_html: "Deals 150 damage".to_string(),
            damage_type: DamageType::MAGIC,
            stats: json!({ "hp": 500, "armor": 20 }),
        }
    }

    #[test]
    fn serialize_output_uses_four_space_indent_and_spell_key() {
        let bytes = serialize_output(&[champion("TFT11_Ahri")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("[\n    {\n        \"character_id\": \"TFT11_Ahri\""));
        assert!(text.contains("\"spell\": \"Deals 150 damage\""));
        assert!(text.contains("\"is_ap\": true"));
    }

    #[test]
    fn serialize_output_keeps_utf8_and_sorts_stat_keys() {
        let mut record = champion("TFT11_Ahri");
        record.display_name = "Ahri, Renée".to_string();
        let text = String::from_utf8(serialize_output(&[record]).unwrap()).unwrap();
        assert!(text.contains("\"display_name\": \"Ahri, Renée\""));
        let armor = text.find("\"armor\"").unwrap();
        let hp = text.find("\"hp\"").unwrap();
        assert!(armor < hp);
    }

    #[test]
    fn write_output_replaces_file_and_leaves_no_temp() {
        let dir = unique_temp_dir("write-output");
        let path = dir.join("out").join("merged.json");
        write_output(&path, &[champion("TFT11_Ahri"), champion("TFT11_Zed")]).unwrap();
        write_output(&path, &[champion("TFT11_Zed")]).unwrap();

        let written: Vec<MergedChampion> =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(written, vec![champion("TFT11_Zed")]);
        assert!(!dir.join("out").join("merged.json.tmp").exists());

        let _ = fs::remove_dir_all(dir);
    }
}
