//! Record selection inside a character bin and in the active set's stat table.

use std::collections::HashMap;

use serde_json::Value;

use crate::data::{CharacterBin, SetChampion, SetData, StatBlock};
use crate::error::{exactly_one, MergeError, Result};

const ROOT_SUFFIX: &str = "/Root";
const SPELL_SUFFIX: &str = "Spell";

/// The stat block and ability entry picked from one character bin.
#[derive(Debug, Clone)]
pub struct SelectedRecords<'a> {
    pub stats: StatBlock,
    pub spell_key: &'a str,
    /// The ability entry; its `mSpell` object is the spell definition.
    pub spell: &'a Value,
}

/// Pick the single `/Root` stat record and the single `…Spell` ability record of a bin.
pub fn select_stat_and_spell<'a>(
    character_id: &str,
    bin: &'a CharacterBin,
) -> Result<SelectedRecords<'a>> {
    let roots: Vec<_> = bin
        .iter()
        .filter(|(key, _)| key.ends_with(ROOT_SUFFIX))
        .collect();
    let spells: Vec<_> = bin
        .iter()
        .filter(|(key, _)| key.ends_with(SPELL_SUFFIX))
        .collect();

    let (root_key, root) = exactly_one("stat block", character_id, roots)?;
    let (spell_key, spell) = exactly_one("ability", character_id, spells)?;

    let stats: StatBlock =
        serde_json::from_value(root.clone()).map_err(|err| MergeError::MalformedRecord {
            key: root_key.clone(),
            reason: err.to_string(),
        })?;

    Ok(SelectedRecords {
        stats,
        spell_key: spell_key.as_str(),
        spell,
    })
}

/// Champion stats of the active set, indexed by `apiName`.
#[derive(Debug)]
pub struct SetStatsIndex<'a> {
    by_api_name: HashMap<&'a str, Vec<&'a SetChampion>>,
}

impl<'a> SetStatsIndex<'a> {
    /// Index the set whose number equals `content_version`; that set must exist.
    pub fn for_version(set_data: &'a SetData, content_version: &str) -> Result<Self> {
        let sets: Vec<_> = set_data
            .sets
            .iter()
            .filter(|(number, _)| number.as_str() == content_version)
            .map(|(_, set)| set)
            .collect();
        let set = exactly_one("content version", content_version, sets)?;

        let mut by_api_name: HashMap<&'a str, Vec<&'a SetChampion>> = HashMap::new();
        for champion in &set.champions {
            by_api_name
                .entry(champion.api_name.as_str())
                .or_default()
                .push(champion);
        }
        Ok(Self { by_api_name })
    }

    pub fn lookup(&self, character_id: &str) -> Result<&'a SetChampion> {
        let matches = self
            .by_api_name
            .get(character_id)
            .cloned()
            .unwrap_or_default();
        exactly_one("set champion", character_id, matches)
    }
}
