//! Two-hop role lookup (character id -> character record -> role record) and damage classification.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::RoleTable;
use crate::error::{exactly_one, MergeError, Result};

/// Pre-built indices over the role table: character name -> record paths, and path -> record.
#[derive(Debug)]
pub struct RoleIndex<'a> {
    by_character: HashMap<&'a str, Vec<&'a str>>,
    records: &'a RoleTable,
}

impl<'a> RoleIndex<'a> {
    pub fn build(table: &'a RoleTable) -> Self {
        let mut by_character: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        for (path, record) in table {
            if let Some(name) = record.get("mCharacterName").and_then(Value::as_str) {
                by_character.entry(name).or_default().push(path.as_str());
            }
        }
        Self {
            by_character,
            records: table,
        }
    }

    fn character_records(&self, character_id: &str) -> Vec<&'a str> {
        self.by_character
            .get(character_id)
            .cloned()
            .unwrap_or_default()
    }

    fn records_at(&self, path: &str) -> Vec<(&'a str, &'a Value)> {
        self.records
            .get_key_value(path)
            .map(|(key, record)| (key.as_str(), record))
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRole {
    /// Role record path in the role table.
    pub path: String,
    /// Role name, e.g. `APCaster`.
    pub name: String,
}

/// Resolve `character_id` to its role record through the character record's `CharacterRole`.
pub fn resolve_role(character_id: &str, index: &RoleIndex<'_>) -> Result<CharacterRole> {
    let character_path = exactly_one(
        "character record",
        character_id,
        index.character_records(character_id),
    )?;
    let role_path = index
        .records
        .get(character_path)
        .and_then(|record| record.get("CharacterRole"))
        .and_then(Value::as_str)
        .ok_or_else(|| MergeError::join("character role", character_id, 0))?;

    let (path, role) = exactly_one("role record", role_path, index.records_at(role_path))?;
    let name = role
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| MergeError::MalformedRecord {
            key: path.to_string(),
            reason: "role record has no 'name'".to_string(),
        })?;

    Ok(CharacterRole {
        path: path.to_string(),
        name: name.to_string(),
    })
}

/// Primary damage of a character. Exactly one flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageType {
    pub is_ad: bool,
    pub is_ap: bool,
}

impl DamageType {
    pub const MAGIC: DamageType = DamageType {
        is_ad: false,
        is_ap: true,
    };
    pub const PHYSICAL: DamageType = DamageType {
        is_ad: true,
        is_ap: false,
    };
}

/// Classify by role-name prefix: `AP…` is magic, `AD…` is physical.
pub fn classify_damage_type(role_name: &str) -> Result<DamageType> {
    if role_name.starts_with("AP") {
        Ok(DamageType::MAGIC)
    } else if role_name.starts_with("AD") {
        Ok(DamageType::PHYSICAL)
    } else {
        Err(MergeError::UnrecognizedCategory {
            role: role_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn role_table(entries: Value) -> RoleTable {
        serde_json::from_value(entries).unwrap()
    }

    fn sample_table() -> RoleTable {
        role_table(json!({
            "Characters/TFT11_Ahri": {
                "mCharacterName": "TFT11_Ahri",
                "CharacterRole": "Roles/APCaster",
            },
            "Characters/TFT11_Yasuo": {
                "mCharacterName": "TFT11_Yasuo",
                "CharacterRole": "Roles/ADFighter",
            },
            "Roles/APCaster": { "name": "APCaster" },
            "Roles/ADFighter": { "name": "ADFighter" },
        }))
    }

    #[test]
    fn resolve_role_follows_both_hops() {
        let table = sample_table();
        let index = RoleIndex::build(&table);
        let role = resolve_role("TFT11_Ahri", &index).unwrap();
        assert_eq!(role.name, "APCaster");
        assert_eq!(role.path, "Roles/APCaster");
    }

    #[test]
    fn resolve_role_is_deterministic() {
        let table = sample_table();
        let index = RoleIndex::build(&table);
        let first = resolve_role("TFT11_Yasuo", &index).unwrap();
        for _ in 0..5 {
            assert_eq!(resolve_role("TFT11_Yasuo", &index).unwrap(), first);
        }
    }

    #[test]
    fn resolve_role_rejects_unknown_and_duplicate_characters() {
        let mut table = sample_table();
        table.insert(
            "Characters/TFT11_Ahri_Copy".to_string(),
            json!({ "mCharacterName": "TFT11_Ahri", "CharacterRole": "Roles/APCaster" }),
        );
        let index = RoleIndex::build(&table);

        let err = resolve_role("TFT11_Ahri", &index).unwrap_err();
        assert!(matches!(
            err,
            MergeError::JoinAmbiguity { join: "character record", matches: 2, .. }
        ));

        let err = resolve_role("TFT11_Missing", &index).unwrap_err();
        assert!(matches!(err, MergeError::JoinAmbiguity { matches: 0, .. }));
    }

    #[test]
    fn resolve_role_rejects_dangling_role_reference() {
        let table = role_table(json!({
            "Characters/TFT11_Ahri": {
                "mCharacterName": "TFT11_Ahri",
                "CharacterRole": "Roles/Gone",
            },
        }));
        let index = RoleIndex::build(&table);
        let err = resolve_role("TFT11_Ahri", &index).unwrap_err();
        assert!(matches!(
            err,
            MergeError::JoinAmbiguity { join: "role record", matches: 0, .. }
        ));
    }

    #[test]
    fn character_without_role_reference_is_a_join_fault() {
        let table = role_table(json!({
            "Characters/TFT11_Ahri": { "mCharacterName": "TFT11_Ahri" },
            "Roles/APCaster": { "name": "APCaster" },
        }));
        let index = RoleIndex::build(&table);
        let err = resolve_role("TFT11_Ahri", &index).unwrap_err();
        assert!(matches!(
            err,
            MergeError::JoinAmbiguity { join: "character role", matches: 0, .. }
        ));
    }

    #[test]
    fn classify_damage_type_by_prefix() {
        assert_eq!(classify_damage_type("APBlaster").unwrap(), DamageType::MAGIC);
        assert_eq!(classify_damage_type("ADCarry").unwrap(), DamageType::PHYSICAL);
        let err = classify_damage_type("Support").unwrap_err();
        assert!(matches!(err, MergeError::UnrecognizedCategory { role } if role == "Support"));
    }

    #[test]
    fn damage_type_flags_are_exclusive() {
        for damage in [DamageType::MAGIC, DamageType::PHYSICAL] {
            assert_ne!(damage.is_ad, damage.is_ap);
        }
    }
}
