//! End-to-end merge over in-memory sources.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use teamplanner::config::PipelineConfig;
use teamplanner::data::{parse_roster, SetData, SourceData, StringTable};
use teamplanner::pipeline::{build_merged_data, serialize_output};
use teamplanner::MergeError;

fn bin_for(id: &str, damage_values: Value) -> Value {
    json!({
        format!("Characters/{id}/CharacterRecords/Root"): {
            "baseHP": 700, "baseDamage": 50, "baseArmor": 30, "attackSpeed": 0.7
        },
        format!("Characters/{id}/Spells/{id}Spell"): {
            "mSpell": {
                "mDataValues": [{ "mName": "Damage", "mValues": damage_values }],
                "mSpellCalculations": {
                    "ModifiedDamage": {
                        "__type": "GameCalculation",
                        "mFormulaParts": [
                            { "__type": "NamedDataValueCalculationPart", "mDataValue": "Damage" }
                        ]
                    }
                }
            }
        }
    })
}

fn fixture(ahri_role: &str) -> SourceData {
    let roster = parse_roster(json!([
        { "character_id": "TFT11_Ahri", "tier": 2, "display_name": "Ahri",
          "traits": [{ "name": "Arcanist" }] },
        { "character_id": "TFT10_Ahri", "tier": 2, "display_name": "Ahri" },
        { "character_id": "TFT11_Zed", "tier": 4, "display_name": "Zed" },
    ]))
    .unwrap();

    let roles: BTreeMap<String, Value> = serde_json::from_value(json!({
        "Characters/TFT11_Ahri": { "mCharacterName": "TFT11_Ahri", "CharacterRole": "Roles/Ahri" },
        "Characters/TFT11_Zed": { "mCharacterName": "TFT11_Zed", "CharacterRole": "Roles/Zed" },
        "Roles/Ahri": { "name": ahri_role },
        "Roles/Zed": { "name": "ADAssassin" },
    }))
    .unwrap();

    let mut bins = BTreeMap::new();
    for (id, values) in [
        ("TFT11_Ahri", json!([0, 200, 300, 450])),
        ("TFT11_Zed", json!([0, 90, 90, 90])),
    ] {
        bins.insert(id.to_string(), serde_json::from_value(bin_for(id, values)).unwrap());
    }

    let strings: StringTable = serde_json::from_value(json!({ "entries": {
        "generatedtip_spelltft_tft11_ahrispell_tooltipextended":
            "Deal <magicDamage>@ModifiedDamage@</magicDamage> magic damage.",
        "generatedtip_spelltft_tft11_zedspell_tooltipextended":
            "Strike for @Damage@ physical damage.",
    }}))
    .unwrap();

    let set_data: SetData = serde_json::from_value(json!({ "sets": {
        "10": { "champions": [{ "apiName": "TFT10_Ahri", "stats": { "hp": 1 } }] },
        "11": { "name": "Inkborn Fables", "champions": [
            { "apiName": "TFT11_Ahri", "stats": { "hp": 700, "armor": 30 } },
            { "apiName": "TFT11_Zed", "stats": { "hp": 900, "armor": 45 } },
        ]},
    }}))
    .unwrap();

    SourceData {
        roster,
        strings,
        roles,
        bins,
        set_data,
    }
}

fn config(workers: usize) -> PipelineConfig {
    PipelineConfig {
        workers,
        ..PipelineConfig::default()
    }
}

#[test]
fn merge_emits_one_record_per_active_entry_in_roster_order() {
    let merged = build_merged_data(&fixture("APCaster"), &config(1)).expect("merge should succeed");

    let ids: Vec<_> = merged.iter().map(|c| c.character_id.as_str()).collect();
    assert_eq!(ids, vec!["TFT11_Ahri", "TFT11_Zed"]);

    let ahri = &merged[0];
    assert_eq!(ahri.tier, 2);
    assert_eq!(ahri.traits, vec![json!({ "name": "Arcanist" })]);
    assert_eq!(
        ahri.spell_html,
        "Deal <magicDamage>200/300/450</magicDamage> magic damage."
    );
    assert_eq!(ahri.stats, json!({ "hp": 700, "armor": 30 }));
    assert!(ahri.damage_type.is_ap && !ahri.damage_type.is_ad);

    let zed = &merged[1];
    assert_eq!(zed.spell_html, "Strike for 90 physical damage.");
    assert!(zed.damage_type.is_ad && !zed.damage_type.is_ap);
}

#[test]
fn serialized_output_is_deterministic() {
    let sources = fixture("APCaster");
    let first = serialize_output(&build_merged_data(&sources, &config(1)).unwrap()).unwrap();
    let second = serialize_output(&build_merged_data(&sources, &config(1)).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn parallel_merge_matches_sequential() {
    let sources = fixture("APCaster");
    let sequential = build_merged_data(&sources, &config(1)).unwrap();
    let parallel = build_merged_data(&sources, &config(4)).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn unrecognized_role_aborts_the_whole_run() {
    let err = build_merged_data(&fixture("Support"), &config(1)).unwrap_err();
    assert!(matches!(err, MergeError::UnrecognizedCategory { ref role } if role == "Support"));
}

#[test]
fn missing_tooltip_template_is_a_join_fault() {
    let mut sources = fixture("APCaster");
    sources.strings.entries.clear();
    let err = build_merged_data(&sources, &config(1)).unwrap_err();
    assert!(matches!(
        err,
        MergeError::JoinAmbiguity { join: "tooltip template", matches: 0, .. }
    ));
}

#[test]
fn duplicate_set_champion_is_ambiguous() {
    let mut sources = fixture("APCaster");
    let set = sources.set_data.sets.get_mut("11").unwrap();
    let duplicate = set.champions[1].clone();
    set.champions.push(duplicate);
    let err = build_merged_data(&sources, &config(1)).unwrap_err();
    assert!(matches!(
        err,
        MergeError::JoinAmbiguity { join: "set champion", matches: 2, .. }
    ));
}

#[test]
fn padded_content_version_is_rejected_before_merging() {
    let config = PipelineConfig {
        content_version: " 11".to_string(),
        ..config(1)
    };
    let err = build_merged_data(&fixture("APCaster"), &config).unwrap_err();
    assert!(matches!(err, MergeError::Config(_)));
}
