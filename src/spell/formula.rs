//! Serde model of a bin `mSpell` object. Part and calculation kinds are selected by `__type`;
//! an unknown `__type` fails deserialization.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{MergeError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct SpellDefinition {
    #[serde(rename = "mDataValues", default)]
    pub data_values: Vec<DataValue>,
    /// Named calculations, ordered by name.
    #[serde(rename = "mSpellCalculations", default)]
    pub calculations: BTreeMap<String, Calculation>,
}

impl SpellDefinition {
    /// Parse the `mSpell` object of an ability bin entry.
    pub fn from_ability_entry(spell_key: &str, entry: &Value) -> Result<Self> {
        let spell = entry
            .get("mSpell")
            .ok_or_else(|| MergeError::formula(spell_key, "ability entry has no 'mSpell'"))?;
        serde_json::from_value(spell.clone())
            .map_err(|err| MergeError::formula(spell_key, err.to_string()))
    }
}

/// Per-rank constant. Index 0 is unused; indices 1..=3 are star levels.
#[derive(Debug, Clone, Deserialize)]
pub struct DataValue {
    #[serde(rename = "mName")]
    pub name: String,
    #[serde(rename = "mValues", default)]
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__type")]
pub enum Calculation {
    /// Sum of parts, times an optional multiplier.
    GameCalculation {
        #[serde(rename = "mFormulaParts", default)]
        parts: Vec<FormulaPart>,
        #[serde(rename = "mMultiplier", default)]
        multiplier: Option<Box<FormulaPart>>,
        #[serde(rename = "mDisplayAsPercent", default)]
        display_as_percent: bool,
        #[serde(rename = "mPrecision", default)]
        precision: Option<u32>,
    },
    /// Another calculation of the same spell, times a multiplier.
    GameCalculationModified {
        #[serde(rename = "mModifiedGameCalculation")]
        base: String,
        #[serde(rename = "mMultiplier", default)]
        multiplier: Option<Box<FormulaPart>>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__type")]
pub enum FormulaPart {
    NumberCalculationPart {
        #[serde(rename = "mNumber", default)]
        number: f64,
    },
    NamedDataValueCalculationPart {
        #[serde(rename = "mDataValue")]
        data_value: String,
    },
    StatByCoefficientCalculationPart {
        #[serde(rename = "mStat", default)]
        stat: u8,
        #[serde(rename = "mStatFormula", default)]
        formula: u8,
        #[serde(rename = "mCoefficient", default)]
        coefficient: f64,
    },
    StatByNamedDataValueCalculationPart {
        #[serde(rename = "mStat", default)]
        stat: u8,
        #[serde(rename = "mStatFormula", default)]
        formula: u8,
        #[serde(rename = "mDataValue")]
        data_value: String,
    },
    StatBySubPartCalculationPart {
        #[serde(rename = "mStat", default)]
        stat: u8,
        #[serde(rename = "mStatFormula", default)]
        formula: u8,
        #[serde(rename = "mSubpart")]
        subpart: Box<FormulaPart>,
    },
    SumOfSubPartsCalculationPart {
        #[serde(rename = "mSubparts", default)]
        subparts: Vec<FormulaPart>,
    },
    ProductOfSubPartsCalculationPart {
        #[serde(rename = "mPart1")]
        part1: Box<FormulaPart>,
        #[serde(rename = "mPart2")]
        part2: Box<FormulaPart>,
    },
    ClampSubPartsCalculationPart {
        #[serde(rename = "mFloor", default)]
        floor: Option<f64>,
        #[serde(rename = "mCeiling", default)]
        ceiling: Option<f64>,
        #[serde(rename = "mSubparts", default)]
        subparts: Vec<FormulaPart>,
    },
}

/// Stat referenced by `mStat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    AbilityPower,
    Armor,
    AttackDamage,
    AttackSpeed,
    MagicResist,
    MoveSpeed,
    CritChance,
    CritDamage,
    MaxHealth,
    CurrentHealth,
}

impl StatKind {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::AbilityPower),
            1 => Some(Self::Armor),
            2 => Some(Self::AttackDamage),
            3 => Some(Self::AttackSpeed),
            5 => Some(Self::MagicResist),
            6 => Some(Self::MoveSpeed),
            7 => Some(Self::CritChance),
            8 => Some(Self::CritDamage),
            11 => Some(Self::MaxHealth),
            12 => Some(Self::CurrentHealth),
            _ => None,
        }
    }
}

/// Which portion of a stat `mStatFormula` selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatFormula {
    Base,
    Bonus,
    Total,
}

impl StatFormula {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Base),
            1 => Some(Self::Bonus),
            2 => Some(Self::Total),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_nested_parts_and_calculations() {
        let spell = SpellDefinition::from_ability_entry(
            "TFT11_AhriSpell",
            &json!({ "mSpell": {
                "mDataValues": [{ "mName": "Damage", "mValues": [0, 200, 300, 450] }],
                "mSpellCalculations": {
                    "TotalDamage": {
                        "__type": "GameCalculation",
                        "mFormulaParts": [{
                            "__type": "ProductOfSubPartsCalculationPart",
                            "mPart1": { "__type": "NamedDataValueCalculationPart", "mDataValue": "Damage" },
                            "mPart2": { "__type": "NumberCalculationPart", "mNumber": 2 },
                        }],
                    },
                    "HalfDamage": {
                        "__type": "GameCalculationModified",
                        "mModifiedGameCalculation": "TotalDamage",
                        "mMultiplier": { "__type": "NumberCalculationPart", "mNumber": 0.5 },
                    },
                },
            }}),
        )
        .unwrap();
        assert_eq!(spell.data_values[0].values.len(), 4);
        assert!(matches!(
            spell.calculations["TotalDamage"],
            Calculation::GameCalculation { ref parts, .. } if parts.len() == 1
        ));
        assert!(matches!(
            spell.calculations["HalfDamage"],
            Calculation::GameCalculationModified { ref base, .. } if base == "TotalDamage"
        ));
    }

    #[test]
    fn unknown_part_type_is_malformed() {
        let err = SpellDefinition::from_ability_entry(
            "TFT11_AhriSpell",
            &json!({ "mSpell": { "mSpellCalculations": { "X": {
                "__type": "GameCalculation",
                "mFormulaParts": [{ "__type": "{f3cbe7b2}" }],
            }}}}),
        )
        .unwrap_err();
        assert!(matches!(err, MergeError::MalformedFormula { spell, .. } if spell == "TFT11_AhriSpell"));
    }

    #[test]
    fn missing_spell_object_is_malformed() {
        let err = SpellDefinition::from_ability_entry("TFT11_AhriSpell", &json!({})).unwrap_err();
        assert!(err.to_string().contains("mSpell"));
    }

    #[test]
    fn stat_codes_map_to_known_kinds() {
        assert_eq!(StatKind::from_code(2), Some(StatKind::AttackDamage));
        assert_eq!(StatKind::from_code(4), None);
        assert_eq!(StatFormula::from_code(1), Some(StatFormula::Bonus));
        assert_eq!(StatFormula::from_code(9), None);
    }
}
