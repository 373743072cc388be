//! Typed view of a character bin's `/Root` record.

use serde::{Deserialize, Serialize};

/// Base numeric attributes of a character before any ability modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    #[serde(rename = "baseHP")]
    pub base_hp: f64,
    #[serde(rename = "baseDamage")]
    pub base_damage: f64,
    #[serde(rename = "baseArmor", default)]
    pub base_armor: f64,
    #[serde(rename = "baseSpellBlock", default)]
    pub base_spell_block: f64,
    #[serde(rename = "attackSpeed", default)]
    pub attack_speed: f64,
    #[serde(rename = "attackRange", default)]
    pub attack_range: f64,
    #[serde(rename = "baseMoveSpeed", default)]
    pub base_move_speed: f64,
    #[serde(rename = "baseCritChance", default)]
    pub base_crit_chance: f64,
    #[serde(rename = "critDamageMultiplier", default = "default_crit_multiplier")]
    pub crit_damage_multiplier: f64,
    #[serde(rename = "mInitialMana", default)]
    pub initial_mana: f64,
    #[serde(rename = "primaryAbilityResource", default)]
    pub ability_resource: AbilityResource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbilityResource {
    /// Mana needed to cast.
    #[serde(rename = "arBase", default)]
    pub base: f64,
}

fn default_crit_multiplier() -> f64 {
    1.4
}
