//! Entity resolution: joins a roster entry against the role table, its character bin and
//! the set stats. Every join must match exactly one record.

mod role;
mod selection;

pub use role::{classify_damage_type, resolve_role, CharacterRole, DamageType, RoleIndex};
pub use selection::{select_stat_and_spell, SelectedRecords, SetStatsIndex};
