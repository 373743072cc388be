//! Source datasets as they arrive from CommunityDragon, already deserialized.

use std::collections::BTreeMap;

use serde_json::Value;

pub mod bin;
pub mod fetch;
pub mod loader;
pub mod registry;
pub mod roster;
pub mod set_data;
pub mod strings;

pub use bin::StatBlock;
pub use loader::{CdragonLoader, SourceData, SourceLoader};
pub use roster::{filter_roster, parse_roster, RosterEntry};
pub use set_data::{SetChampion, SetData, SetInfo};
pub use strings::StringTable;

/// `characters.bin.json`: record path -> record. Holds both character records and role records.
pub type RoleTable = BTreeMap<String, Value>;

/// One character's `.cdtb.bin.json`: entry path -> entry.
pub type CharacterBin = BTreeMap<String, Value>;
