//! Localized string table (`main.stringtable.json`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{MergeError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StringTable {
    pub entries: HashMap<String, String>,
}

/// String-table key of a character's extended ability tooltip.
pub fn tooltip_key(character_id: &str) -> String {
    format!(
        "generatedtip_spelltft_{}spell_tooltipextended",
        character_id.to_lowercase()
    )
}

impl StringTable {
    /// The extended tooltip template for `character_id`. A missing key is a zero-match join.
    pub fn tooltip_template(&self, character_id: &str) -> Result<&str> {
        let key = tooltip_key(character_id);
        self.entries
            .get(&key)
            .map(String::as_str)
            .ok_or_else(|| MergeError::join("tooltip template", key, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tooltip_key_lowercases_id() {
        assert_eq!(
            tooltip_key("TFT11_Ahri"),
            "generatedtip_spelltft_tft11_ahrispell_tooltipextended"
        );
    }

    #[test]
    fn missing_template_is_join_fault() {
        let table = StringTable::default();
        let err = table.tooltip_template("TFT11_Ahri").unwrap_err();
        assert!(matches!(
            err,
            MergeError::JoinAmbiguity { join: "tooltip template", matches: 0, .. }
        ));
    }
}
