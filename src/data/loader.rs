//! Source loading: fetch (or reuse cached) CommunityDragon datasets and hand them over parsed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::config::PipelineConfig;
use crate::data::fetch::{fetch_json_cached, CacheStatus, Fetcher};
use crate::data::registry::{cached_entry, load_registry, registry_entry, save_registry, Registry};
use crate::data::roster::{filter_roster, parse_roster, RosterEntry};
use crate::data::set_data::SetData;
use crate::data::strings::StringTable;
use crate::data::{CharacterBin, RoleTable};
use crate::error::Result;

const ROSTER_PATH: &str = "plugins/rcp-be-lol-game-data/global/default/v1/tftchampions-teamplanner.json";
const ROLES_PATH: &str = "game/data/tftteamplanner/characters.bin.json";
const SET_DATA_PATH: &str = "cdragon/tft/en_us.json";
const STRINGS_PATH: &str = "game/en_us/data/menu/en_us/main.stringtable.json";
const CHARACTER_BIN_DIR: &str = "character_bins";

/// Every dataset a merge run reads. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct SourceData {
    /// Full roster, unfiltered.
    pub roster: Vec<RosterEntry>,
    pub strings: StringTable,
    pub roles: RoleTable,
    /// character_id -> bin, for the active-version roster only.
    pub bins: BTreeMap<String, CharacterBin>,
    pub set_data: SetData,
}

pub trait SourceLoader {
    fn load_sources(&self) -> Result<SourceData>;

    /// Just the roster, for work that needs no other dataset (asset downloads).
    fn load_roster(&self) -> Result<Vec<RosterEntry>> {
        Ok(self.load_sources()?.roster)
    }
}

/// Loads from CommunityDragon through a [Fetcher], caching under `config.data_dir`.
pub struct CdragonLoader<'a, F: Fetcher + ?Sized> {
    config: &'a PipelineConfig,
    fetcher: &'a F,
}

impl<'a, F: Fetcher + ?Sized> CdragonLoader<'a, F> {
    pub fn new(config: &'a PipelineConfig, fetcher: &'a F) -> Self {
        Self { config, fetcher }
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        registry: &mut Registry,
        name: &str,
        relative_url: &str,
        path: PathBuf,
    ) -> Result<T> {
        let url = self.config.cdragon_path(relative_url);
        let (parsed, status) =
            fetch_json_cached(self.fetcher, &url, &path, self.config.use_cache)?;
        match status {
            CacheStatus::Fetched => {
                registry.insert(
                    name.to_string(),
                    registry_entry(&url, &self.config.content_version, &path),
                );
            }
            // A cache hit keeps the recorded fetch time. Files cached by hand have none.
            CacheStatus::Hit => {
                registry
                    .entry(name.to_string())
                    .or_insert_with(|| cached_entry(&url, &self.config.content_version, &path));
            }
        }
        Ok(parsed)
    }

    fn fetch_roster(&self, registry: &mut Registry) -> Result<Vec<RosterEntry>> {
        let raw: Value = self.fetch(registry, "roster", ROSTER_PATH, self.cache_path(ROSTER_PATH))?;
        Ok(parse_roster(raw)?)
    }

    fn cache_path(&self, relative_url: &str) -> PathBuf {
        let file_name = Path::new(relative_url)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(relative_url));
        self.config.data_dir.join(file_name)
    }
}

/// File name of a character's bin, e.g. `tft11_ahri.cdtb.bin.json`.
pub fn character_bin_file_name(character_id: &str) -> String {
    format!("{}.cdtb.bin.json", character_id.to_lowercase())
}

impl<F: Fetcher + ?Sized> SourceLoader for CdragonLoader<'_, F> {
    fn load_sources(&self) -> Result<SourceData> {
        let mut registry = load_registry(&self.config.data_dir);

        let roster = self.fetch_roster(&mut registry)?;
        let strings: StringTable =
            self.fetch(&mut registry, "strings", STRINGS_PATH, self.cache_path(STRINGS_PATH))?;
        let roles: RoleTable =
            self.fetch(&mut registry, "roles", ROLES_PATH, self.cache_path(ROLES_PATH))?;
        let set_data: SetData =
            self.fetch(&mut registry, "set_data", SET_DATA_PATH, self.cache_path(SET_DATA_PATH))?;

        let active = filter_roster(&roster, &self.config.content_version);
        let bin_dir = self.config.data_dir.join(CHARACTER_BIN_DIR);
        let mut bins = BTreeMap::new();
        for entry in &active {
            let file_name = character_bin_file_name(&entry.character_id);
            let bin: CharacterBin = self.fetch(
                &mut registry,
                &format!("bin/{}", entry.character_id),
                &format!("game/characters/{file_name}"),
                bin_dir.join(&file_name),
            )?;
            bins.insert(entry.character_id.clone(), bin);
        }

        save_registry(&self.config.data_dir, &registry)?;
        info!(
            roster = roster.len(),
            active = active.len(),
            version = %self.config.content_version,
            "sources loaded"
        );

        Ok(SourceData {
            roster,
            strings,
            roles,
            bins,
            set_data,
        })
    }

    fn load_roster(&self) -> Result<Vec<RosterEntry>> {
        let mut registry = load_registry(&self.config.data_dir);
        let roster = self.fetch_roster(&mut registry)?;
        save_registry(&self.config.data_dir, &registry)?;
        Ok(roster)
    }
}
