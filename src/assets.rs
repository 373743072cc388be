//! Image downloads for the active roster: square icons, ability icons and splashes.
//!
//! Independent of the merge: it reads only roster entries and never touches merged output.
//! Downloads are throttled by a fixed pause after each request.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::data::fetch::Fetcher;
use crate::data::RosterEntry;
use crate::error::{MergeError, Result};

const GAME_ASSET_PREFIX: &str = "lol-game-data/assets/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Icon,
    AbilityIcon,
    Splash,
}

impl AssetKind {
    pub const ALL: [AssetKind; 3] = [AssetKind::Icon, AssetKind::AbilityIcon, AssetKind::Splash];

    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Icon => "champions",
            Self::AbilityIcon => "abilities",
            Self::Splash => "champion_splashes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Icon => "icon",
            Self::AbilityIcon => "ability icon",
            Self::Splash => "splash",
        }
    }
}

/// Ability icons that do not follow `hud/icons2d/{id}_ability.png`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityIconOverride {
    pub character_id: &'static str,
    pub file_name: &'static str,
    /// The icon sits directly under `hud/` instead of `hud/icons2d/`.
    pub outside_icons2d: bool,
}

pub const ABILITY_ICON_OVERRIDES: &[AbilityIconOverride] = &[
    AbilityIconOverride {
        character_id: "TFT11_FortuneYord",
        file_name: "tft11_fortuneyord_ability.tft_set11.png",
        outside_icons2d: false,
    },
    AbilityIconOverride {
        character_id: "TFT11_Azir",
        file_name: "tft11_azir_passive.tft_set11.png",
        outside_icons2d: false,
    },
    AbilityIconOverride {
        character_id: "TFT11_Nautilus",
        file_name: "tft11_nautilus_r.tft_set11.png",
        outside_icons2d: true,
    },
];

fn ability_icon_override(character_id: &str) -> Option<&'static AbilityIconOverride> {
    ABILITY_ICON_OVERRIDES
        .iter()
        .find(|entry| entry.character_id == character_id)
}

/// Map a game asset path (`/lol-game-data/assets/ASSETS/...x.tex`) to its CommunityDragon png url.
pub fn cdragon_asset_url(config: &PipelineConfig, asset_path: &str) -> String {
    let lower = asset_path.trim_start_matches('/').to_lowercase();
    let relative = lower.strip_prefix(GAME_ASSET_PREFIX).unwrap_or(&lower);
    let relative = match relative.rsplit_once('.') {
        Some((stem, "tex" | "dds")) => format!("{stem}.png"),
        _ => relative.to_string(),
    };
    config.cdragon_path(&format!("game/{relative}"))
}

pub fn ability_icon_url(config: &PipelineConfig, character_id: &str) -> String {
    let id = character_id.to_lowercase();
    let (dir, file_name) = match ability_icon_override(character_id) {
        Some(entry) if entry.outside_icons2d => ("hud".to_string(), entry.file_name.to_string()),
        Some(entry) => ("hud/icons2d".to_string(), entry.file_name.to_string()),
        None => ("hud/icons2d".to_string(), format!("{id}_ability.png")),
    };
    config.cdragon_path(&format!("game/assets/characters/{id}/{dir}/{file_name}"))
}

/// Source url of one asset, or None when the roster entry does not name that asset.
pub fn asset_url(config: &PipelineConfig, kind: AssetKind, entry: &RosterEntry) -> Option<String> {
    match kind {
        AssetKind::Icon => entry
            .square_icon_path
            .as_deref()
            .map(|path| cdragon_asset_url(config, path)),
        AssetKind::Splash => entry
            .square_splash_icon_path
            .as_deref()
            .map(|path| cdragon_asset_url(config, path)),
        AssetKind::AbilityIcon => Some(ability_icon_url(config, &entry.character_id)),
    }
}

/// `{dir}/{character_id}.{ext}`, with the extension taken from the url's file name.
fn asset_target(dir: &Path, character_id: &str, url: &str) -> PathBuf {
    let file_name = url.rsplit('/').next().unwrap_or(url);
    let ext = match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => "png",
    };
    dir.join(format!("{character_id}.{ext}"))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetReport {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Download every missing asset for `roster`. Per-asset failures are logged and counted.
pub fn download_assets<F: Fetcher + ?Sized>(
    config: &PipelineConfig,
    fetcher: &F,
    roster: &[RosterEntry],
) -> Result<AssetReport> {
    let delay = Duration::from_millis(config.asset_delay_ms);
    let mut report = AssetReport::default();

    for kind in AssetKind::ALL {
        let dir = config.asset_dir.join(kind.dir_name());
        fs::create_dir_all(&dir)?;

        for entry in roster {
            let Some(url) = asset_url(config, kind, entry) else {
                warn!(character_id = %entry.character_id, kind = kind.label(), "no asset path");
                report.failed += 1;
                continue;
            };
            let target = asset_target(&dir, &entry.character_id, &url);
            if target.exists() {
                report.skipped += 1;
                continue;
            }

            info!(%url, "downloading {}", kind.label());
            let saved = fetcher
                .fetch(&url)
                .and_then(|bytes| fs::write(&target, bytes).map_err(MergeError::from));
            match saved {
                Ok(()) => report.downloaded += 1,
                Err(err) => {
                    warn!(%url, target = %target.display(), error = %err, "download failed");
                    report.failed += 1;
                }
            }
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }
    }

    Ok(report)
}
