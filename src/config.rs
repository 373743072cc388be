//! Run configuration: defaults, optional YAML file, and environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MergeError, Result};

pub const DEFAULT_CDRAGON_URL: &str = "https://raw.communitydragon.org/latest";
pub const DEFAULT_CONTENT_VERSION: &str = "11";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_OUTPUT_PATH: &str = "assets/tft/merged_teamplanner_data.json";
pub const DEFAULT_ASSET_DIR: &str = "assets/tft";

/// Everything a run needs that used to be a global toggle. Passed explicitly at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Reuse cached source files instead of fetching when they exist.
    pub use_cache: bool,
    /// Active set number, e.g. "11". Selects the set sub-table and the roster prefix `TFT11_`.
    pub content_version: String,
    pub cdragon_url: String,
    /// Cache directory for fetched source datasets.
    pub data_dir: PathBuf,
    pub output_path: PathBuf,
    pub asset_dir: PathBuf,
    /// Pause after each asset download, in milliseconds.
    pub asset_delay_ms: u64,
    /// 1 = sequential, 0 = all cores, n = n worker threads.
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            use_cache: false,
            content_version: DEFAULT_CONTENT_VERSION.to_string(),
            cdragon_url: DEFAULT_CDRAGON_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            asset_delay_ms: 1000,
            workers: 1,
        }
    }
}

impl PipelineConfig {
    /// Load a YAML config file; missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let mut config: PipelineConfig = serde_yaml::from_str(&raw)?;
        config.content_version = config.content_version.trim().to_string();
        config.validate()?;
        Ok(config)
    }

    /// Apply `TEAMPLANNER_*` environment overrides on top of this config.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(version) = std::env::var("TEAMPLANNER_CONTENT_VERSION") {
            self.content_version = version.trim().to_string();
        }
        if let Ok(raw) = std::env::var("TEAMPLANNER_USE_CACHE") {
            self.use_cache = parse_flag(&raw).ok_or_else(|| {
                MergeError::Config(format!("TEAMPLANNER_USE_CACHE: invalid flag '{raw}'"))
            })?;
        }
        if let Ok(dir) = std::env::var("TEAMPLANNER_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(path) = std::env::var("TEAMPLANNER_OUTPUT") {
            self.output_path = PathBuf::from(path);
        }
        self.validate()?;
        Ok(self)
    }

    /// The version is used verbatim as the set key and roster tag, so it must already be trimmed.
    pub fn validate(&self) -> Result<()> {
        let version = self.content_version.as_str();
        if version.is_empty() || !version.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(MergeError::Config(format!(
                "content_version must be a non-empty alphanumeric set id, got '{}'",
                self.content_version
            )));
        }
        Ok(())
    }

    /// Roster id tag for the active set, e.g. `TFT11_`.
    pub fn version_prefix(&self) -> String {
        version_prefix(&self.content_version)
    }

    /// Join a relative path onto the CommunityDragon base url.
    pub fn cdragon_path(&self, relative: &str) -> String {
        format!(
            "{}/{}",
            self.cdragon_url.trim_end_matches('/'),
            relative.trim_start_matches('/')
        )
    }
}

pub fn version_prefix(content_version: &str) -> String {
    format!("TFT{content_version}_")
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
