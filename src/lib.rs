//! Merges TFT champion data from CommunityDragon datasets into one record per champion,
//! with ability tooltips rendered against computed spell values.

pub mod assets;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod parallel;
pub mod pipeline;
pub mod resolve;
pub mod spell;
pub mod tooltip;

pub use config::PipelineConfig;
pub use error::{MergeError, Result};
pub use pipeline::{build_merged_data, run_merge, MergedChampion};
