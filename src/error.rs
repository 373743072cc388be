//! Error taxonomy for a merge run. Every variant aborts the run; nothing is retried.

use thiserror::Error;

/// Failure of a merge run.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A cross-dataset lookup found zero or several matches where exactly one is required.
    #[error("{join} lookup for '{key}' matched {matches} record(s), expected exactly 1")]
    JoinAmbiguity {
        join: &'static str,
        key: String,
        matches: usize,
    },

    /// A role name whose prefix maps to no damage category.
    #[error("unrecognized role category '{role}'")]
    UnrecognizedCategory { role: String },

    /// A tooltip placeholder could not be resolved against the computed variables.
    #[error("tooltip for '{character_id}' cannot resolve '@{token}@': {reason}")]
    TemplateResolution {
        character_id: String,
        token: String,
        reason: String,
    },

    /// A spell formula is unknown, malformed or references something that does not exist.
    #[error("malformed spell formula for '{spell}': {reason}")]
    MalformedFormula { spell: String, reason: String },

    /// A source record that is present but does not have the expected shape.
    #[error("malformed record '{key}': {reason}")]
    MalformedRecord { key: String, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to fetch '{url}': {reason}")]
    Fetch { url: String, reason: String },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl MergeError {
    pub(crate) fn join(join: &'static str, key: impl Into<String>, matches: usize) -> Self {
        Self::JoinAmbiguity {
            join,
            key: key.into(),
            matches,
        }
    }

    pub(crate) fn formula(spell: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedFormula {
            spell: spell.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MergeError>;

/// Return the single element of `matches`, or a [MergeError::JoinAmbiguity] carrying the count.
pub fn exactly_one<T>(join: &'static str, key: &str, mut matches: Vec<T>) -> Result<T> {
    if matches.len() != 1 {
        return Err(MergeError::join(join, key, matches.len()));
    }
    matches
        .pop()
        .ok_or_else(|| MergeError::join(join, key, 0))
}
