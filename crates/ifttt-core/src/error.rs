//! Error types for the channel core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for trigger polls.
pub type TriggerResult<T> = Result<T, TriggerError>;

/// Errors a trigger can raise while answering a poll.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// The poll body lacks a field the trigger needs, or the value is unusable.
    #[error("missing required trigger field: {0}")]
    MissingField(String),

    #[error("upstream fetch failed: {0}")]
    Fetch(String),

    #[error("upstream response could not be parsed: {0}")]
    Parse(String),
}

/// Errors detected while assembling the trigger registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("triggers {first} and {second} both resolve to slug '{slug}'")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("triggers {first} and {second} both use trigger name '{name}'")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    #[error("trigger {trigger} has an unusable slug '{slug}'")]
    InvalidSlug { trigger: String, slug: String },
}

/// Errors raised while loading channel configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
