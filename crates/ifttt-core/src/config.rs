//! Channel configuration: a default TOML file layered under an optional override.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Deserialize)]
pub struct ChannelConfig {
    /// Shared secret IFTTT sends in the `IFTTT-Channel-Key` header.
    #[serde(rename = "CHANNEL_KEY", default)]
    pub channel_key: Option<String>,

    /// Disables channel-key checks. Only ever set explicitly.
    #[serde(rename = "DEBUG", default)]
    pub debug: bool,

    #[serde(rename = "BIND", default = "default_bind")]
    pub bind: String,

    /// User agent for outbound MediaWiki requests.
    #[serde(rename = "USER_AGENT", default)]
    pub user_agent: Option<String>,

    #[serde(rename = "FETCH_TIMEOUT_SECS", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            channel_key: None,
            debug: false,
            bind: default_bind(),
            user_agent: None,
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

// Keeps the secret out of logs.
impl fmt::Debug for ChannelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelConfig")
            .field("channel_key", &self.channel_key.as_ref().map(|_| "<redacted>"))
            .field("debug", &self.debug)
            .field("bind", &self.bind)
            .field("user_agent", &self.user_agent)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .finish()
    }
}

impl ChannelConfig {
    /// Load `default_path`, then let keys from `override_path` replace it.
    ///
    /// Missing files are skipped; unreadable or malformed ones are errors.
    pub fn load(default_path: &Path, override_path: &Path) -> Result<Self, ConfigError> {
        let mut table = read_table(default_path)?.unwrap_or_default();
        if let Some(overrides) = read_table(override_path)? {
            table.extend(overrides);
        }
        Self::from_table(table)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table =
            toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Self::from_table(table)
    }

    fn from_table(table: toml::Table) -> Result<Self, ConfigError> {
        let config: ChannelConfig = toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Outside debug mode a channel key is mandatory; an absent key would
    /// otherwise match an absent header.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.debug && self.channel_key().is_empty() {
            return Err(ConfigError::Invalid(
                "CHANNEL_KEY must be set unless DEBUG is enabled".to_string(),
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "FETCH_TIMEOUT_SECS must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn channel_key(&self) -> &str {
        self.channel_key.as_deref().unwrap_or_default()
    }
}

fn read_table(path: &Path) -> Result<Option<toml::Table>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let table = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(table))
}
