//! # Configuration Management
//!
//! This module loads the bot configuration from `surf-config.toml` and resolves the
//! Discord token. The configuration is built once at startup and then shared
//! read-only with every command handler.
//!
//! The token is deliberately not part of the TOML file: it comes from the
//! `--token` flag or the `DISCORD_TOKEN` environment variable (a `.env` file is
//! honoured, see `main`).

use crate::rating::RatingSlot;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "surf-config.toml";

/// Environment variable holding the Discord bot token
pub const TOKEN_ENV_VAR: &str = "DISCORD_TOKEN";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no Discord token: pass --token or set DISCORD_TOKEN")]
    MissingToken,

    #[error("config serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("config IO: {0}")]
    Io(#[from] std::io::Error),
}

/// Application configuration loaded from surf-config.toml
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Surf forecast API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Chat command settings
    #[serde(default)]
    pub bot: BotConfig,
    /// Emoji code per rating slot
    #[serde(default)]
    pub emoji: EmojiConfig,
}

/// Surf forecast API configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL, without the key segment
    pub base_url: String,
    /// API key, inserted as the first path segment
    pub api_key: String,
    /// Unit system for forecasts: "uk", "us" or "eu"
    pub units: String,
    /// Whole-request timeout handed to the HTTP client
    pub request_timeout_secs: u64,
}

/// Chat command configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BotConfig {
    /// Trigger prefix, e.g. "!surf porthcawl"
    pub command_prefix: String,
}

/// Emoji code for each rating slot.
///
/// Values are sent verbatim, so custom server emoji can be used
/// (`<:solid_faded:123456789>`).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EmojiConfig {
    pub solid_solid: String,
    pub solid_faded: String,
    pub solid_blank: String,
    pub faded_faded: String,
    pub faded_blank: String,
    pub blank_blank: String,
    pub solid: String,
    pub faded: String,
    pub blank: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "https://magicseaweed.com/api".to_string(),
            api_key: "mdkey".to_string(),
            units: "uk".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            command_prefix: "!surf".to_string(),
        }
    }
}

impl Default for EmojiConfig {
    fn default() -> Self {
        EmojiConfig {
            solid_solid: "★★".to_string(),
            solid_faded: "★☆".to_string(),
            solid_blank: "★·".to_string(),
            faded_faded: "☆☆".to_string(),
            faded_blank: "☆·".to_string(),
            blank_blank: "··".to_string(),
            solid: "★".to_string(),
            faded: "☆".to_string(),
            blank: "·".to_string(),
        }
    }
}

impl EmojiConfig {
    /// Emoji code for one rating slot
    pub fn code(&self, slot: RatingSlot) -> &str {
        match slot {
            RatingSlot::SolidSolid => &self.solid_solid,
            RatingSlot::SolidFaded => &self.solid_faded,
            RatingSlot::SolidBlank => &self.solid_blank,
            RatingSlot::FadedFaded => &self.faded_faded,
            RatingSlot::FadedBlank => &self.faded_blank,
            RatingSlot::BlankBlank => &self.blank_blank,
            RatingSlot::Solid => &self.solid,
            RatingSlot::Faded => &self.faded,
            RatingSlot::Blank => &self.blank,
        }
    }
}

impl Config {
    /// Load configuration from surf-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "invalid config file format: {}", e);
                    tracing::warn!("using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!(
                    path = %path.display(),
                    "no config file found, using default configuration"
                );
                Self::default()
            }
        }
    }

    /// Write this configuration to `path` as TOML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        tracing::info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}

/// Pick the Discord token: the CLI value wins, then the environment.
///
/// Blank values count as missing.
pub fn resolve_token(cli_token: Option<&str>) -> Result<String, ConfigError> {
    let env_token = std::env::var(TOKEN_ENV_VAR).ok();
    pick_token(cli_token, env_token.as_deref())
}

fn pick_token(cli_token: Option<&str>, env_token: Option<&str>) -> Result<String, ConfigError> {
    cli_token
        .into_iter()
        .chain(env_token)
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://magicseaweed.com/api");
        assert_eq!(config.api.units, "uk");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.bot.command_prefix, "!surf");
        assert_eq!(config.emoji.code(RatingSlot::SolidFaded), "★☆");
    }

    #[test]
    fn test_config_roundtrip_through_file() {
        let mut config = Config::default();
        config.bot.command_prefix = "!waves".to_string();
        config.emoji.solid_solid = "<:ss:1234>".to_string();

        let file = NamedTempFile::new().unwrap();
        config.save(file.path()).unwrap();
        let parsed = Config::load_from_path(file.path());

        assert_eq!(parsed.bot.command_prefix, "!waves");
        assert_eq!(parsed.emoji.code(RatingSlot::SolidSolid), "<:ss:1234>");
        assert_eq!(parsed.api.api_key, config.api.api_key);
    }

    #[test]
    fn test_partial_file_keeps_section_defaults() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "[bot]\ncommand_prefix = \"?surf\"\n").unwrap();

        let config = Config::load_from_path(file.path());
        assert_eq!(config.bot.command_prefix, "?surf");
        assert_eq!(config.api.units, "uk");
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "this is = = not toml").unwrap();

        let config = Config::load_from_path(file.path());
        assert_eq!(config.bot.command_prefix, "!surf");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        assert_eq!(config.api.api_key, "mdkey");
    }

    #[test]
    fn test_token_precedence() {
        assert_eq!(pick_token(Some("cli"), Some("env")).unwrap(), "cli");
        assert_eq!(pick_token(None, Some("env")).unwrap(), "env");
        assert_eq!(pick_token(Some("  "), Some("env")).unwrap(), "env");
        assert!(matches!(
            pick_token(None, Some("")),
            Err(ConfigError::MissingToken)
        ));
        assert!(matches!(pick_token(None, None), Err(ConfigError::MissingToken)));
    }
}
