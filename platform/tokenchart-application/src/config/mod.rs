use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tokenchart_domain::errors::ExtractError;
use tokenchart_domain::services::token_registry::{TokenRegistry, DEFAULT_TOKENS};
use tokenchart_domain::value_objects::api_config::ApiConfig;

pub const DEFAULT_SQLITE_PATH: &str = "crypto_database.db";
pub const DEFAULT_TABLE: &str = "crypto_data";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default = "default_tokens")]
    pub tokens: Vec<TokenConfig>,
    #[serde(default)]
    pub sink: SinkConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TokenConfig {
    pub coin: String,
    pub id: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct SinkConfig {
    pub enabled: bool,
    pub sqlite_path: String,
    pub table: String,
    pub csv_path: Option<String>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sqlite_path: DEFAULT_SQLITE_PATH.to_string(),
            table: DEFAULT_TABLE.to_string(),
            csv_path: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            auth: AuthConfig::default(),
            tokens: default_tokens(),
            sink: SinkConfig::default(),
        }
    }
}

fn default_tokens() -> Vec<TokenConfig> {
    DEFAULT_TOKENS
        .iter()
        .map(|(coin, id)| TokenConfig {
            coin: coin.to_string(),
            id: id.to_string(),
        })
        .collect()
}

impl Config {
    pub fn registry(&self) -> Result<TokenRegistry, ExtractError> {
        TokenRegistry::from_pairs(
            self.tokens
                .iter()
                .map(|token| (token.coin.clone(), token.id.clone())),
        )
    }

    /// Checks everything that must hold before the first network call.
    pub fn validate(&self) -> Result<(), ExtractError> {
        self.api.validate()?;
        self.registry()?;
        if self.sink.enabled && self.sink.sqlite_path.trim().is_empty() {
            return Err(ExtractError::configuration(
                "sink.sqlite_path must not be empty",
            ));
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let (config, _source) = load_config_with_source(path)?;
    Ok(config)
}

pub fn load_config_with_source(path: &Path) -> Result<(Config, String), String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config = toml::from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))?;
    Ok((config, contents))
}

/// Serializes the effective config without the API key.
pub fn to_toml_redacted(config: &Config) -> Result<String, String> {
    let mut redacted = config.clone();
    if redacted.auth.api_key.is_some() {
        redacted.auth.api_key = Some("<redacted>".to_string());
    }
    toml::to_string_pretty(&redacted)
        .map_err(|err| format!("failed to serialize config as TOML: {err}"))
}
