//! `levy.toml` configuration
//!
//! ```toml
//! [token]
//! name = "Levy Token"
//! owner = "0x0101010101010101010101010101010101010101"
//!
//! [pool]
//! reward_rate = 12
//!
//! [storage]
//! data_dir = "$HOME/.levy"
//! ```
//!
//! Every section and field is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use levy_liquidity::PoolConfig;
use levy_token::TokenConfig;

use crate::error::ConfigError;

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "levy.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub token: TokenConfig,
    pub pool: PoolConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "levy-data".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(expand_path(&self.data_dir))
    }
}

impl CliConfig {
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load `path` (or `levy.toml`), falling back to defaults when the file
    /// does not exist. A file that exists but does not parse is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        if !path.exists() {
            log::warn!(
                "⚠️  Config file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let config = Self::load(path)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("[token] {}", e)))?;
        self.pool
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("[pool] {}", e)))?;
        Ok(())
    }
}

fn expand_path(path: &str) -> String {
    path.replace("$HOME", &std::env::var("HOME").unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use levy_core::Address;
    use levy_token::BurnMode;

    #[test]
    fn test_empty_config_is_default() {
        let config = CliConfig::from_toml("").unwrap();
        assert_eq!(config.token, TokenConfig::default());
        assert_eq!(config.pool, PoolConfig::default());
        assert_eq!(config.storage.data_dir, "levy-data");
    }

    #[test]
    fn test_partial_sections() {
        let config = CliConfig::from_toml(
            r#"
            [token]
            symbol = "SHIB"
            transaction_cooldown = 60
            burn_mode = { sink = "0x000000000000000000000000000000000000dead" }

            [pool]
            reward_rate = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.token.symbol, "SHIB");
        assert_eq!(config.token.name, TokenConfig::default().name);
        assert_eq!(config.token.transaction_cooldown, 60);
        assert_eq!(config.token.burn_mode, BurnMode::Sink(Address::DEAD));
        assert_eq!(config.pool.reward_rate, 20);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = CliConfig::from_toml("[pool]\nadd_liquidity_fee = 900\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = CliConfig::from_toml("[token]\nowner = \"not-an-address\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load_or_default(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.token, TokenConfig::default());
    }

    #[test]
    fn test_expand_home() {
        std::env::set_var("HOME", "/home/levy");
        assert_eq!(expand_path("$HOME/.levy"), "/home/levy/.levy");
    }
}
