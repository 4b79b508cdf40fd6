//! CLI error types

use std::path::PathBuf;
use thiserror::Error;

use levy_core::TokenError;
use levy_liquidity::PoolError;
use levy_storage::StorageError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("No state in {0}; run `levy init` first")]
    NotInitialized(PathBuf),

    #[error("State already exists in {0}")]
    AlreadyInitialized(PathBuf),
}

pub type Result<T> = std::result::Result<T, CliError>;
