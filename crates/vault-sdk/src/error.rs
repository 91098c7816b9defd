use std::path::PathBuf;

use thiserror::Error;
use vault_repository::VaultError;

/// Failure loading or checking a [`VaultConfig`](crate::VaultConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse vault config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render vault config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("invalid vault config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("telemetry init failed: {0}")]
    Telemetry(String),
}

impl SdkError {
    /// HTTP status a handler layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Vault(err) => err.status_code(),
            Self::Config(_) | Self::Telemetry(_) => 500,
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
