//! Process-wide `tracing` setup for binaries embedding the vaults.

use tracing_subscriber::EnvFilter;

use crate::error::{SdkError, SdkResult};

/// Environment variable that overrides the configured log level.
pub const LOG_ENV: &str = "VAULT_LOG";

/// Build the event filter: `VAULT_LOG` when set, else `default_level`.
pub fn filter(default_level: &str) -> SdkResult<EnvFilter> {
    let parsed = match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(default_level),
    };
    parsed.map_err(|e| SdkError::Telemetry(e.to_string()))
}

/// Install a formatting subscriber. Fails if one is already installed.
pub fn init(default_level: &str) -> SdkResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(default_level)?)
        .with_target(false)
        .try_init()
        .map_err(|e| SdkError::Telemetry(e.to_string()))
}
