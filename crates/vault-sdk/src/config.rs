use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vault_store::RequestContext;

use crate::error::ConfigError;

/// Runtime settings for an embedded set of vaults, loaded from TOML.
///
/// ```toml
/// request_timeout_ms = 2500
/// log_level = "debug"
///
/// [collections]
/// configs = "job_configs"
/// ```
///
/// Every key is optional; missing keys take the [`Default`] values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VaultConfig {
    /// Deadline for one request, across all of its store round trips.
    pub request_timeout_ms: u64,
    /// Default `tracing` filter directive.
    pub log_level: String,
    pub collections: CollectionNames,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5_000,
            log_level: "info".into(),
            collections: CollectionNames::default(),
        }
    }
}

/// Store collection backing each vault.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionNames {
    pub configs: String,
    pub outputs: String,
    pub schemas: String,
    pub inputs: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            configs: "configs".into(),
            outputs: "outputs".into(),
            schemas: "schemas".into(),
            inputs: "inputs".into(),
        }
    }
}

impl VaultConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.check()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// A fresh request context whose deadline is one timeout from now.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::with_timeout(self.request_timeout())
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be greater than zero".into(),
            ));
        }
        let c = &self.collections;
        let names = [
            ("configs", &c.configs),
            ("outputs", &c.outputs),
            ("schemas", &c.schemas),
            ("inputs", &c.inputs),
        ];
        for (i, (vault, name)) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "collection for {vault} must not be empty"
                )));
            }
            if names[..i].iter().any(|(_, other)| other == name) {
                return Err(ConfigError::Invalid(format!(
                    "collection {name} is used by more than one vault"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let c = VaultConfig::default();
        assert_eq!(c.request_timeout(), Duration::from_secs(5));
        assert_eq!(c.log_level, "info");
        assert_eq!(c.collections.configs, "configs");
        assert_eq!(c.collections.inputs, "inputs");
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(VaultConfig::from_toml_str("").unwrap(), VaultConfig::default());
    }

    #[test]
    fn partial_override() {
        let c = VaultConfig::from_toml_str(
            r#"
            request_timeout_ms = 250

            [collections]
            configs = "job_configs"
            "#,
        )
        .unwrap();
        assert_eq!(c.request_timeout(), Duration::from_millis(250));
        assert_eq!(c.log_level, "info");
        assert_eq!(c.collections.configs, "job_configs");
        assert_eq!(c.collections.outputs, "outputs");
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = VaultConfig::from_toml_str("request_timeout_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_shared_collection() {
        let err = VaultConfig::from_toml_str(
            r#"
            [collections]
            outputs = "records"
            inputs = "records"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("records"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = VaultConfig::from_toml_str("request_timeout = 10").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();
        let c = VaultConfig::load(file.path()).unwrap();
        assert_eq!(c.log_level, "debug");
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.toml");
        let err = VaultConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("vault.toml"));
    }

    #[test]
    fn renders_back_to_toml() {
        let mut c = VaultConfig::default();
        c.collections.schemas = "json_schemas".into();
        let text = c.to_toml_string().unwrap();
        assert_eq!(VaultConfig::from_toml_str(&text).unwrap(), c);
    }
}
