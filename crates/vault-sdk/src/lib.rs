//! High-level SDK for the vault services.
//!
//! Bundles the configuration, output, schema and input vaults over one
//! injected [`DocumentStore`](vault_store::DocumentStore), plus the
//! ambient pieces a binary needs: [`VaultConfig`] loaded from TOML and
//! [`telemetry::init`] for `tracing` output.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod vaults;

pub use config::{CollectionNames, VaultConfig};
pub use error::{ConfigError, SdkError, SdkResult};
pub use vaults::Vaults;

// Re-export key types
pub use vault_records::{
    Config, ConfigProps, Input, InputProps, JobDependency, Output, OutputMetadata, OutputProps,
    Record, Schema, SchemaProps, SchemaType, StorageTarget, ValidationError,
};
pub use vault_repository::{
    Clock, ConfigRepository, InputRepository, ManualClock, OutputRepository, Repository,
    SchemaRepository, SystemClock, VaultError, VaultResult,
};
pub use vault_store::{DocumentStore, Filter, InMemoryDocumentStore, RequestContext};
pub use vault_types::{RecordId, Timestamp};
