use std::sync::Arc;

use tracing::info;
use vault_records::{
    Config, ConfigProps, Input, InputProps, Output, OutputProps, Schema, SchemaProps,
};
use vault_repository::{
    Clock, ConfigRepository, InputRepository, OutputRepository, Repository, SchemaRepository,
    SystemClock, VaultError,
};
use vault_store::{DocumentStore, InMemoryDocumentStore, RequestContext};

use crate::config::VaultConfig;
use crate::error::SdkResult;

/// The configuration, output, schema and input vaults over one store.
///
/// The store and clock are injected; nothing here is process-global.
/// Repositories are public for direct queries, while the `register_*`
/// and `revise_*` methods cover the build-then-persist flow.
pub struct Vaults {
    pub configs: ConfigRepository,
    pub outputs: OutputRepository,
    pub schemas: SchemaRepository,
    pub inputs: InputRepository,
    config: VaultConfig,
}

impl Vaults {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        config: VaultConfig,
    ) -> Self {
        let names = &config.collections;
        let vaults = Self {
            configs: Repository::with_collection(store.clone(), clock.clone(), &names.configs),
            outputs: Repository::with_collection(store.clone(), clock.clone(), &names.outputs),
            schemas: Repository::with_collection(store.clone(), clock.clone(), &names.schemas),
            inputs: Repository::with_collection(store, clock, &names.inputs),
            config,
        };
        info!(timeout_ms = vaults.config.request_timeout_ms, "vaults ready");
        vaults
    }

    /// Vaults over a fresh in-memory store and the system clock.
    pub fn in_memory(config: VaultConfig) -> Self {
        Self::new(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(SystemClock),
            config,
        )
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// A request context carrying the configured deadline.
    pub fn context(&self) -> RequestContext {
        self.config.request_context()
    }

    // ---- Configuration vault ----

    pub async fn register_config(
        &self,
        ctx: &RequestContext,
        props: ConfigProps,
    ) -> SdkResult<Config> {
        let config = Config::new(props, self.configs.now()).map_err(VaultError::from)?;
        Ok(self.configs.create(ctx, config).await?)
    }

    /// Replace a stored configuration; its ID must already exist.
    pub async fn revise_config(
        &self,
        ctx: &RequestContext,
        props: ConfigProps,
    ) -> SdkResult<Config> {
        let config = Config::new(props, self.configs.now()).map_err(VaultError::from)?;
        Ok(self.configs.update(ctx, config).await?)
    }

    // ---- Output vault ----

    pub async fn register_output(
        &self,
        ctx: &RequestContext,
        props: OutputProps,
    ) -> SdkResult<Output> {
        let output = Output::new(props, self.outputs.now()).map_err(VaultError::from)?;
        Ok(self.outputs.create(ctx, output).await?)
    }

    // ---- Schema vault ----

    pub async fn register_schema(
        &self,
        ctx: &RequestContext,
        props: SchemaProps,
    ) -> SdkResult<Schema> {
        let schema = Schema::new(props, self.schemas.now()).map_err(VaultError::from)?;
        Ok(self.schemas.create(ctx, schema).await?)
    }

    pub async fn revise_schema(
        &self,
        ctx: &RequestContext,
        props: SchemaProps,
    ) -> SdkResult<Schema> {
        let schema = Schema::new(props, self.schemas.now()).map_err(VaultError::from)?;
        Ok(self.schemas.update(ctx, schema).await?)
    }

    // ---- Input vault ----

    pub async fn register_input(
        &self,
        ctx: &RequestContext,
        props: InputProps,
    ) -> SdkResult<Input> {
        let input = Input::new(props, self.inputs.now()).map_err(VaultError::from)?;
        Ok(self.inputs.create(ctx, input).await?)
    }
}
