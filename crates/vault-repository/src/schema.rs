//! Schema vault queries.

use vault_records::{Schema, SchemaType};
use vault_store::RequestContext;

use crate::error::VaultResult;
use crate::repository::{job_filter, Repository};

pub type SchemaRepository = Repository<Schema>;

impl Repository<Schema> {
    /// Input and output schemas of one job.
    pub async fn find_by_service_source_provider(
        &self,
        ctx: &RequestContext,
        service: &str,
        source: &str,
        provider: &str,
    ) -> VaultResult<Vec<Schema>> {
        self.find(ctx, &job_filter(service, source, provider)).await
    }

    pub async fn find_by_schema_type(
        &self,
        ctx: &RequestContext,
        service: &str,
        source: &str,
        provider: &str,
        schema_type: SchemaType,
    ) -> VaultResult<Option<Schema>> {
        let filter =
            job_filter(service, source, provider).and_eq("schemaType", schema_type.as_str());
        self.find_first(ctx, &filter).await
    }
}
