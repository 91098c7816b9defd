//! Output vault queries.

use vault_records::Output;
use vault_store::{Filter, RequestContext};
use vault_types::RecordId;

use crate::error::VaultResult;
use crate::repository::{job_filter, Repository};

pub type OutputRepository = Repository<Output>;

impl Repository<Output> {
    pub async fn find_by_service_source_provider(
        &self,
        ctx: &RequestContext,
        service: &str,
        source: &str,
        provider: &str,
    ) -> VaultResult<Vec<Output>> {
        self.find(ctx, &job_filter(service, source, provider)).await
    }

    /// Outputs produced under one configuration version.
    pub async fn find_by_config_version(
        &self,
        ctx: &RequestContext,
        config_version_id: &RecordId,
    ) -> VaultResult<Vec<Output>> {
        let filter = Filter::eq("configVersionId", config_version_id.to_hex());
        self.find(ctx, &filter).await
    }

    /// The output registered for one input of a job, if any.
    pub async fn find_by_input(
        &self,
        ctx: &RequestContext,
        service: &str,
        source: &str,
        provider: &str,
        input_id: &RecordId,
    ) -> VaultResult<Option<Output>> {
        let filter =
            job_filter(service, source, provider).and_eq("metadata.inputId", input_id.to_hex());
        self.find_first(ctx, &filter).await
    }
}
