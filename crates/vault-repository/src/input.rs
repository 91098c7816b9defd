//! Input vault queries.

use vault_records::Input;
use vault_store::RequestContext;

use crate::error::VaultResult;
use crate::repository::{job_filter, Repository};

pub type InputRepository = Repository<Input>;

impl Repository<Input> {
    pub async fn find_by_service_source_provider(
        &self,
        ctx: &RequestContext,
        service: &str,
        source: &str,
        provider: &str,
    ) -> VaultResult<Vec<Input>> {
        self.find(ctx, &job_filter(service, source, provider)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use vault_records::InputProps;
    use vault_store::InMemoryDocumentStore;
    use vault_types::Timestamp;

    use crate::clock::ManualClock;

    #[tokio::test]
    async fn registered_objects_are_listed_per_job() {
        let start = Timestamp::parse("2024-05-01 12:00:00").unwrap();
        let repo: InputRepository = Repository::new(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(ManualClock::new(start)),
        );
        let ctx = RequestContext::with_timeout(Duration::from_secs(5));

        let registrations = [
            ("acme", "s3://raw/a"),
            ("acme", "s3://raw/b"),
            ("globex", "s3://raw/a"),
        ];
        for (provider, uri) in registrations {
            let input = Input::new(
                InputProps {
                    service: "billing".into(),
                    source: "events".into(),
                    provider: provider.into(),
                    object_uri: uri.into(),
                    format: "jsonl".into(),
                },
                repo.now(),
            )
            .unwrap();
            repo.create(&ctx, input).await.unwrap();
        }

        let acme = repo
            .find_by_service_source_provider(&ctx, "billing", "events", "acme")
            .await
            .unwrap();
        let uris: Vec<_> = acme.iter().map(|i| i.object_uri.as_str()).collect();
        assert_eq!(uris, vec!["s3://raw/a", "s3://raw/b"]);
    }
}
