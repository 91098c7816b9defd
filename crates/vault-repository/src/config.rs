//! Configuration vault queries.

use vault_records::Config;
use vault_store::{Filter, RequestContext};

use crate::error::VaultResult;
use crate::repository::{job_filter, Repository};

pub type ConfigRepository = Repository<Config>;

impl Repository<Config> {
    pub async fn find_by_service_provider(
        &self,
        ctx: &RequestContext,
        service: &str,
        provider: &str,
    ) -> VaultResult<Vec<Config>> {
        let filter = Filter::eq("service", service).and_eq("provider", provider);
        self.find(ctx, &filter).await
    }

    pub async fn find_by_source_provider(
        &self,
        ctx: &RequestContext,
        source: &str,
        provider: &str,
    ) -> VaultResult<Vec<Config>> {
        let filter = Filter::eq("source", source).and_eq("provider", provider);
        self.find(ctx, &filter).await
    }

    /// The triple is the natural key, so at most one configuration matches.
    pub async fn find_by_service_source_provider(
        &self,
        ctx: &RequestContext,
        service: &str,
        source: &str,
        provider: &str,
    ) -> VaultResult<Option<Config>> {
        self.find_first(ctx, &job_filter(service, source, provider))
            .await
    }

    pub async fn find_by_service_source_provider_active(
        &self,
        ctx: &RequestContext,
        service: &str,
        source: &str,
        provider: &str,
        active: bool,
    ) -> VaultResult<Option<Config>> {
        let filter = job_filter(service, source, provider).and_eq("active", active);
        self.find_first(ctx, &filter).await
    }

    /// Configurations listing `(service, source)` anywhere in `dependsOn`.
    pub async fn find_dependents(
        &self,
        ctx: &RequestContext,
        service: &str,
        source: &str,
    ) -> VaultResult<Vec<Config>> {
        let filter = Filter::elem_match(
            "dependsOn",
            Filter::eq("service", service).and_eq("source", source),
        );
        self.find(ctx, &filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use vault_records::{ConfigProps, JobDependency, StorageTarget};
    use vault_store::InMemoryDocumentStore;
    use vault_types::Timestamp;

    use crate::clock::ManualClock;

    fn ctx() -> RequestContext {
        RequestContext::with_timeout(Duration::from_secs(5))
    }

    fn repo() -> ConfigRepository {
        let start = Timestamp::parse("2024-05-01 12:00:00").unwrap();
        Repository::new(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(ManualClock::new(start)),
        )
    }

    fn config(
        repo: &ConfigRepository,
        job: (&str, &str, &str),
        active: bool,
        deps: &[(&str, &str)],
    ) -> Config {
        Config::new(
            ConfigProps {
                service: job.0.into(),
                source: job.1.into(),
                provider: job.2.into(),
                active,
                depends_on: deps.iter().map(|(a, b)| JobDependency::new(*a, *b)).collect(),
                storage: StorageTarget::default(),
            },
            repo.now(),
        )
        .unwrap()
    }

    async fn seed(repo: &ConfigRepository) {
        for c in [
            config(repo, ("billing", "events", "acme"), true, &[("svcA", "srcA")]),
            config(
                repo,
                ("billing", "ledger", "acme"),
                false,
                &[("svcB", "srcB"), ("svcA", "srcA")],
            ),
            config(repo, ("payments", "events", "acme"), true, &[("svcB", "srcA")]),
            config(repo, ("billing", "events", "globex"), true, &[]),
        ] {
            repo.create(&ctx(), c).await.unwrap();
        }
    }

    #[tokio::test]
    async fn dependency_query_is_any_element() {
        let repo = repo();
        seed(&repo).await;

        let hits = repo.find_dependents(&ctx(), "svcA", "srcA").await.unwrap();
        let sources: Vec<_> = hits.iter().map(|c| c.source.as_str()).collect();
        assert_eq!(sources, vec!["events", "ledger"]);

        // (svcB, srcA) only matches an element holding both values.
        let hits = repo.find_dependents(&ctx(), "svcB", "srcA").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].service, "payments");

        let none = repo.find_dependents(&ctx(), "svcC", "srcC").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn composite_queries_are_conjunctions() {
        let repo = repo();
        seed(&repo).await;

        let by_service = repo
            .find_by_service_provider(&ctx(), "billing", "acme")
            .await
            .unwrap();
        assert_eq!(by_service.len(), 2);

        let by_source = repo
            .find_by_source_provider(&ctx(), "events", "acme")
            .await
            .unwrap();
        assert_eq!(by_source.len(), 2);
        assert!(by_source.iter().all(|c| c.provider == "acme"));

        let one = repo
            .find_by_service_source_provider(&ctx(), "billing", "events", "globex")
            .await
            .unwrap()
            .unwrap();
        assert!(one.depends_on.is_empty());

        assert!(repo
            .find_by_service_source_provider(&ctx(), "billing", "events", "initech")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn active_flag_narrows_the_triple() {
        let repo = repo();
        seed(&repo).await;

        let inactive = repo
            .find_by_service_source_provider_active(&ctx(), "billing", "ledger", "acme", false)
            .await
            .unwrap();
        assert!(inactive.is_some());
        let active = repo
            .find_by_service_source_provider_active(&ctx(), "billing", "ledger", "acme", true)
            .await
            .unwrap();
        assert!(active.is_none());
    }

    #[tokio::test]
    async fn billing_depends_on_auth() {
        let repo = repo();
        let config = config(
            &repo,
            ("billing", "events", "acme"),
            true,
            &[("auth", "events")],
        );
        assert!(!config.id.is_null());
        assert!(!config.version_id.is_null());
        assert_ne!(config.id, config.version_id);
        assert_eq!(config.created_at, config.updated_at);

        let created = repo.create(&ctx(), config).await.unwrap();
        let dependents = repo.find_dependents(&ctx(), "auth", "events").await.unwrap();
        assert_eq!(dependents, vec![created]);
    }

    #[tokio::test]
    async fn dependency_change_updates_version_under_same_id() {
        let repo = repo();
        let first = repo
            .create(
                &ctx(),
                config(&repo, ("billing", "events", "acme"), true, &[("auth", "events")]),
            )
            .await
            .unwrap();
        let second = repo
            .update(
                &ctx(),
                config(&repo, ("billing", "events", "acme"), true, &[("users", "cdc")]),
            )
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_ne!(first.version_id, second.version_id);

        assert!(repo
            .find_dependents(&ctx(), "auth", "events")
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            repo.find_dependents(&ctx(), "users", "cdc").await.unwrap(),
            vec![second]
        );
    }
}
