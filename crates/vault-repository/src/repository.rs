use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, info};
use vault_document::{from_document, to_document};
use vault_records::{Record, ValidationError};
use vault_store::{DocumentStore, Filter, RequestContext};
use vault_types::{RecordId, Timestamp};

use crate::clock::Clock;
use crate::error::{VaultError, VaultResult};

/// Persistence for one record type over a shared [`DocumentStore`].
///
/// Every operation takes the caller's [`RequestContext`]; each store round
/// trip is bounded by its deadline. Records are validated before any write,
/// so an invalid record never reaches storage.
pub struct Repository<R> {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    collection: String,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Repository<R> {
    /// A repository over the record type's default collection.
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_collection(store, clock, R::COLLECTION)
    }

    pub fn with_collection(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            clock,
            collection: collection.into(),
            _record: PhantomData,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The repository clock's current time, for constructing records.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Persist a new record.
    ///
    /// Fails with [`VaultError::AlreadyExists`] if a record with the same
    /// derived ID is stored, whether the early lookup sees it or the
    /// store's unique index rejects the insert.
    pub async fn create(&self, ctx: &RequestContext, record: R) -> VaultResult<R> {
        record.validate()?;
        let id = record.id().to_hex();
        let filter = Filter::by_id(id.as_str());

        debug!(collection = %self.collection, id = %id, "checking for existing record");
        let existing = ctx
            .bound(self.store.find_one(&self.collection, &filter))
            .await?;
        if existing.is_some() {
            return Err(self.already_exists(id));
        }

        let document = to_document(&record)?;
        debug!(collection = %self.collection, id = %id, "inserting record");
        ctx.bound(self.store.insert_one(&self.collection, document))
            .await?;

        info!(
            collection = %self.collection,
            id = %record.id().short_hex(),
            "record created"
        );
        Ok(record)
    }

    pub async fn find_by_id(&self, ctx: &RequestContext, id: &RecordId) -> VaultResult<R> {
        let id = id.to_hex();
        match self.find_first(ctx, &Filter::by_id(id.as_str())).await? {
            Some(record) => Ok(record),
            None => Err(self.not_found(id)),
        }
    }

    pub async fn find_all(&self, ctx: &RequestContext) -> VaultResult<Vec<R>> {
        self.find(ctx, &Filter::all()).await
    }

    /// Every record matching `filter`, in store order. No match is an
    /// empty vector.
    pub async fn find(&self, ctx: &RequestContext, filter: &Filter) -> VaultResult<Vec<R>> {
        let documents = ctx
            .bound(self.store.find(&self.collection, filter))
            .await?;
        debug!(
            collection = %self.collection,
            matched = documents.len(),
            "query returned"
        );
        documents
            .into_iter()
            .map(|doc| from_document(doc).map_err(VaultError::from))
            .collect()
    }

    /// The first record matching `filter`, if any.
    pub async fn find_first(
        &self,
        ctx: &RequestContext,
        filter: &Filter,
    ) -> VaultResult<Option<R>> {
        debug!(collection = %self.collection, id = ?filter.id(), "fetching one record");
        let document = ctx
            .bound(self.store.find_one(&self.collection, filter))
            .await?;
        Ok(document.map(from_document::<R>).transpose()?)
    }

    /// Replace a stored record.
    ///
    /// `created_at` is carried forward from the stored copy. `updated_at`
    /// becomes the clock's now, or one second past the stored value when
    /// the clock has not moved that far, so it strictly increases.
    pub async fn update(&self, ctx: &RequestContext, mut record: R) -> VaultResult<R> {
        record.validate()?;
        let id = record.id().to_hex();
        let filter = Filter::by_id(id.as_str());

        let stored: R = match self.find_first(ctx, &filter).await? {
            Some(stored) => stored,
            None => return Err(self.not_found(id)),
        };
        let next = stored.updated_at().checked_plus_seconds(1).ok_or_else(|| {
            ValidationError::field(R::KIND, "updatedAt", "stored value cannot advance")
        })?;
        let updated_at = self.clock.now().max(next);
        record.set_timestamps(stored.created_at(), updated_at);

        let document = to_document(&record)?;
        debug!(collection = %self.collection, id = %id, "replacing record");
        let replaced = ctx
            .bound(self.store.update_one(&self.collection, &filter, document))
            .await?;
        if !replaced {
            // Deleted between the read and the write.
            return Err(self.not_found(id));
        }

        info!(
            collection = %self.collection,
            id = %record.id().short_hex(),
            updated_at = %updated_at,
            "record updated"
        );
        Ok(record)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: &RecordId) -> VaultResult<()> {
        let id = id.to_hex();
        debug!(collection = %self.collection, id = %id, "deleting record");
        let deleted = ctx
            .bound(self.store.delete_one(&self.collection, &Filter::by_id(id.as_str())))
            .await?;
        if !deleted {
            return Err(self.not_found(id));
        }
        info!(collection = %self.collection, id = %id, "record deleted");
        Ok(())
    }

    fn already_exists(&self, id: String) -> VaultError {
        VaultError::AlreadyExists {
            collection: self.collection.clone(),
            id,
        }
    }

    fn not_found(&self, id: String) -> VaultError {
        VaultError::NotFound {
            collection: self.collection.clone(),
            id,
        }
    }
}

/// Conjunction over the `(service, source, provider)` job triple shared by
/// every vault record.
pub(crate) fn job_filter(service: &str, source: &str, provider: &str) -> Filter {
    Filter::eq("service", service)
        .and_eq("source", source)
        .and_eq("provider", provider)
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            collection: self.collection.clone(),
            _record: PhantomData,
        }
    }
}

impl<R> fmt::Debug for Repository<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}
