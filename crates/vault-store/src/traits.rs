use async_trait::async_trait;
use vault_document::Document;

use crate::error::StoreResult;
use crate::filter::Filter;

/// Schema-less document store consumed by every vault repository.
///
/// All implementations must satisfy these invariants:
/// - Each collection has a unique index on `_id`: `insert_one` of a
///   document whose `_id` already exists fails with
///   [`StoreError::DuplicateKey`](crate::StoreError::DuplicateKey).
/// - `find` with no matches returns an empty vector, never an error.
/// - Results preserve insertion order within a collection.
/// - All backend failures are propagated, never silently ignored.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return the first document matching `filter`, if any.
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Insert a document and return its `_id`.
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<String>;

    /// Replace the first document matching `filter`.
    ///
    /// Returns `Ok(false)` if nothing matched.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        document: Document,
    ) -> StoreResult<bool>;

    /// Delete the first document matching `filter`.
    ///
    /// Returns `Ok(false)` if nothing matched.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<bool>;

    /// Return every document matching `filter`.
    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>>;
}
