use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use vault_document::{Document, Value, ID_FIELD};

use crate::error::{StoreError, StoreResult};
use crate::filter::Filter;
use crate::traits::DocumentStore;

/// In-memory, HashMap-based document store.
///
/// Intended for tests and embedding. Each collection is a `Vec` kept in
/// insertion order behind a `RwLock`; documents are cloned on read and
/// write. Inserts enforce a unique `_id` index, so racing duplicate
/// creations cannot both succeed.
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    available: AtomicBool,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Number of documents in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// Returns `true` if no collection holds any document.
    pub fn is_empty(&self) -> bool {
        self.collections
            .read()
            .map(|c| c.values().all(Vec::is_empty))
            .unwrap_or(true)
    }

    /// Sorted names of collections that have been written to.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .collections
            .read()
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Remove every document from every collection.
    pub fn clear(&self) {
        if let Ok(mut c) = self.collections.write() {
            c.clear();
        }
    }

    /// Simulate the backend going away (or coming back). While
    /// unavailable, every call fails with [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store is offline".into()))
        }
    }

    fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
        StoreError::Unavailable(format!("lock poisoned: {e}"))
    }
}

fn document_id(collection: &str, document: &Document) -> StoreResult<String> {
    match document.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        _ => Err(StoreError::MissingId {
            collection: collection.to_string(),
        }),
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        self.check_available()?;
        let map = self.collections.read().map_err(Self::poisoned)?;
        Ok(map
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)))
            .cloned())
    }

    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<String> {
        self.check_available()?;
        let id = document_id(collection, &document)?;
        let mut map = self.collections.write().map_err(Self::poisoned)?;
        let docs = map.entry(collection.to_string()).or_default();
        let duplicate = docs
            .iter()
            .any(|d| d.get(ID_FIELD).and_then(Value::as_str) == Some(id.as_str()));
        if duplicate {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                id,
            });
        }
        docs.push(document);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        document: Document,
    ) -> StoreResult<bool> {
        self.check_available()?;
        let new_id = document_id(collection, &document)?;
        let mut map = self.collections.write().map_err(Self::poisoned)?;
        let Some(docs) = map.get_mut(collection) else {
            return Ok(false);
        };
        let Some(pos) = docs.iter().position(|d| filter.matches(d)) else {
            return Ok(false);
        };
        let clash = docs.iter().enumerate().any(|(i, d)| {
            i != pos && d.get(ID_FIELD).and_then(Value::as_str) == Some(new_id.as_str())
        });
        if clash {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                id: new_id,
            });
        }
        docs[pos] = document;
        Ok(true)
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<bool> {
        self.check_available()?;
        let mut map = self.collections.write().map_err(Self::poisoned)?;
        let Some(docs) = map.get_mut(collection) else {
            return Ok(false);
        };
        match docs.iter().position(|d| filter.matches(d)) {
            Some(pos) => {
                docs.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        self.check_available()?;
        let map = self.collections.read().map_err(Self::poisoned)?;
        Ok(map
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("collections", &self.collection_names())
            .field("available", &self.available.load(Ordering::SeqCst))
            .finish()
    }
}
