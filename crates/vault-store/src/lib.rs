//! Document store contract for the vault services.
//!
//! The vaults persist records as [`Document`](vault_document::Document)s in
//! a schema-less store. This crate names the narrow contract they consume
//! and ships one backend:
//!
//! - [`DocumentStore`]: `find_one`, `insert_one`, `update_one`,
//!   `delete_one`, `find` over named collections
//! - [`Filter`]: equality conjunctions plus one "array contains an element
//!   matching a sub-filter" operator
//! - [`InMemoryDocumentStore`]: `HashMap`-backed store for tests and
//!   embedding, enforcing a unique `_id` index per collection
//! - [`RequestContext`]: request-scoped deadline bounding every round trip
//!
//! # Design Rules
//!
//! 1. The unique `_id` index is the true enforcement point for idempotent
//!    creation; callers' existence checks are an early exit only.
//! 2. Store failures are returned to the caller, never retried here.
//! 3. Connection lifecycle belongs to the backend, not to its callers.

pub mod context;
pub mod error;
pub mod filter;
pub mod memory;
pub mod traits;

pub use context::RequestContext;
pub use error::{StoreError, StoreResult};
pub use filter::Filter;
pub use memory::InMemoryDocumentStore;
pub use traits::DocumentStore;
