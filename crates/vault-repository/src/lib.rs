//! Repository layer for the vault services.
//!
//! [`Repository<R>`] composes identity derivation, validation and the
//! document mapper over a shared [`DocumentStore`] for any
//! [`Record`](vault_records::Record) type:
//!
//! - `create` rejects a second record with the same derived ID
//!   ([`VaultError::AlreadyExists`]); the store's unique `_id` index backs
//!   the early lookup under concurrency
//! - `update` carries `created_at` forward from the stored copy and moves
//!   `updated_at` strictly forward
//! - `find` with no match is an empty vector, never an error
//!
//! Each vault adds its own queries as inherent methods on its alias
//! ([`ConfigRepository`], [`OutputRepository`], [`SchemaRepository`],
//! [`InputRepository`]). Every call takes a [`RequestContext`] whose
//! deadline bounds each store round trip.

pub mod clock;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod repository;
pub mod schema;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ConfigRepository;
pub use error::{VaultError, VaultResult};
pub use input::InputRepository;
pub use output::OutputRepository;
pub use repository::Repository;
pub use schema::SchemaRepository;

pub use vault_store::{DocumentStore, Filter, InMemoryDocumentStore, RequestContext};
