//! Canonical hashing and content-derived identity for vault records.
//!
//! - [`CanonicalValue`]: semantic value model (scalar, ordered sequence,
//!   unordered key-value container) with a stable string rendering
//! - [`CanonicalHasher`]: domain-separated BLAKE3 over canonical renderings
//! - [`Identity`]: how a record projects its natural key and its full
//!   semantic payload; [`derive_id`] and [`derive_version`] hash them
//!
//! Both derivations are total: malformed inputs are rejected upstream when
//! a record is constructed, never here.

pub mod canonical;
pub mod hasher;
pub mod identity;

pub use canonical::{Canonical, CanonicalValue};
pub use hasher::CanonicalHasher;
pub use identity::{derive_id, derive_version, Identity};
