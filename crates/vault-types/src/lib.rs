//! Foundation types for the vault services.
//!
//! Every other vault crate depends on `vault-types`.
//!
//! # Key Types
//!
//! - [`RecordId`]: Content-derived identifier (BLAKE3 hash, hex on the wire)
//! - [`Timestamp`]: Second-resolution timestamp persisted as `YYYY-MM-DD HH:MM:SS`

pub mod error;
pub mod id;
pub mod temporal;

pub use error::TypeError;
pub use id::RecordId;
pub use temporal::{Timestamp, TIMESTAMP_FORMAT};
