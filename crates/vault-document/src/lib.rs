//! Generic record-to-document mapping for the vault services.
//!
//! A [`Document`] is the schema-less, ordered key-value projection of a
//! typed record: the storage and transfer format every vault shares. The
//! mapper is a serde data format, so any record type that derives
//! `Serialize`/`Deserialize` converts without hand-written field glue.
//! Field tags (`#[serde(rename = "...")]`) are the document keys.
//!
//! - [`to_document`] walks a record's fields in declaration order,
//!   recursing into nested records and sequences of records.
//! - [`from_document`] is the inverse; an absent tag surfaces as
//!   [`MapperError::MissingField`], an unconvertible value as
//!   [`MapperError::TypeMismatch`]. Nothing is silently defaulted.
//!
//! Values arriving as raw JSON (fresh off the wire) are normalized into
//! [`Value`] with [`Document::from_json`] before the mapper sees them, so
//! the mapper only ever handles one in-memory shape.

pub mod de;
pub mod error;
pub mod ser;
pub mod value;

pub use de::from_document;
pub use error::{MapperError, MapperResult};
pub use ser::{to_document, to_value};
pub use value::{Document, Value};

/// Reserved document key under which every record's primary ID is stored.
pub const ID_FIELD: &str = "_id";
