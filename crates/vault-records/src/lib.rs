//! Record types for the configuration, output, schema and input vaults.
//!
//! Every record is built from caller-supplied properties in one step:
//! the ID (and, where supported, the version marker) is derived from the
//! properties, the record is validated, and only then handed back. A
//! record that exists is a record that passed its validator.
//!
//! Persisted field tags are declared on the record types with serde
//! attributes. The `*Props` input types carry their own wire tags and may
//! diverge from the persisted ones.

pub mod config;
pub mod input;
pub mod output;
pub mod record;
pub mod schema;
pub mod validation;

pub use config::{Config, ConfigProps, JobDependency, StorageTarget};
pub use input::{Input, InputProps};
pub use output::{Output, OutputMetadata, OutputProps};
pub use record::Record;
pub use schema::{Schema, SchemaProps, SchemaType};
pub use validation::{FieldViolation, ValidationError, Validator};
