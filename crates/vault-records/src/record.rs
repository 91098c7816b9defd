use serde::de::DeserializeOwned;
use serde::Serialize;
use vault_crypto::Identity;
use vault_types::{RecordId, Timestamp};

use crate::validation::ValidationError;

/// A persisted vault record.
///
/// Implementors derive `Serialize`/`Deserialize` with their persisted
/// field tags; the document mapper needs nothing else. The primary ID must
/// be serialized under `_id`.
pub trait Record: Identity + Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Default collection name for this record type.
    const COLLECTION: &'static str;

    fn id(&self) -> RecordId;

    fn created_at(&self) -> Timestamp;

    fn updated_at(&self) -> Timestamp;

    /// Overwrite both timestamps. Used by repositories only: `created_at`
    /// is carried forward from the stored copy on update.
    fn set_timestamps(&mut self, created_at: Timestamp, updated_at: Timestamp);

    /// Check every invariant of the record.
    fn validate(&self) -> Result<(), ValidationError>;
}
