use vault_types::RecordId;

use crate::canonical::CanonicalValue;
use crate::hasher::CanonicalHasher;

/// How a record type projects itself for identity derivation.
///
/// `natural_key` is the business identity: two values with equal natural
/// keys always derive the same ID. `semantic_payload` is everything that
/// makes a version distinct: natural keys, flags, nested records and
/// ordered dependency lists. Neither projection may include timestamps or
/// the derived IDs themselves.
pub trait Identity {
    /// Record kind, mixed into every hash so vaults never share an ID space.
    const KIND: &'static str;

    fn natural_key(&self) -> CanonicalValue;

    /// Defaults to the natural key for records without a version marker.
    fn semantic_payload(&self) -> CanonicalValue {
        self.natural_key()
    }

    fn derived_id(&self) -> RecordId {
        derive_id(Self::KIND, &self.natural_key())
    }

    fn derived_version(&self) -> RecordId {
        derive_version(Self::KIND, &self.semantic_payload())
    }
}

/// Hash a natural-key projection into a primary ID.
pub fn derive_id(kind: &str, natural_key: &CanonicalValue) -> RecordId {
    CanonicalHasher::ID.hash_value(kind, natural_key)
}

/// Hash a full semantic projection into a version marker.
pub fn derive_version(kind: &str, payload: &CanonicalValue) -> RecordId {
    CanonicalHasher::VERSION.hash_value(kind, payload)
}
