use vault_types::RecordId;

use crate::canonical::CanonicalValue;

/// Domain-separated BLAKE3 hasher over canonical renderings.
///
/// Each hasher carries a domain tag that is prepended to every hash
/// computation, so a record's ID and its version marker never share a
/// hash space even when their projections render identically.
pub struct CanonicalHasher {
    domain: &'static str,
}

impl CanonicalHasher {
    /// Hasher for primary IDs (natural-key projections).
    pub const ID: Self = Self {
        domain: "vault-id-v1",
    };
    /// Hasher for version markers (full semantic projections).
    pub const VERSION: Self = Self {
        domain: "vault-version-v1",
    };

    /// Hash a canonical value under an additional tag (the record kind).
    pub fn hash_value(&self, tag: &str, value: &CanonicalValue) -> RecordId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(tag.as_bytes());
        hasher.update(b":");
        hasher.update(value.canonicalize().as_bytes());
        RecordId::from_hash(*hasher.finalize().as_bytes())
    }
}
