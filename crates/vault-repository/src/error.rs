use vault_document::MapperError;
use vault_records::ValidationError;
use vault_store::StoreError;

/// Errors surfaced by every vault repository.
///
/// Nothing here is logged and dropped: each variant goes back to the
/// caller, who decides how to present it.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("record {id} already exists in {collection}")]
    AlreadyExists { collection: String, id: String },

    #[error("record {id} not found in {collection}")]
    NotFound { collection: String, id: String },

    /// A stored document could not be turned back into a record, or a
    /// record could not be projected into a document.
    #[error("document mapping failed: {0}")]
    Mapping(#[from] MapperError),

    #[error("document store unavailable: {0}")]
    StoreUnavailable(StoreError),
}

impl VaultError {
    /// HTTP status a handler layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound { .. } => 404,
            Self::AlreadyExists { .. } => 409,
            Self::Mapping(_) | Self::StoreUnavailable(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

impl From<StoreError> for VaultError {
    fn from(err: StoreError) -> Self {
        match err {
            // The unique index caught a create that raced past the early check.
            StoreError::DuplicateKey { collection, id } => Self::AlreadyExists { collection, id },
            other => Self::StoreUnavailable(other),
        }
    }
}

/// Result alias for repository operations.
pub type VaultResult<T> = Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use vault_records::FieldViolation;

    #[test]
    fn status_codes() {
        let validation = VaultError::Validation(ValidationError {
            kind: "config",
            violations: vec![FieldViolation {
                field: "service".into(),
                reason: "is required".into(),
            }],
        });
        assert_eq!(validation.status_code(), 400);
        let missing = VaultError::NotFound {
            collection: "configs".into(),
            id: "ab".into(),
        };
        assert_eq!(missing.status_code(), 404);
        assert!(missing.is_not_found());
        let mapping = VaultError::Mapping(MapperError::MissingField {
            field: "service".into(),
        });
        assert_eq!(mapping.status_code(), 500);
    }

    #[test]
    fn duplicate_key_becomes_already_exists() {
        let err = VaultError::from(StoreError::DuplicateKey {
            collection: "configs".into(),
            id: "ab".into(),
        });
        assert!(err.is_already_exists());
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn other_store_failures_are_unavailable() {
        let err = VaultError::from(StoreError::DeadlineExceeded {
            budget: Duration::from_millis(10),
        });
        assert!(matches!(err, VaultError::StoreUnavailable(_)));
        assert_eq!(err.status_code(), 500);
    }
}
