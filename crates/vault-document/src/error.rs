use std::fmt;

/// Errors raised while converting between records and documents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapperError {
    /// A declared field tag was absent from the document.
    #[error("missing field `{field}`")]
    MissingField { field: String },

    /// A document value could not be converted to the field's declared type.
    #[error("type mismatch at `{field}`: expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// A top-level value was not a record (did not map to a document).
    #[error("expected a record, found {0}")]
    NotARecord(String),

    /// Map keys must be strings in a document.
    #[error("document keys must be strings")]
    NonStringKey,

    /// An integer did not fit the document's signed 64-bit range.
    #[error("integer {0} out of range for a document value")]
    IntegerOutOfRange(u64),

    /// Any other error reported by a type's serde implementation.
    #[error("{0}")]
    Custom(String),
}

impl MapperError {
    /// Prefix the field path of a positional error with an enclosing key.
    pub(crate) fn within(self, key: &str) -> Self {
        match self {
            Self::MissingField { field } => Self::MissingField {
                field: join_path(key, &field),
            },
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => Self::TypeMismatch {
                field: join_path(key, &field),
                expected,
                found,
            },
            other => other,
        }
    }

    fn mismatch(found: impl fmt::Display, expected: &dyn serde::de::Expected) -> Self {
        Self::TypeMismatch {
            field: String::new(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

fn join_path(outer: &str, inner: &str) -> String {
    if inner.is_empty() {
        outer.to_string()
    } else if inner.starts_with('[') {
        format!("{outer}{inner}")
    } else {
        format!("{outer}.{inner}")
    }
}

/// Result alias for mapper operations.
pub type MapperResult<T> = Result<T, MapperError>;

impl serde::ser::Error for MapperError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

impl serde::de::Error for MapperError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }

    fn invalid_type(unexp: serde::de::Unexpected<'_>, exp: &dyn serde::de::Expected) -> Self {
        Self::mismatch(unexp, exp)
    }

    fn invalid_value(unexp: serde::de::Unexpected<'_>, exp: &dyn serde::de::Expected) -> Self {
        Self::mismatch(unexp, exp)
    }

    fn invalid_length(len: usize, exp: &dyn serde::de::Expected) -> Self {
        Self::mismatch(format_args!("a sequence of length {len}"), exp)
    }
}
