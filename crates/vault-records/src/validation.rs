use std::fmt;

use vault_crypto::Identity;
use vault_types::RecordId;

/// A single failed invariant on a record field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// A record failed its validator. Never reaches a repository.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {}", render(.violations))]
pub struct ValidationError {
    pub kind: &'static str,
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// A single violation on one field.
    pub fn field(kind: &'static str, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            violations: vec![FieldViolation {
                field: field.into(),
                reason: reason.into(),
            }],
        }
    }

    /// Returns `true` if `field` is among the violations.
    pub fn has_violation(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn render(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Collects field violations for one record, then reports them together.
pub struct Validator {
    kind: &'static str,
    violations: Vec<FieldViolation>,
}

impl Validator {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            violations: Vec::new(),
        }
    }

    /// The string must contain something other than whitespace.
    pub fn require(mut self, field: impl Into<String>, value: &str) -> Self {
        if value.trim().is_empty() {
            self.violations.push(FieldViolation {
                field: field.into(),
                reason: "is required".into(),
            });
        }
        self
    }

    /// Record a violation when `ok` is false.
    pub fn check(mut self, ok: bool, field: impl Into<String>, reason: impl Into<String>) -> Self {
        if !ok {
            self.violations.push(FieldViolation {
                field: field.into(),
                reason: reason.into(),
            });
        }
        self
    }

    /// The stored ID must be the one derived from the record's natural key.
    pub fn derived_id<T: Identity>(self, record: &T, id: &RecordId) -> Self {
        let ok = !id.is_null() && record.derived_id() == *id;
        self.check(ok, "_id", "does not match the record's natural key")
    }

    /// The stored version must be the one derived from the semantic payload.
    pub fn derived_version<T: Identity>(self, record: &T, version: &RecordId) -> Self {
        let ok = !version.is_null() && record.derived_version() == *version;
        self.check(ok, "versionId", "does not match the record's content")
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                kind: self.kind,
                violations: self.violations,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_when_all_fields_present() {
        let result = Validator::new("config")
            .require("service", "billing")
            .require("source", "events")
            .finish();
        assert!(result.is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let err = Validator::new("config")
            .require("service", "")
            .require("source", "   ")
            .require("provider", "acme")
            .check(false, "dependsOn[0].service", "is required")
            .finish()
            .unwrap_err();
        assert_eq!(err.kind, "config");
        assert_eq!(err.violations.len(), 3);
        assert!(err.has_violation("service"));
        assert!(err.has_violation("source"));
        assert!(err.has_violation("dependsOn[0].service"));
        assert!(!err.has_violation("provider"));
    }

    #[test]
    fn error_message_lists_fields() {
        let err = Validator::new("schema")
            .require("service", "")
            .check(false, "jsonSchema", "must be a JSON object")
            .finish()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid schema: service: is required; jsonSchema: must be a JSON object"
        );
    }
}
